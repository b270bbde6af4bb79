//! Concurrency E2E tests for single-flight index builds.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use pretty_assertions::assert_eq;

use e2e_tests::{inventory, labels, TestHarness, DISCORD_RECORDS};
use rtfm_lookup::{CacheStatus, LookupError};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_queries_fetch_once() {
    let harness = TestHarness::start().await;
    harness
        .mount_slow_inventory(
            "stable",
            inventory("discord.py", DISCORD_RECORDS),
            Duration::from_millis(200),
            1,
        )
        .await;
    let lookup = Arc::new(harness.lookup(vec![harness.source("discord.py", "stable")]));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let lookup = Arc::clone(&lookup);
            tokio::spawn(async move { lookup.query("discord.py", Some("bot")).await })
        })
        .collect();

    for result in join_all(tasks).await {
        let outcome = result.unwrap().unwrap();
        assert_eq!(labels(&outcome), vec!["Bot", "AutoShardedBot"]);
    }
}

#[tokio::test]
async fn test_abandoned_query_does_not_cancel_build() {
    let harness = TestHarness::start().await;
    harness
        .mount_slow_inventory(
            "stable",
            inventory("discord.py", DISCORD_RECORDS),
            Duration::from_millis(300),
            1,
        )
        .await;
    let lookup = harness.lookup(vec![harness.source("discord.py", "stable")]);

    let abandoned =
        tokio::time::timeout(Duration::from_millis(50), lookup.query("discord.py", Some("bot")))
            .await;
    assert!(abandoned.is_err(), "query should have timed out");
    assert_eq!(lookup.cache().status("discord.py"), CacheStatus::Building);

    // Joins the build started by the abandoned query.
    let outcome = lookup.query("discord.py", Some("bot")).await.unwrap();
    assert_eq!(labels(&outcome), vec!["Bot", "AutoShardedBot"]);
}

#[tokio::test]
async fn test_shutdown_aborts_and_refuses_builds() {
    let harness = TestHarness::start().await;
    harness
        .mount_slow_inventory(
            "stable",
            inventory("discord.py", DISCORD_RECORDS),
            Duration::from_millis(300),
            0..=1,
        )
        .await;
    let lookup = harness.lookup(vec![harness.source("discord.py", "stable")]);

    let _ = tokio::time::timeout(Duration::from_millis(50), lookup.warm("discord.py")).await;
    lookup.shutdown();

    assert!(lookup.cache().is_empty());
    let err = lookup.query("discord.py", Some("bot")).await.unwrap_err();
    assert!(matches!(err, LookupError::Build(_)), "got {err:?}");
}
