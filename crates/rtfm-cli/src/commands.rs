//! Command implementations.
//!
//! Each handler loads settings, applies CLI overrides, initializes logging
//! and then drives a [`DocsLookup`]. Output goes to stdout; logs go to stderr.

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{info, warn};

use rtfm_lookup::{DocsLookup, LookupError, LookupOutcome};
use rtfm_types::Settings;

/// Load settings and apply the global CLI overrides.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn setup(config_path: Option<&str>, log_level: Option<&str>) -> Result<(Settings, DocsLookup)> {
    let settings = load_settings(config_path, log_level)?;
    init_logging(&settings)?;
    let lookup = DocsLookup::from_settings(&settings).context("Failed to create lookup")?;
    Ok((settings, lookup))
}

/// `rtfm lookup`
pub async fn handle_lookup(
    config_path: Option<&str>,
    log_level: Option<&str>,
    source: Option<String>,
    limit: Option<usize>,
    term: Vec<String>,
) -> Result<()> {
    let (settings, mut lookup) = setup(config_path, log_level)?;
    if let Some(limit) = limit {
        anyhow::ensure!(limit > 0, "--limit must be greater than 0");
        lookup = lookup.with_limit(limit);
    }

    let source = source.unwrap_or_else(|| settings.default_source.clone());
    let term = term.join(" ");

    let result = lookup.query(&source, Some(&term)).await;
    lookup.shutdown();

    let outcome = result.with_context(|| format!("Lookup in '{}' failed", source))?;
    for line in format_outcome(&outcome) {
        println!("{}", line);
    }
    Ok(())
}

/// Lines printed for a lookup outcome.
pub fn format_outcome(outcome: &LookupOutcome) -> Vec<String> {
    match outcome {
        LookupOutcome::Empty => vec!["Could not find anything. Sorry.".to_string()],
        other => other.render_lines(),
    }
}

/// `rtfm sources`
pub fn list_sources(config_path: Option<&str>, log_level: Option<&str>) -> Result<()> {
    let settings = load_settings(config_path, log_level)?;
    for line in format_sources(&settings) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per configured source with its aliases, flags and base URL.
pub fn format_sources(settings: &Settings) -> Vec<String> {
    settings
        .sources
        .iter()
        .map(|source| {
            let mut names = source.id.clone();
            if !source.aliases.is_empty() {
                names.push_str(&format!(" ({})", source.aliases.join(", ")));
            }
            if source.id.eq_ignore_ascii_case(&settings.default_source) {
                names.push_str(" [default]");
            }
            if source.unstable {
                names.push_str(" [unstable]");
            }
            format!("{:<28} {}", names, source.base_url)
        })
        .collect()
}

/// `rtfm warm`
pub async fn warm_sources(
    config_path: Option<&str>,
    log_level: Option<&str>,
    sources: Vec<String>,
) -> Result<()> {
    let (_settings, lookup) = setup(config_path, log_level)?;

    let results = warm_all(&lookup, &sources).await;
    lookup.shutdown();

    let mut failed = 0;
    for (name, result) in &results {
        match result {
            Ok(entries) => println!("{:<16} {} entries", name, entries),
            Err(e) => {
                failed += 1;
                println!("{:<16} failed: {}", name, e);
            }
        }
    }

    anyhow::ensure!(failed == 0, "{} of {} sources failed to build", failed, results.len());
    Ok(())
}

/// Build the named sources (all configured sources when empty) concurrently.
///
/// Returns the entry count or error per requested name, in request order.
pub async fn warm_all(
    lookup: &DocsLookup,
    sources: &[String],
) -> Vec<(String, Result<usize, LookupError>)> {
    let names: Vec<String> = if sources.is_empty() {
        lookup.registry().iter().map(|s| s.id.clone()).collect()
    } else {
        sources.to_vec()
    };

    let builds = names.iter().map(|name| async move {
        let result = lookup.warm(name).await.map(|index| index.len());
        match &result {
            Ok(entries) => info!(source = %name, entries, "Index ready"),
            Err(e) => warn!(source = %name, error = %e, "Index build failed"),
        }
        result
    });

    let results = join_all(builds).await;
    names.into_iter().zip(results).collect()
}
