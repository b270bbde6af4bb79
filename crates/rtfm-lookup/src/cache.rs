//! Lazy per-source index cache with single-flight builds.
//!
//! Each source moves through an explicit state:
//!
//! ```text
//! NotBuilt --ensure--> Building --ok--> Built (final)
//!                         |
//!                         +--err--> Failed --ensure--> Building ...
//! ```
//!
//! Concurrent callers for a source that is `Building` await the same shared
//! build. The build itself runs on a spawned task, so a caller dropping its
//! query does not cancel a build other callers are waiting on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use rtfm_inventory::InventoryParser;
use rtfm_types::{SourceConfig, SourceIndex};

use crate::error::LookupError;
use crate::fetcher::InventoryFetcher;

type BuildResult = Result<Arc<SourceIndex>, LookupError>;
type SharedBuild = Shared<BoxFuture<'static, BuildResult>>;
type StateMap = Arc<Mutex<HashMap<String, SourceState>>>;

/// Build state of one source. A missing map entry means `NotBuilt`.
enum SourceState {
    Building {
        build: SharedBuild,
        abort: AbortHandle,
    },
    Built(Arc<SourceIndex>),
    Failed(LookupError),
}

/// Point-in-time view of a source's cache state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    NotBuilt,
    Building,
    Built { entries: usize },
    Failed(String),
}

/// Process-lifetime store of parsed inventories.
pub struct IndexCache {
    fetcher: Arc<dyn InventoryFetcher>,
    parser: Arc<InventoryParser>,
    states: StateMap,
    closed: Arc<AtomicBool>,
}

fn lock(states: &Mutex<HashMap<String, SourceState>>) -> MutexGuard<'_, HashMap<String, SourceState>> {
    states.lock().unwrap_or_else(PoisonError::into_inner)
}

impl IndexCache {
    /// Create an empty cache that fetches through `fetcher`.
    pub fn new(fetcher: Arc<dyn InventoryFetcher>) -> Self {
        Self {
            fetcher,
            parser: Arc::new(InventoryParser::new()),
            states: Arc::new(Mutex::new(HashMap::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Parse inventories with a custom parser.
    pub fn with_parser(mut self, parser: InventoryParser) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Return the index for `source`, building it on first use.
    ///
    /// A built index is returned without network access. Otherwise this
    /// joins the in-flight build or starts one. Failed builds cache nothing,
    /// so the next call tries again.
    pub async fn ensure(&self, source: &SourceConfig) -> BuildResult {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LookupError::Build("index cache is shut down".to_string()));
        }

        let build = {
            let mut states = lock(&self.states);
            match states.get(&source.id) {
                Some(SourceState::Built(index)) => {
                    debug!(source = %source.id, "Index cache hit");
                    return Ok(Arc::clone(index));
                }
                Some(SourceState::Building { build, .. }) => {
                    debug!(source = %source.id, "Joining in-flight index build");
                    build.clone()
                }
                Some(SourceState::Failed(_)) | None => {
                    let (build, abort) = self.start_build(source.clone());
                    states.insert(
                        source.id.clone(),
                        SourceState::Building {
                            build: build.clone(),
                            abort,
                        },
                    );
                    build
                }
            }
        };

        build.await
    }

    /// The built index for `source_id`, if any. Never starts a build.
    pub fn get(&self, source_id: &str) -> Option<Arc<SourceIndex>> {
        match lock(&self.states).get(source_id) {
            Some(SourceState::Built(index)) => Some(Arc::clone(index)),
            _ => None,
        }
    }

    /// Current state of `source_id`.
    pub fn status(&self, source_id: &str) -> CacheStatus {
        match lock(&self.states).get(source_id) {
            None => CacheStatus::NotBuilt,
            Some(SourceState::Building { .. }) => CacheStatus::Building,
            Some(SourceState::Built(index)) => CacheStatus::Built {
                entries: index.len(),
            },
            Some(SourceState::Failed(err)) => CacheStatus::Failed(err.to_string()),
        }
    }

    /// Number of sources with a built index.
    pub fn len(&self) -> usize {
        lock(&self.states)
            .values()
            .filter(|state| matches!(state, SourceState::Built(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Abort in-flight builds and drop every cached index.
    ///
    /// Waiters on an aborted build receive `LookupError::Build`; later calls
    /// to `ensure` fail the same way.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let mut states = lock(&self.states);
        for state in states.values() {
            if let SourceState::Building { abort, .. } = state {
                abort.abort();
            }
        }
        let dropped = states.len();
        states.clear();
        info!(sources = dropped, "Index cache shut down");
    }

    fn start_build(&self, source: SourceConfig) -> (SharedBuild, AbortHandle) {
        let fetcher = Arc::clone(&self.fetcher);
        let parser = Arc::clone(&self.parser);
        let states = Arc::clone(&self.states);
        let closed = Arc::clone(&self.closed);
        let source_id = source.id.clone();

        let task = tokio::spawn(async move {
            let result = build_index(fetcher.as_ref(), parser, &source).await;
            if !closed.load(Ordering::SeqCst) {
                let state = match &result {
                    Ok(index) => SourceState::Built(Arc::clone(index)),
                    Err(err) => {
                        warn!(source = %source.id, error = %err, "Index build failed");
                        SourceState::Failed(err.clone())
                    }
                };
                lock(&states).insert(source.id.clone(), state);
            }
            result
        });
        let abort = task.abort_handle();

        let states = Arc::clone(&self.states);
        let build = async move {
            match task.await {
                Ok(result) => result,
                Err(join_err) => {
                    let err = LookupError::Build(join_err.to_string());
                    let mut guard = lock(&states);
                    if matches!(guard.get(&source_id), Some(SourceState::Building { .. })) {
                        guard.insert(source_id, SourceState::Failed(err.clone()));
                    }
                    Err(err)
                }
            }
        }
        .boxed()
        .shared();

        (build, abort)
    }
}

/// Fetch, decompress and parse one source.
async fn build_index(
    fetcher: &dyn InventoryFetcher,
    parser: Arc<InventoryParser>,
    source: &SourceConfig,
) -> BuildResult {
    info!(source = %source.id, base_url = %source.base_url, "Building inventory index");
    let started = Instant::now();

    let bytes = fetcher.fetch(source).await?;

    let source_id = source.id.clone();
    let base_url = source.base_url.clone();
    let index = tokio::task::spawn_blocking(move || parser.parse(&source_id, &base_url, &bytes))
        .await
        .map_err(|e| LookupError::Build(e.to_string()))??;

    info!(
        source = %source.id,
        entries = index.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Inventory index built"
    );

    Ok(Arc::new(index))
}
