///! Earthquake loader
///!
///! Runs fetch → parse cycles and keeps the most recent non-empty result in
///! memory, so re-displaying the list does not hit the network again.

use arc_swap::ArcSwapOption;
use quake_common::{EarthquakeRecord, QueryConfig};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::fetcher::EarthquakeSource;
use super::parser::EarthquakeParser;

/// One complete, immutable result set. Replaced as a whole, never edited.
pub type Earthquakes = Arc<Vec<EarthquakeRecord>>;

/// Read-only view of a loader's cache, for other tasks that only display it.
#[derive(Clone)]
pub struct CacheView {
    slot: Arc<ArcSwapOption<Vec<EarthquakeRecord>>>,
}

impl CacheView {
    /// Snapshot of the current result set, if any.
    pub fn current(&self) -> Option<Earthquakes> {
        self.slot.load_full()
    }
}

/// Shared loader – owns the source, the parser, and the in-memory cache.
pub struct EarthquakeLoader {
    source: Arc<dyn EarthquakeSource>,
    parser: EarthquakeParser,
    /// Most recent non-empty result (None until the first successful load)
    cache:  Arc<ArcSwapOption<Vec<EarthquakeRecord>>>,
    /// Held for the whole fetch → parse cycle; at most one cycle in flight
    cycle:  Mutex<()>,
}

impl EarthquakeLoader {
    pub fn new(source: Arc<dyn EarthquakeSource>, parser: EarthquakeParser) -> Self {
        Self {
            source,
            parser,
            cache: Arc::new(ArcSwapOption::empty()),
            cycle: Mutex::new(()),
        }
    }

    /// Return a read-only view of the cache for other tasks.
    pub fn snapshot_handle(&self) -> CacheView {
        CacheView {
            slot: self.cache.clone(),
        }
    }

    /// Current cached result, without any I/O or locking.
    pub fn cached(&self) -> Option<Earthquakes> {
        self.cache.load_full()
    }

    /// Serve the cached result, or run one fetch → parse cycle if there is none.
    ///
    /// `None` means the response could not be parsed (a failed fetch lands
    /// here too); `Some` with an empty list means the query matched nothing.
    /// Neither replaces the cache.
    pub async fn load(&self, config: &QueryConfig) -> Option<Earthquakes> {
        if let Some(cached) = self.cached() {
            tracing::debug!("Serving {} cached earthquakes", cached.len());
            return Some(cached);
        }

        let _cycle = self.cycle.lock().await;

        // A cycle that finished while we waited may have filled the cache.
        if let Some(cached) = self.cached() {
            tracing::debug!("Joined in-flight load with {} earthquakes", cached.len());
            return Some(cached);
        }

        self.run_cycle(config).await
    }

    /// Entry point for the list screen; same as [`load`](Self::load).
    pub async fn get_earthquakes(&self, config: &QueryConfig) -> Option<Earthquakes> {
        self.load(config).await
    }

    /// Always fetch again, e.g. after the minimum magnitude or sort order changed.
    pub async fn invalidate_and_reload(&self, config: &QueryConfig) -> Option<Earthquakes> {
        let _cycle = self.cycle.lock().await;
        self.run_cycle(config).await
    }

    /// Run [`load`](Self::load) on the runtime and hand back a handle to await.
    ///
    /// Dropping the handle discards the result.
    pub fn spawn_load(self: &Arc<Self>, config: QueryConfig) -> JoinHandle<Option<Earthquakes>> {
        let loader = Arc::clone(self);
        tokio::spawn(async move { loader.load(&config).await })
    }

    /// Background counterpart of [`invalidate_and_reload`](Self::invalidate_and_reload).
    pub fn spawn_reload(self: &Arc<Self>, config: QueryConfig) -> JoinHandle<Option<Earthquakes>> {
        let loader = Arc::clone(self);
        tokio::spawn(async move { loader.invalidate_and_reload(&config).await })
    }

    async fn run_cycle(&self, config: &QueryConfig) -> Option<Earthquakes> {
        tracing::info!(
            "Loading earthquakes {}..{} (min magnitude {}, limit {}, order by {})",
            config.start_time_param(),
            config.end_time_param(),
            config.min_magnitude,
            config.limit,
            config.order_by
        );

        let body = self.source.fetch(config).await;
        if body.is_empty() {
            tracing::warn!("No earthquake data received; keeping previous cache");
            return None;
        }

        let records = Arc::new(self.parser.parse(&body)?);

        if records.is_empty() {
            tracing::info!("Query matched no earthquakes; keeping previous cache");
        } else {
            // Update in-memory cache
            self.cache.store(Some(records.clone()));
            tracing::info!("Cached {} earthquakes", records.len());
        }

        Some(records)
    }
}
