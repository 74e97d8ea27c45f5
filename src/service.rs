//! Stock lookup façade used by the chat glue

use crate::config::LookupConfig;
use crate::error::Result;
use crate::matching::{best_per_brand, MatchEngine};
use crate::models::InventoryRecord;
use crate::normalizer::{NormalizedKey, SizeNormalizer};
use crate::snapshot::{Clock, InventorySnapshot, SnapshotStatus, SystemClock};
use crate::source::InventorySource;

/// Normalizer, cache and matcher behind one `lookup` call
pub struct StockLookupService<S, C = SystemClock> {
    normalizer: SizeNormalizer,
    engine: MatchEngine,
    snapshot: InventorySnapshot<S, C>,
}

impl<S: InventorySource> StockLookupService<S, SystemClock> {
    pub fn new(source: S, config: LookupConfig) -> Self {
        Self::with_clock(source, SystemClock, config)
    }
}

impl<S: InventorySource, C: Clock> StockLookupService<S, C> {
    pub fn with_clock(source: S, clock: C, config: LookupConfig) -> Self {
        let normalizer = SizeNormalizer::new(config.min_digits);
        Self {
            normalizer,
            engine: MatchEngine::new(normalizer),
            snapshot: InventorySnapshot::new(source, clock, config.ttl),
        }
    }

    /// Caller-side pre-check: the size key for `raw_text`, or `None` when the
    /// text is not a size query and should go to the conversational fallback
    pub fn query_key(&self, raw_text: &str) -> Option<NormalizedKey> {
        self.normalizer.query_key(raw_text)
    }

    /// Inventory rows matching a free-text size, newest year first.
    ///
    /// Empty when the text is not a size query, the inventory is empty, or
    /// nothing matches. The sheet is not consulted for non-size text.
    pub async fn lookup(&self, raw_text: &str) -> Vec<InventoryRecord> {
        let Some(key) = self.query_key(raw_text) else {
            log::debug!("Not a size query: {:?}", raw_text);
            return Vec::new();
        };

        let view = self.snapshot.get_current().await;
        if !view.is_fresh {
            log::debug!("Matching '{}' against a stale inventory table", key);
        }
        self.engine.find(&key, &view.records)
    }

    /// Like [`lookup`](Self::lookup), reduced to the newest row per brand
    pub async fn lookup_best_per_brand(&self, raw_text: &str) -> Vec<InventoryRecord> {
        best_per_brand(&self.lookup(raw_text).await)
    }

    /// Force a sheet refetch
    pub async fn refresh(&self) -> Result<usize> {
        self.snapshot.refresh().await
    }

    pub async fn status(&self) -> SnapshotStatus {
        self.snapshot.status().await
    }
}
