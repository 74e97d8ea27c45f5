//! Time-bounded cache of the full inventory table
//!
//! The table is refetched when it is older than the TTL. A failed refetch
//! keeps serving the previous table, so a flaky sheet never turns into a
//! failed lookup. The lock is not held across the fetch; concurrent stale
//! readers may each fetch, and a fetch that started earlier never replaces
//! a table from one that started later.

use crate::error::Result;
use crate::fields::resolve_records;
use crate::models::InventoryRecord;
use crate::source::InventorySource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One fully built copy of the inventory table
#[derive(Debug)]
struct CachedTable {
    records: Arc<Vec<InventoryRecord>>,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheState {
    table: Option<Arc<CachedTable>>,
    last_refresh_failed: bool,
}

/// Records as seen by one caller
#[derive(Debug, Clone)]
pub struct SnapshotView {
    pub records: Arc<Vec<InventoryRecord>>,
    /// False when the TTL has passed and the refetch failed, or nothing was
    /// ever fetched
    pub is_fresh: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Cache health for operators; never carries upstream error text
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStatus {
    pub record_count: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub age_secs: Option<i64>,
    pub ttl_secs: u64,
    pub is_fresh: bool,
    pub last_refresh_failed: bool,
    pub fetch_attempts: u64,
}

/// Cached inventory table with TTL-driven refresh
pub struct InventorySnapshot<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    state: RwLock<CacheState>,
    fetch_attempts: AtomicU64,
}

impl<S: InventorySource, C: Clock> InventorySnapshot<S, C> {
    pub fn new(source: S, clock: C, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            state: RwLock::new(CacheState::default()),
            fetch_attempts: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn ttl_delta(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX)
    }

    fn is_within_ttl(&self, table: &CachedTable, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(table.fetched_at) < self.ttl_delta()
    }

    fn view(&self, table: Option<&Arc<CachedTable>>, is_fresh: bool) -> SnapshotView {
        match table {
            Some(table) => SnapshotView {
                records: Arc::clone(&table.records),
                is_fresh,
                fetched_at: Some(table.fetched_at),
            },
            None => SnapshotView {
                records: Arc::new(Vec::new()),
                is_fresh: false,
                fetched_at: None,
            },
        }
    }

    /// Current records, refetching first if the cached table has expired.
    ///
    /// Never fails: when the refetch fails the previous table (or an empty
    /// one) is returned with `is_fresh == false`.
    pub async fn get_current(&self) -> SnapshotView {
        let cached = self.state.read().await.table.clone();

        if let Some(table) = &cached {
            if self.is_within_ttl(table, self.clock.now()) {
                return self.view(Some(table), true);
            }
        }

        match self.refresh_table().await {
            Ok(table) => self.view(Some(&table), true),
            Err(e) => {
                log::warn!("Inventory refresh failed, serving cached table: {}", e);
                let current = self.state.read().await.table.clone();
                let is_fresh = current
                    .as_ref()
                    .is_some_and(|table| self.is_within_ttl(table, self.clock.now()));
                self.view(current.as_ref(), is_fresh)
            }
        }
    }

    /// Force a refetch. Returns the number of records now cached.
    ///
    /// On failure the cached table is left untouched and the error is
    /// returned to the caller.
    pub async fn refresh(&self) -> Result<usize> {
        let table = self.refresh_table().await?;
        Ok(table.records.len())
    }

    async fn refresh_table(&self) -> Result<Arc<CachedTable>> {
        let started_at = self.clock.now();
        self.fetch_attempts.fetch_add(1, Ordering::Relaxed);

        let rows = match self.source.fetch_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                let mut state = self.state.write().await;
                // A refresh that started at or after this one already landed
                let superseded = state
                    .table
                    .as_ref()
                    .is_some_and(|current| current.fetched_at >= started_at);
                if !superseded {
                    state.last_refresh_failed = true;
                }
                return Err(e);
            }
        };

        let table = Arc::new(CachedTable {
            records: Arc::new(resolve_records(&rows)),
            fetched_at: started_at,
        });

        let mut state = self.state.write().await;

        // A concurrent refresh that started later already landed
        let newer = state
            .table
            .as_ref()
            .filter(|current| current.fetched_at > table.fetched_at)
            .cloned();
        if let Some(current) = newer {
            log::debug!("Discarding older concurrent inventory fetch");
            return Ok(current);
        }

        log::info!("Refreshed inventory: {} records", table.records.len());
        state.table = Some(Arc::clone(&table));
        state.last_refresh_failed = false;
        Ok(table)
    }

    /// Cache health without touching the source
    pub async fn status(&self) -> SnapshotStatus {
        let state = self.state.read().await;
        let now = self.clock.now();
        let table = state.table.as_ref();

        SnapshotStatus {
            record_count: table.map_or(0, |t| t.records.len()),
            fetched_at: table.map(|t| t.fetched_at),
            age_secs: table.map(|t| now.signed_duration_since(t.fetched_at).num_seconds()),
            ttl_secs: self.ttl.as_secs(),
            is_fresh: table.is_some_and(|t| self.is_within_ttl(t, now)),
            last_refresh_failed: state.last_refresh_failed,
            fetch_attempts: self.fetch_attempts.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
