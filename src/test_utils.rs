//! Shared fakes for unit tests

use crate::error::{Error, Result};
use crate::fields::SourceRow;
use crate::snapshot::Clock;
use crate::source::InventorySource;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};

/// Build a sheet row from header/value pairs
pub fn row(cells: &[(&str, &str)]) -> SourceRow {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Sheet row with the columns matching cares about
pub fn tire_row(brand: &str, size_key: &str, year: &str) -> SourceRow {
    row(&[("brand", brand), ("size_key", size_key), ("year", year)])
}

/// Clock that only moves when told to
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
struct FakeState {
    /// `None` makes every fetch fail
    rows: Option<Vec<SourceRow>>,
    calls: usize,
}

/// Scriptable inventory source that counts fetches
#[derive(Clone, Default)]
pub struct FakeSource {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSource {
    pub fn with_rows(rows: Vec<SourceRow>) -> Self {
        let source = Self::default();
        source.set_rows(rows);
        source
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn set_rows(&self, rows: Vec<SourceRow>) {
        self.state.lock().unwrap().rows = Some(rows);
    }

    pub fn fail(&self) {
        self.state.lock().unwrap().rows = None;
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }
}

impl InventorySource for FakeSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state
            .rows
            .clone()
            .ok_or_else(|| Error::UpstreamUnavailable("sheet offline".to_string()))
    }
}
