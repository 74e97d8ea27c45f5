//! Tire Stock - size lookup against a spreadsheet inventory
//!
//! Normalizes free-text tire sizes from chat messages, matches them against a
//! cached copy of the inventory sheet and hands ordered rows back to the chat
//! front-ends.

pub mod chat;
pub mod config;
pub mod error;
pub mod fields;
pub mod matching;
pub mod models;
pub mod normalizer;
pub mod service;
pub mod snapshot;
pub mod source;
pub mod web;

#[cfg(test)]
mod test_utils;

pub use chat::{route, Reply};
pub use config::LookupConfig;
pub use error::{Error, Result, StockError};
pub use matching::{best_per_brand, MatchEngine};
pub use models::{InventoryRecord, Price};
pub use normalizer::{normalize, NormalizedKey, SizeNormalizer};
pub use service::StockLookupService;
pub use snapshot::{Clock, InventorySnapshot, SnapshotStatus, SnapshotView, SystemClock};
pub use source::{ConfiguredSource, FileSource, InventorySource, SheetFormat, SheetSource};
