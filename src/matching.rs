//! Matching normalized size queries against inventory records
//!
//! A record matches when its digit key equals the query's, contains it, or
//! is contained by it. The last two tolerate a missing load/speed suffix on
//! either side and stray digits around the size in chat text.

use crate::models::InventoryRecord;
use crate::normalizer::{normalize, NormalizedKey, SizeNormalizer};

/// Matching rules over a list of records
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine {
    normalizer: SizeNormalizer,
}

impl MatchEngine {
    pub fn new(normalizer: SizeNormalizer) -> Self {
        Self { normalizer }
    }

    /// The key a record is matched on: its size key, or its size label when
    /// the key is too short to be meaningful.
    ///
    /// Returns `None` when neither field yields a usable key; such records
    /// never match.
    pub fn record_key(&self, record: &InventoryRecord) -> Option<NormalizedKey> {
        [&record.size_key, &record.size_label]
            .into_iter()
            .map(|field| normalize(field))
            .find(|key| self.normalizer.is_significant(key))
    }

    /// Whether a record matches an already-normalized query
    pub fn is_match(&self, query: &NormalizedKey, record: &InventoryRecord) -> bool {
        if !self.normalizer.is_significant(query) {
            return false;
        }
        let Some(key) = self.record_key(record) else {
            return false;
        };

        let query = query.digits();
        let key = key.digits();
        query == key || key.contains(query) || query.contains(key)
    }

    /// All records matching `query`, newest production year first.
    ///
    /// Records with equal years keep their table order. Years that are not
    /// numbers rank as 0.
    pub fn find(&self, query: &NormalizedKey, records: &[InventoryRecord]) -> Vec<InventoryRecord> {
        if !self.normalizer.is_significant(query) {
            log::debug!("Query key '{}' below digit threshold, no matches", query);
            return Vec::new();
        }

        let mut matches: Vec<InventoryRecord> = records
            .iter()
            .filter(|record| self.is_match(query, record))
            .cloned()
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.year_rank().cmp(&a.year_rank()));

        log::debug!(
            "Query key '{}' matched {} of {} records",
            query,
            matches.len(),
            records.len()
        );
        matches
    }
}

/// Keep only the newest record of each brand.
///
/// Brands compare case-insensitively; output follows the first appearance of
/// each brand in `matches`.
pub fn best_per_brand(matches: &[InventoryRecord]) -> Vec<InventoryRecord> {
    let mut best: Vec<(String, &InventoryRecord)> = Vec::new();

    for record in matches {
        let brand = record.brand.trim().to_lowercase();
        match best.iter_mut().find(|(seen, _)| *seen == brand) {
            Some((_, current)) => {
                if record.year_rank() > current.year_rank() {
                    *current = record;
                }
            }
            None => best.push((brand, record)),
        }
    }

    best.into_iter().map(|(_, record)| record.clone()).collect()
}

#[cfg(test)]
#[path = "matching_tests.rs"]
mod tests;
