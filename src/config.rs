//! Lookup tuning shared by the normalizer, matcher and snapshot cache

use crate::error::{Error, Result};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Default snapshot time-to-live (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default minimum number of digits before text counts as a size query
pub const DEFAULT_MIN_DIGITS: usize = 5;

/// Accepted range for the minimum significant-digit threshold
pub const MIN_DIGITS_RANGE: RangeInclusive<usize> = 4..=6;

/// Default request timeout for the inventory sheet
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    /// Maximum age of the cached inventory before a refresh is attempted
    pub ttl: Duration,
    /// Queries (and record keys) with fewer digits never match
    pub min_digits: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            min_digits: DEFAULT_MIN_DIGITS,
        }
    }
}

impl LookupConfig {
    /// Build a validated config from raw CLI values
    pub fn new(ttl_secs: u64, min_digits: usize) -> Result<Self> {
        if ttl_secs == 0 {
            return Err(Error::InvalidConfig(
                "ttl must be at least one second".to_string(),
            ));
        }
        if !MIN_DIGITS_RANGE.contains(&min_digits) {
            return Err(Error::InvalidConfig(format!(
                "min digits must be between {} and {}, got {}",
                MIN_DIGITS_RANGE.start(),
                MIN_DIGITS_RANGE.end(),
                min_digits
            )));
        }
        Ok(Self {
            ttl: Duration::from_secs(ttl_secs),
            min_digits,
        })
    }
}

/// Validated per-request timeout for the inventory sheet
pub fn fetch_timeout(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(Error::InvalidConfig(
            "fetch timeout must be at least one second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
