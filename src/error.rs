//! Error types for tire_stock

use thiserror::Error;

/// Unified error type for tire_stock operations
#[derive(Debug, Error)]
pub enum StockError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code from the inventory sheet
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Failed to parse CSV rows
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Failed to parse a JSON response
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration rejected at startup
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
    /// The inventory source answered, but not with anything usable
    #[error("Inventory source unavailable: {0}")]
    UpstreamUnavailable(String),
}

/// Short alias used across the crate
pub type Error = StockError;

/// Result alias for tire_stock operations
pub type Result<T> = std::result::Result<T, StockError>;
