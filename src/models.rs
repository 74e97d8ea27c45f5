use serde::{Serialize, Serializer};
use std::fmt;

/// Shown in place of a price when the sheet has none
pub const CONTACT_SALES: &str = "contact sales";

/// Price cell of an inventory row
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    /// Numeric price in baht
    Amount(f64),
    /// Free text the sheet holds instead of a number (e.g. "call")
    Text(String),
    /// Missing or empty price cell
    ContactSales,
}

impl Price {
    /// Parse a price cell, tolerating thousands separators and currency marks
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Price::ContactSales;
        }

        let numeric: String = trimmed
            .trim_start_matches('฿')
            .trim_end_matches("บาท")
            .trim_end_matches("THB")
            .trim()
            .chars()
            .filter(|c| *c != ',')
            .collect();

        match numeric.parse::<f64>() {
            Ok(amount) if amount.is_finite() => Price::Amount(amount),
            _ => Price::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) if amount.fract() == 0.0 => write!(f, "{:.0}", amount),
            Price::Amount(amount) => write!(f, "{:.2}", amount),
            Price::Text(text) => f.write_str(text),
            Price::ContactSales => f.write_str(CONTACT_SALES),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Amount(amount) => serializer.serialize_f64(*amount),
            Price::Text(text) => serializer.serialize_str(text),
            Price::ContactSales => serializer.serialize_str(CONTACT_SALES),
        }
    }
}

/// One tire SKU row from the inventory sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRecord {
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Human-readable size, e.g. "265/60R18"
    pub size_label: String,
    /// Encoded size used for matching
    pub size_key: String,
    /// Production year as written in the sheet
    pub year: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl InventoryRecord {
    /// Production year as a sort rank; anything non-numeric ranks as 0
    pub fn year_rank(&self) -> u32 {
        let year = self.year.trim();
        year.parse::<u32>()
            .ok()
            .or_else(|| {
                year.parse::<f64>()
                    .ok()
                    .filter(|y| y.is_finite() && *y >= 0.0 && *y <= u32::MAX as f64)
                    .map(|y| y as u32)
            })
            .unwrap_or(0)
    }

    /// Size text to show the customer, falling back to the encoded key
    pub fn display_size(&self) -> &str {
        if self.size_label.trim().is_empty() {
            &self.size_key
        } else {
            &self.size_label
        }
    }
}

#[cfg(test)]
pub use tests::make_test_record;
