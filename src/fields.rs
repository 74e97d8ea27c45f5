//! Field resolution for heterogeneous sheet rows
//!
//! Sheet headers drift between English and Thai, casing and spacing. Every
//! row is mapped into one [`InventoryRecord`] shape here so matching never
//! has to guess at column names.

use crate::models::{InventoryRecord, Price};
use std::collections::HashMap;

/// One spreadsheet row: header -> cell text
pub type SourceRow = HashMap<String, String>;

const BRAND: &[&str] = &["brand", "make", "ยี่ห้อ"];
const MODEL: &[&str] = &["model", "pattern", "รุ่น"];
const SIZE_LABEL: &[&str] = &["size", "tiresize", "tyresize", "ขนาด"];
const SIZE_KEY: &[&str] = &["sizekey", "key", "code", "รหัส"];
const YEAR: &[&str] = &["year", "productionyear", "dot", "ปี", "ปีผลิต"];
const PRICE: &[&str] = &["price", "ราคา"];
const STOCK: &[&str] = &["stock", "qty", "quantity", "คงเหลือ", "จำนวน"];

/// Fold a header to its comparable form: lower-case, no spaces, `_` or `-`
fn fold_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Row view with folded headers
struct FoldedRow<'a> {
    cells: HashMap<String, &'a str>,
}

impl<'a> FoldedRow<'a> {
    fn new(row: &'a SourceRow) -> Self {
        let cells = row
            .iter()
            .map(|(header, value)| (fold_header(header), value.as_str()))
            .collect();
        Self { cells }
    }

    /// First non-empty cell among the candidate headers
    fn get(&self, candidates: &[&str]) -> Option<&'a str> {
        candidates
            .iter()
            .filter_map(|name| self.cells.get(*name).copied())
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    fn text(&self, candidates: &[&str]) -> String {
        self.get(candidates).unwrap_or_default().to_string()
    }
}

fn parse_stock(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .map(|n| n as i64)
    })
}

/// Resolve one sheet row into a record.
///
/// Missing fields are defaulted rather than rejected; `None` is returned only
/// for rows with no recognizable content at all.
pub fn resolve_record(row: &SourceRow) -> Option<InventoryRecord> {
    let folded = FoldedRow::new(row);

    let record = InventoryRecord {
        brand: folded.text(BRAND),
        model: folded.get(MODEL).map(str::to_string),
        size_label: folded.text(SIZE_LABEL),
        size_key: folded.text(SIZE_KEY),
        year: folded.get(YEAR).unwrap_or("0").to_string(),
        price: Price::parse(folded.get(PRICE).unwrap_or_default()),
        stock: folded.get(STOCK).and_then(parse_stock),
    };

    let is_blank = record.brand.is_empty()
        && record.model.is_none()
        && record.size_label.is_empty()
        && record.size_key.is_empty();

    if is_blank {
        None
    } else {
        Some(record)
    }
}

/// Resolve all rows, keeping table order and skipping blank rows
pub fn resolve_records(rows: &[SourceRow]) -> Vec<InventoryRecord> {
    let records: Vec<InventoryRecord> = rows.iter().filter_map(resolve_record).collect();

    let skipped = rows.len() - records.len();
    if skipped > 0 {
        log::warn!("Skipped {} blank inventory rows", skipped);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> SourceRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_english_headers() {
        let record = resolve_record(&row(&[
            ("Brand", "Michelin"),
            ("Model", "Primacy SUV+"),
            ("Size", "265/60R18"),
            ("Size Key", "2656018"),
            ("Year", "2023"),
            ("Price", "5,200"),
            ("Stock", "8"),
        ]))
        .unwrap();

        assert_eq!(record.brand, "Michelin");
        assert_eq!(record.model.as_deref(), Some("Primacy SUV+"));
        assert_eq!(record.size_label, "265/60R18");
        assert_eq!(record.size_key, "2656018");
        assert_eq!(record.year, "2023");
        assert_eq!(record.price, Price::Amount(5200.0));
        assert_eq!(record.stock, Some(8));
    }

    #[test]
    fn resolves_thai_headers() {
        let record = resolve_record(&row(&[
            ("ยี่ห้อ", "Bridgestone"),
            ("รุ่น", "Dueler H/T"),
            ("ขนาด", "265/65R17"),
            ("ปีผลิต", "2022"),
            ("ราคา", "4500 บาท"),
            ("คงเหลือ", "4"),
        ]))
        .unwrap();

        assert_eq!(record.brand, "Bridgestone");
        assert_eq!(record.size_label, "265/65R17");
        assert_eq!(record.size_key, "");
        assert_eq!(record.year, "2022");
        assert_eq!(record.price, Price::Amount(4500.0));
        assert_eq!(record.stock, Some(4));
    }

    #[test]
    fn header_casing_and_separators_are_ignored() {
        let record = resolve_record(&row(&[
            ("  BRAND ", "Yokohama"),
            ("size_key", "2055516"),
            ("PRODUCTION-YEAR", "2021"),
        ]))
        .unwrap();

        assert_eq!(record.brand, "Yokohama");
        assert_eq!(record.size_key, "2055516");
        assert_eq!(record.year, "2021");
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let record =
            resolve_record(&row(&[("brand", "Deestone"), ("size", "31x10.5R15")])).unwrap();

        assert_eq!(record.model, None);
        assert_eq!(record.year, "0");
        assert_eq!(record.price, Price::ContactSales);
        assert_eq!(record.stock, None);
    }

    #[test]
    fn later_candidate_used_when_first_is_empty() {
        let record = resolve_record(&row(&[
            ("brand", ""),
            ("make", "Toyo"),
            ("size", "225/45R17"),
            ("qty", "2.0"),
        ]))
        .unwrap();

        assert_eq!(record.brand, "Toyo");
        assert_eq!(record.stock, Some(2));
    }

    #[test]
    fn unparseable_stock_is_none() {
        let record = resolve_record(&row(&[("brand", "Toyo"), ("stock", "many")])).unwrap();
        assert_eq!(record.stock, None);
    }

    #[test]
    fn blank_rows_are_skipped() {
        assert!(resolve_record(&row(&[("brand", " "), ("price", "100")])).is_none());
        assert!(resolve_record(&SourceRow::new()).is_none());

        let rows = vec![
            row(&[("brand", "Michelin"), ("size", "265/60R18")]),
            row(&[("notes", "restock friday")]),
            row(&[("brand", "Goodyear"), ("size", "265/60R18")]),
        ];
        let records = resolve_records(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].brand, "Michelin");
        assert_eq!(records[1].brand, "Goodyear");
    }
}
