//! Inventory sources: the only code that talks to the spreadsheet

mod file;
mod sheet;

pub use file::FileSource;
pub use sheet::{SheetFormat, SheetSource};

use crate::error::Result;
use crate::fields::SourceRow;
use std::future::Future;
use std::io::Read;

/// Something that can read the whole inventory table
pub trait InventorySource: Send + Sync {
    /// Read every row as header -> cell text
    fn fetch_rows(&self) -> impl Future<Output = Result<Vec<SourceRow>>> + Send;
}

/// Source chosen at startup from the command line
pub enum ConfiguredSource {
    Sheet(SheetSource),
    File(FileSource),
}

impl ConfiguredSource {
    /// Human-readable origin for logs
    pub fn describe(&self) -> String {
        match self {
            ConfiguredSource::Sheet(sheet) => format!("sheet {}", sheet.url()),
            ConfiguredSource::File(file) => format!("file {}", file.path().display()),
        }
    }
}

impl InventorySource for ConfiguredSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        match self {
            ConfiguredSource::Sheet(sheet) => sheet.fetch_rows().await,
            ConfiguredSource::File(file) => file.fetch_rows().await,
        }
    }
}

/// Parse CSV with a header row into sheet rows
pub(crate) fn parse_csv_rows<R: Read>(reader: R) -> Result<Vec<SourceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: SourceRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
