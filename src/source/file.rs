//! Local CSV export of the inventory sheet, for offline use

use super::{parse_csv_rows, InventorySource};
use crate::error::Result;
use crate::fields::SourceRow;
use std::path::{Path, PathBuf};

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventorySource for FileSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        log::debug!("Reading inventory file: {}", self.path.display());
        let bytes = tokio::fs::read(&self.path).await?;
        parse_csv_rows(bytes.as_slice())
    }
}
