//! Published spreadsheet fetched over HTTP

use super::{parse_csv_rows, InventorySource};
use crate::error::{Error, Result};
use crate::fields::SourceRow;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = "tire_stock/1.0";

/// Wire format of the sheet endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SheetFormat {
    /// CSV with a header row (Google Sheets export)
    Csv,
    /// Array of row objects, or `{"values": [[header...], [row...]]}`
    Json,
}

/// Inventory sheet behind an HTTP URL
pub struct SheetSource {
    client: reqwest::Client,
    url: String,
    format: SheetFormat,
}

impl SheetSource {
    /// Create a source for `url`; `timeout` bounds each fetch
    pub fn new(url: impl Into<String>, format: SheetFormat, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            format,
        })
    }

    /// CSV export of one tab of a Google Sheet shared as "anyone with the link"
    pub fn google_csv(sheet_id: &str, sheet_name: &str, timeout: Duration) -> Result<Self> {
        let url = format!(
            "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
            sheet_id,
            urlencoding::encode(sheet_name)
        );
        Self::new(url, SheetFormat::Csv, timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn format(&self) -> SheetFormat {
        self.format
    }

    async fn fetch(&self) -> Result<Vec<SourceRow>> {
        log::debug!("Fetching inventory sheet: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status));
        }

        // Private sheets answer 200 with a sign-in page
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        if is_html {
            return Err(Error::UpstreamUnavailable(
                "sheet returned an HTML page; is it published?".to_string(),
            ));
        }

        match self.format {
            SheetFormat::Csv => {
                let body = response.bytes().await?;
                parse_csv_rows(body.as_ref())
            }
            SheetFormat::Json => {
                let body = response.bytes().await?;
                let value: Value = serde_json::from_slice(&body)?;
                parse_json_rows(value)
            }
        }
    }
}

impl InventorySource for SheetSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        self.fetch().await
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Accepts an array of row objects or a `values` grid with a header row
pub(crate) fn parse_json_rows(value: Value) -> Result<Vec<SourceRow>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map
                    .iter()
                    .map(|(header, cell)| (header.clone(), cell_text(cell)))
                    .collect()),
                _ => Err(Error::UpstreamUnavailable(
                    "expected an array of row objects".to_string(),
                )),
            })
            .collect(),
        Value::Object(mut map) => match map.remove("values") {
            Some(Value::Array(grid)) => parse_grid(&grid),
            _ => Err(Error::UpstreamUnavailable(
                "JSON object has no 'values' grid".to_string(),
            )),
        },
        _ => Err(Error::UpstreamUnavailable(
            "unexpected JSON document shape".to_string(),
        )),
    }
}

fn parse_grid(grid: &[Value]) -> Result<Vec<SourceRow>> {
    let Some((header_row, data)) = grid.split_first() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = match header_row {
        Value::Array(cells) => cells.iter().map(cell_text).collect(),
        _ => {
            return Err(Error::UpstreamUnavailable(
                "header row is not an array".to_string(),
            ))
        }
    };

    let rows = data
        .iter()
        .filter_map(|row| match row {
            Value::Array(cells) => Some(
                headers
                    .iter()
                    .zip(cells.iter())
                    .filter(|(header, _)| !header.is_empty())
                    .map(|(header, cell)| (header.clone(), cell_text(cell)))
                    .collect(),
            ),
            _ => None,
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
#[path = "sheet_tests.rs"]
mod tests;
