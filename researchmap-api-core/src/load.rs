use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, error, info};

use crate::contract::{RawRow, TableReader};
use crate::error::TableError;

/// Reads researchmap CSV exports from disk.
///
/// researchmap puts a preamble line above the header, so the header is the second
/// non-blank line and data starts at the third.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableReader;

impl CsvTableReader {
    pub fn new() -> Self {
        Self
    }
}

impl TableReader for CsvTableReader {
    fn read_table(&self, path: &Path) -> Result<Vec<RawRow>, TableError> {
        info!(path = %path.display(), "Reading researchmap export");
        let content = fs::read_to_string(path).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to read export");
            TableError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        let rows = parse_export(&content, path)?;
        info!(path = %path.display(), rows = rows.len(), "Parsed researchmap export");
        Ok(rows)
    }
}

/// Parses the text of an export. `path` is only used for error reporting.
pub fn parse_export(content: &str, path: &Path) -> Result<Vec<RawRow>, TableError> {
    let lines: Vec<&str> = content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        error!(path = %path.display(), lines = lines.len(), "Export has no header line");
        return Err(TableError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let header = lines[1];
    let data = lines[2..].join("\n");
    let table = format!("{header}\n{data}");
    debug!(path = %path.display(), header = %header.trim_end(), "Using export header");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(table.as_bytes());

    let csv_err = |e: csv::Error| TableError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let mut row = RawRow::new();
        for (idx, name) in headers.iter().enumerate() {
            if let Some(value) = record.get(idx) {
                row.insert(name, value);
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Drops rows whose visibility column is `closed`, keeping source order.
pub fn filter_visible(rows: Vec<RawRow>) -> Vec<RawRow> {
    let before = rows.len();
    let visible: Vec<RawRow> = rows.into_iter().filter(|row| !row.is_closed()).collect();
    debug!(
        kept = visible.len(),
        dropped = before - visible.len(),
        "Filtered closed rows"
    );
    visible
}
