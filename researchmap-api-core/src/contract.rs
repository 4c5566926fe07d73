//! # contract: the I/O seams of the generation pipeline
//!
//! The pipeline itself is pure: rows in, formatted collections out. Reading the
//! researchmap exports and publishing the JSON files both happen behind the two traits
//! defined here, so the orchestration in [`crate::generate`] can run against the real
//! filesystem or against mocks.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`; `MockTableReader` and `MockArtifactSink`
//!   are exported when the `test-export-mocks` feature is on (the default), so the
//!   integration tests under `tests/` can use them.
//!
//! ## Implementations
//! - [`crate::load::CsvTableReader`] reads the exports with the `csv` crate.
//! - [`crate::publish::DirectorySink`] writes artifacts into the output directory.

use std::collections::HashMap;
use std::path::Path;

use mockall::automock;

use crate::error::{SinkError, TableError};

/// Value of the visibility column that hides a row from the published API.
pub const CLOSED: &str = "closed";

/// Name of the visibility column in every researchmap export.
pub const VISIBILITY_FIELD: &str = "公開の有無";

/// One data row of an export, keyed by header name.
///
/// A field is absent when the row had no cell for it or when the cell held the
/// literal `null`/`NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, Option<String>>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from `(field, value)` pairs, applying the same null
    /// normalisation as the CSV loader.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let value = if value == "null" || value == "NULL" {
            None
        } else {
            Some(value)
        };
        self.fields.insert(field.into(), value);
    }

    /// Whether the row has a column with this name at all, null or not.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The cell value, possibly empty. `None` when absent or null.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// The cell value if it carries any text.
    pub fn non_empty(&self, field: &str) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    /// A row is hidden when its visibility column says `closed`.
    pub fn is_closed(&self) -> bool {
        self.get(VISIBILITY_FIELD) == Some(CLOSED)
    }
}

/// Reads one researchmap export into rows, in source order.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait TableReader {
    fn read_table(&self, path: &Path) -> Result<Vec<RawRow>, TableError>;
}

/// Destination for the generated JSON documents.
///
/// Writes are independent of each other; there is no transaction across a run.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ArtifactSink {
    /// Stores `contents` under `file_name` (a bare name such as `papers-2023.json`).
    fn put(&self, file_name: &str, contents: &str) -> Result<(), SinkError>;
}
