//! Serialises formatted collections and hands them to an [`ArtifactSink`].

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::contract::ArtifactSink;
use crate::error::SinkError;
use crate::record::{Dated, RecordKind};

pub const YEARS_FILE: &str = "years.json";

/// Writes artifacts as files in a single output directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    output_dir: PathBuf,
}

impl DirectorySink {
    /// Opens `output_dir`, creating it (and its parents) when absent.
    pub fn create(output_dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|e| {
            error!(
                error = ?e,
                output_dir = %output_dir.display(),
                "Failed to create output directory"
            );
            SinkError::Io {
                path: output_dir.clone(),
                source: e,
            }
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ArtifactSink for DirectorySink {
    fn put(&self, file_name: &str, contents: &str) -> Result<(), SinkError> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to write artifact");
            SinkError::Io {
                path: path.clone(),
                source: e,
            }
        })?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
        Ok(())
    }
}

/// `{ "years": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearsIndex {
    pub years: Vec<String>,
}

/// Pretty JSON with two-space indentation and no trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(
    file_name: &str,
    value: &T,
) -> Result<String, SinkError> {
    serde_json::to_string_pretty(value).map_err(|e| SinkError::Serialize {
        file_name: file_name.to_string(),
        source: e,
    })
}

pub fn collection_file_name(kind: RecordKind) -> String {
    format!("{}.json", kind.file_stem())
}

pub fn year_file_name(kind: RecordKind, year: &str) -> String {
    format!("{}-{}.json", kind.file_stem(), year)
}

/// Serialises `value` and stores it under `file_name`.
pub fn put_json<S, T>(sink: &S, file_name: &str, value: &T) -> Result<(), SinkError>
where
    S: ArtifactSink + ?Sized,
    T: Serialize + ?Sized,
{
    let body = to_pretty_json(file_name, value)?;
    sink.put(file_name, &body)
}

/// Writes the whole collection of one kind, e.g. `papers.json`.
pub fn publish_collection<S, T>(sink: &S, kind: RecordKind, records: &[T]) -> Result<(), SinkError>
where
    S: ArtifactSink + ?Sized,
    T: Serialize,
{
    let file_name = collection_file_name(kind);
    put_json(sink, &file_name, records)?;
    info!(file = %file_name, records = records.len(), "Published collection");
    Ok(())
}

/// Writes `<stem>-<year>.json` for every year in `years`, keeping collection order.
///
/// A year with no records of this kind still gets a file holding `[]`.
pub fn publish_by_year<S, T>(
    sink: &S,
    kind: RecordKind,
    records: &[T],
    years: &[String],
) -> Result<(), SinkError>
where
    S: ArtifactSink + ?Sized,
    T: Serialize + Dated,
{
    for year in years {
        let in_year: Vec<&T> = records.iter().filter(|r| r.year() == year).collect();
        let file_name = year_file_name(kind, year);
        put_json(sink, &file_name, &in_year)?;
        debug!(file = %file_name, records = in_year.len(), "Published year partition");
    }
    Ok(())
}

/// Distinct non-empty years, newest first.
///
/// Numeric years compare as numbers; anything else sorts after them.
pub fn available_years<'a, I>(years: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: BTreeSet<&str> = years.into_iter().filter(|y| !y.is_empty()).collect();
    let mut years: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    years.sort_by(|a, b| match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(na), Ok(nb)) => nb.cmp(&na).then_with(|| b.cmp(a)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => b.cmp(a),
    });
    years
}

pub fn publish_years_index<S>(sink: &S, years: &[String]) -> Result<(), SinkError>
where
    S: ArtifactSink + ?Sized,
{
    let index = YearsIndex {
        years: years.to_vec(),
    };
    put_json(sink, YEARS_FILE, &index)?;
    info!(years = years.len(), "Published years index");
    Ok(())
}
