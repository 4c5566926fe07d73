use crate::record::RecordKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a researchmap export into rows.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The export needs a preamble line followed by the header line.
    #[error("{} has no header line", .path.display())]
    MissingHeader { path: PathBuf },
}

/// Failure to publish a single artifact.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise {file_name}: {source}")]
    Serialize {
        file_name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("loading {kind} failed: {source}")]
    Load {
        kind: RecordKind,
        #[source]
        source: TableError,
    },

    #[error(transparent)]
    Publish(#[from] SinkError),
}
