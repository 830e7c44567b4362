use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a file or URL into a [`TitleTable`](super::model::TitleTable).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding parquet batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("{origin} contains no titles")]
    Empty { origin: String },
}

/// Failure to write a table back out.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding CSV: {0}")]
    Csv(#[from] csv::Error),
}
