use thiserror::Error;

/// Convenience result type for dataset loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Failure to fetch or parse the salary dataset.
///
/// Fatal for the session: the shell reports it and does not retry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The HTTP request itself failed (DNS, TLS, connection, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A required source column is absent.
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// A cell could not be read as its column's type.
    #[error("invalid value at row {row} column '{column}': {message}")]
    InvalidValue {
        row: usize,
        column: String,
        message: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}
