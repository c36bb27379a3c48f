use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Data/Source is empty")]
    EmptyTable,

    #[error("Required argument '{0}' is empty")]
    EmptyArgument(&'static str),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Line {0}: expected a JSON object")]
    NotAnObject(usize),

    #[error("Column '{column}' holds a non-text value at row {row}")]
    NonTextCell { column: String, row: usize },

    #[error("Unknown JSON format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type Result<T> = std::result::Result<T, CleanError>;
