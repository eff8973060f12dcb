use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the chat analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A continuation line appeared before any message header.
    #[error("Line {line}: text before the first message header: {text:?}")]
    Structural { line: usize, text: String },

    /// A header's date or time is not valid under the selected date order.
    #[error("Line {line}: invalid date or time in header: {text:?}")]
    DateFormat { line: usize, text: String },

    /// A transcript file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A date-order string is neither `dd-mm-yy` nor `mm-dd-yy`.
    #[error("Invalid date format: {0} (expected dd-mm-yy or mm-dd-yy)")]
    InvalidDateOrder(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
