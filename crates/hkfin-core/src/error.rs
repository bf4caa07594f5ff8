//! Error types for hkfin

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A tool argument the caller supplied could not be interpreted
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Upstream payload did not have the expected shape or values
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The upstream answered but flagged the request as unsuccessful
    #[error("API error: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, Error>;
