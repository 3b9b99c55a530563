//! Error types for Inkpress.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    // Validation errors
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Unsupported featured image content type: {mime}")]
    UnsupportedMediaType { mime: String },

    #[error("Featured image exceeds size limit of {limit_bytes} bytes")]
    MediaTooLarge { limit_bytes: u64 },

    // Remote boundary errors
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Empty completion from model: {0}")]
    EmptyCompletion(String),

    // Infrastructure errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
