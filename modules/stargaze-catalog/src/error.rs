use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("NASA request failed: {0}")]
    Nasa(#[from] nasa_client::NasaError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0} unavailable: every upstream source failed")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ProducerError {
    fn from(err: serde_json::Error) -> Self {
        ProducerError::Parse(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("page {index} is out of range ({total_pages} pages)")]
    OutOfRange { index: usize, total_pages: usize },
}
