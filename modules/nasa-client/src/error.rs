use thiserror::Error;

pub type Result<T> = std::result::Result<T, NasaError>;

#[derive(Debug, Error)]
pub enum NasaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for NasaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NasaError::Parse(err.to_string())
        } else {
            NasaError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NasaError {
    fn from(err: serde_json::Error) -> Self {
        NasaError::Parse(err.to_string())
    }
}
