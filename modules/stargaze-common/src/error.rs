use thiserror::Error;

/// Reasons a raw record is refused at ingestion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("event {id}: {field} is not a valid timestamp: {value:?}")]
    MalformedDate {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("event {id}: {field} must be between 1 and 10, got {value}")]
    OutOfRange {
        id: String,
        field: &'static str,
        value: i64,
    },

    #[error("event {id}: unknown {field} {value:?}")]
    UnknownVariant {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("event record is missing an id")]
    MissingId,
}
