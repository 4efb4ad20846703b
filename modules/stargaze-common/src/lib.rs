pub mod types;
pub mod ingest;
pub mod format;
pub mod config;
pub mod error;

pub use types::*;
pub use ingest::{ingest, parse_timestamp, RawEventRecord};
pub use format::{format_date, format_time, EventDetail};
pub use config::Config;
pub use error::ValidationError;
