use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stargaze_common::{ingest, EventRecord, RawEventRecord};
use tracing::{info, warn};

use super::EventProducer;
use crate::error::ProducerError;

/// Reads a JSON array of event records from disk on every fetch.
pub struct FileProducer {
    path: PathBuf,
    name: String,
}

impl FileProducer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventProducer for FileProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<EventRecord>, ProducerError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ProducerError::Io {
                path: self.path.clone(),
                source,
            })?;
        let raw: Vec<RawEventRecord> = serde_json::from_str(&body)?;
        let received = raw.len();

        let (events, rejected) = ingest(raw);
        if !rejected.is_empty() {
            warn!(
                path = %self.path.display(),
                rejected = rejected.len(),
                received,
                "Dropped invalid records from feed file"
            );
        }
        info!(path = %self.path.display(), count = events.len(), "Loaded feed file");
        Ok(events)
    }
}
