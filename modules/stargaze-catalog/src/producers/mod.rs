//! Producers: the external sources that fill the refreshable partitions.
//!
//! Every producer is behind [`EventProducer`] so the store can be driven by
//! deterministic fakes in tests.

pub mod agency;
pub mod file;
pub mod planetary;

pub use agency::AgencyProducer;
pub use file::FileProducer;
pub use planetary::PlanetaryProducer;

use async_trait::async_trait;
use stargaze_common::EventRecord;

use crate::error::ProducerError;

#[async_trait]
pub trait EventProducer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the producer's full current set of events.
    async fn fetch(&self) -> Result<Vec<EventRecord>, ProducerError>;
}

/// Fixed list of events.
pub struct StaticProducer {
    name: String,
    events: Vec<EventRecord>,
}

impl StaticProducer {
    pub fn new(name: impl Into<String>, events: Vec<EventRecord>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

#[async_trait]
impl EventProducer for StaticProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<EventRecord>, ProducerError> {
        Ok(self.events.clone())
    }
}
