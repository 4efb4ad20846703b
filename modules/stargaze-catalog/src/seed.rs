//! Built-in sample events, present from process start.

use stargaze_common::{ingest, EventRecord, RawEventRecord};
use tracing::error;

const SEED_JSON: &str = include_str!("../data/seed.json");

pub fn seed_events() -> Vec<EventRecord> {
    let raw: Vec<RawEventRecord> = match serde_json::from_str(SEED_JSON) {
        Ok(raw) => raw,
        Err(e) => {
            error!(error = %e, "Built-in seed data is not valid JSON");
            return Vec::new();
        }
    };
    let (events, rejected) = ingest(raw);
    if !rejected.is_empty() {
        error!(rejected = rejected.len(), "Built-in seed data has invalid records");
    }
    events
}
