// Test mocks and fixtures for the catalog.
//
// - MockProducer (EventProducer): scripted responses, one per fetch
// - fixture helpers for timestamps and records

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stargaze_common::{parse_timestamp, EventRecord, EventType};
use tokio::sync::Notify;

use crate::error::ProducerError;
use crate::producers::EventProducer;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 timestamp or `YYYY-MM-DD`. Panics on bad input.
pub fn ts(value: &str) -> DateTime<Utc> {
    parse_timestamp(value).unwrap_or_else(|| panic!("bad test timestamp {value:?}"))
}

pub fn event(id: &str, date: &str, kind: EventType) -> EventRecord {
    EventRecord::new(id, id, format!("{id} description"), ts(date), kind)
}

pub fn ids(events: &[EventRecord]) -> Vec<&str> {
    events.iter().map(|e| e.id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// MockProducer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum Step {
    Ok(Vec<EventRecord>),
    Fail(String),
    /// Wait for the notify, then return the events.
    Gated(Vec<EventRecord>, Arc<Notify>),
}

/// Producer answering each fetch with the next scripted step. Once the
/// script runs out it repeats the fallback, or fails if there is none.
/// Builder pattern: `.then_ok()`, `.then_fail()`, `.then_gated()`.
pub struct MockProducer {
    name: String,
    script: Mutex<VecDeque<Step>>,
    fallback: Option<Step>,
    calls: AtomicUsize,
}

impl MockProducer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch returns `events`.
    pub fn always(name: &str, events: Vec<EventRecord>) -> Self {
        let mut mock = Self::new(name);
        mock.fallback = Some(Step::Ok(events));
        mock
    }

    /// Every fetch fails.
    pub fn failing(name: &str) -> Self {
        let mut mock = Self::new(name);
        mock.fallback = Some(Step::Fail(format!("{name} is down")));
        mock
    }

    pub fn then_ok(self, events: Vec<EventRecord>) -> Self {
        self.push(Step::Ok(events))
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.push(Step::Fail(message.to_string()))
    }

    pub fn then_gated(self, events: Vec<EventRecord>, gate: Arc<Notify>) -> Self {
        self.push(Step::Gated(events, gate))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(self, step: Step) -> Self {
        self.script.lock().unwrap().push_back(step);
        self
    }
}

#[async_trait]
impl EventProducer for MockProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<EventRecord>, ProducerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.clone());

        match step {
            Some(Step::Ok(events)) => Ok(events),
            Some(Step::Fail(message)) => Err(ProducerError::Other(message)),
            Some(Step::Gated(events, gate)) => {
                gate.notified().await;
                Ok(events)
            }
            None => Err(ProducerError::Other(format!(
                "MockProducer {}: script exhausted",
                self.name
            ))),
        }
    }
}
