use std::sync::Arc;

use stargaze_common::EventRecord;
use tokio::sync::watch;

/// Latest published union, shared between the store and its readers.
///
/// Cloning yields another handle onto the same channel. Readers either
/// poll [`SharedSnapshot::current`] or await changes on a receiver from
/// [`SharedSnapshot::subscribe`]. The value is replaced wholesale and never
/// cleared.
#[derive(Clone)]
pub struct SharedSnapshot {
    tx: Arc<watch::Sender<Arc<Vec<EventRecord>>>>,
}

impl SharedSnapshot {
    pub fn new(initial: Vec<EventRecord>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Arc<Vec<EventRecord>> {
        self.tx.borrow().clone()
    }

    pub fn publish(&self, events: Vec<EventRecord>) {
        self.tx.send_replace(Arc::new(events));
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<EventRecord>>> {
        self.tx.subscribe()
    }

    pub fn find(&self, id: &str) -> Option<EventRecord> {
        self.tx.borrow().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SharedSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSnapshot")
            .field("len", &self.len())
            .finish()
    }
}
