//! EventStore: three independently refreshed partitions and their union.
//!
//! Each refresh draws a ticket for its partition before calling the
//! producer. A completed fetch is applied only if its ticket is still the
//! latest one issued, so a slow response can never overwrite a newer one.
//! Failed fetches leave the partition as it was.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use stargaze_common::EventRecord;
use tracing::{debug, info, warn};

use crate::producers::EventProducer;
use crate::snapshot::SharedSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Seed,
    /// Producer A: planetary and space data.
    Planetary,
    /// Producer B: space-agency calendars.
    Agency,
}

impl Partition {
    /// Scan and union order.
    pub const ORDER: [Partition; 3] = [Partition::Seed, Partition::Planetary, Partition::Agency];
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Partition::Seed => write!(f, "seed"),
            Partition::Planetary => write!(f, "planetary"),
            Partition::Agency => write!(f, "agency"),
        }
    }
}

/// What happened to one partition during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The partition now holds `count` records.
    Applied { count: usize },
    /// The fetch succeeded but a newer refresh had been issued meanwhile.
    Superseded { count: usize },
    /// The fetch failed; the previous contents were kept.
    Failed { error: String },
    /// Nothing to refresh (the seed partition).
    Skipped,
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub planetary: RefreshOutcome,
    pub agency: RefreshOutcome,
}

impl std::fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let describe = |o: &RefreshOutcome| match o {
            RefreshOutcome::Applied { count } => format!("{count} applied"),
            RefreshOutcome::Superseded { count } => format!("{count} superseded"),
            RefreshOutcome::Failed { error } => format!("failed ({error})"),
            RefreshOutcome::Skipped => "skipped".to_string(),
        };
        write!(
            f,
            "planetary: {}, agency: {}",
            describe(&self.planetary),
            describe(&self.agency)
        )
    }
}

struct Slot {
    events: RwLock<Arc<Vec<EventRecord>>>,
    issued: AtomicU64,
}

impl Slot {
    fn new(events: Vec<EventRecord>) -> Self {
        Self {
            events: RwLock::new(Arc::new(events)),
            issued: AtomicU64::new(0),
        }
    }

    fn read(&self) -> Arc<Vec<EventRecord>> {
        self.events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn issue_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the contents if `ticket` is still the latest issued.
    fn apply(&self, ticket: u64, events: Vec<EventRecord>) -> bool {
        let mut guard = self.events.write().unwrap_or_else(|e| e.into_inner());
        if self.issued.load(Ordering::SeqCst) != ticket {
            return false;
        }
        *guard = Arc::new(events);
        true
    }
}

/// In-memory event catalog. Share it behind an `Arc`.
pub struct EventStore {
    seed: Slot,
    planetary: Slot,
    agency: Slot,
    planetary_producer: Arc<dyn EventProducer>,
    agency_producer: Arc<dyn EventProducer>,
    snapshot: SharedSnapshot,
    publish_lock: Mutex<()>,
}

impl EventStore {
    /// The snapshot starts out holding the seed.
    pub fn new(
        seed: Vec<EventRecord>,
        planetary: Arc<dyn EventProducer>,
        agency: Arc<dyn EventProducer>,
    ) -> Self {
        let snapshot = SharedSnapshot::new(seed.clone());
        Self {
            seed: Slot::new(seed),
            planetary: Slot::new(Vec::new()),
            agency: Slot::new(Vec::new()),
            planetary_producer: planetary,
            agency_producer: agency,
            snapshot,
            publish_lock: Mutex::new(()),
        }
    }

    /// Publish into an existing snapshot handle instead of a private one.
    /// Its current contents are left as they are until the first refresh.
    pub fn with_snapshot(mut self, snapshot: SharedSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn snapshot(&self) -> &SharedSnapshot {
        &self.snapshot
    }

    fn slot(&self, partition: Partition) -> &Slot {
        match partition {
            Partition::Seed => &self.seed,
            Partition::Planetary => &self.planetary,
            Partition::Agency => &self.agency,
        }
    }

    fn producer(&self, partition: Partition) -> Option<&Arc<dyn EventProducer>> {
        match partition {
            Partition::Seed => None,
            Partition::Planetary => Some(&self.planetary_producer),
            Partition::Agency => Some(&self.agency_producer),
        }
    }

    /// Current contents of one partition.
    pub fn partition(&self, partition: Partition) -> Arc<Vec<EventRecord>> {
        self.slot(partition).read()
    }

    /// Seed, then planetary, then agency. No de-duplication.
    pub fn current_union(&self) -> Vec<EventRecord> {
        let parts: Vec<_> = Partition::ORDER.iter().map(|p| self.partition(*p)).collect();
        let mut union = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
        for part in parts {
            union.extend(part.iter().cloned());
        }
        union
    }

    /// First match across seed, planetary, agency, then the snapshot.
    pub fn get_by_id(&self, id: &str) -> Option<EventRecord> {
        Partition::ORDER
            .iter()
            .find_map(|p| self.partition(*p).iter().find(|e| e.id == id).cloned())
            .or_else(|| self.snapshot.find(id))
    }

    /// Refresh producer A. Returns the fetched records, or nothing on failure.
    pub async fn refresh_planetary(&self) -> Vec<EventRecord> {
        self.refresh(Partition::Planetary).await
    }

    /// Refresh producer B. Returns the fetched records, or nothing on failure.
    pub async fn refresh_agency(&self) -> Vec<EventRecord> {
        self.refresh(Partition::Agency).await
    }

    /// The returned records are what the producer sent. They may not be what
    /// the partition holds if a newer refresh was issued meanwhile.
    pub async fn refresh(&self, partition: Partition) -> Vec<EventRecord> {
        self.run_refresh(partition).await.0
    }

    /// Refresh both producers concurrently.
    pub async fn refresh_all(&self) -> RefreshReport {
        let (planetary, agency) = tokio::join!(
            self.run_refresh(Partition::Planetary),
            self.run_refresh(Partition::Agency)
        );
        let report = RefreshReport {
            planetary: planetary.1,
            agency: agency.1,
        };
        info!(%report, union = self.union_len(), "Refresh cycle complete");
        report
    }

    fn union_len(&self) -> usize {
        Partition::ORDER.iter().map(|p| self.partition(*p).len()).sum()
    }

    async fn run_refresh(&self, partition: Partition) -> (Vec<EventRecord>, RefreshOutcome) {
        let Some(producer) = self.producer(partition) else {
            return (Vec::new(), RefreshOutcome::Skipped);
        };
        let slot = self.slot(partition);
        let ticket = slot.issue_ticket();

        match producer.fetch().await {
            Ok(events) => {
                let count = events.len();
                if slot.apply(ticket, events.clone()) {
                    info!(%partition, producer = producer.name(), count, "Partition refreshed");
                    self.publish();
                    (events, RefreshOutcome::Applied { count })
                } else {
                    debug!(
                        %partition,
                        producer = producer.name(),
                        ticket,
                        "Discarding superseded refresh"
                    );
                    (events, RefreshOutcome::Superseded { count })
                }
            }
            Err(e) => {
                warn!(
                    %partition,
                    producer = producer.name(),
                    error = %e,
                    "Refresh failed, keeping previous partition"
                );
                (
                    Vec::new(),
                    RefreshOutcome::Failed {
                        error: e.to_string(),
                    },
                )
            }
        }
    }

    fn publish(&self) {
        let _guard = self.publish_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.snapshot.publish(self.current_union());
    }
}

impl std::fmt::Debug for EventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStore")
            .field("seed", &self.seed.read().len())
            .field("planetary", &self.planetary.read().len())
            .field("agency", &self.agency.read().len())
            .field("snapshot", &self.snapshot)
            .finish()
    }
}
