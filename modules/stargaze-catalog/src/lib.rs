//! Astronomy event catalog: partitioned store, query engine, pagination
//! and the producers that feed it.

pub mod calendar;
pub mod clock;
pub mod error;
pub mod notices;
pub mod page;
pub mod producers;
pub mod query;
pub mod seed;
pub mod snapshot;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use calendar::{spawn_periodic, Calendar, CalendarView};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{PageError, ProducerError};
pub use notices::{notices, Notice};
pub use page::{Page, Paginator, DEFAULT_PAGE_SIZE};
pub use producers::{
    AgencyProducer, EventProducer, FileProducer, PlanetaryProducer, StaticProducer,
};
pub use query::{is_upcoming, query};
pub use seed::seed_events;
pub use snapshot::SharedSnapshot;
pub use store::{EventStore, Partition, RefreshOutcome, RefreshReport};
