//! Query engine: date cutoff plus type/month/year predicates.

use chrono::{DateTime, Utc};
use stargaze_common::{EventRecord, FilterSpec};

/// True unless the event starts strictly before `now`.
pub fn is_upcoming(event: &EventRecord, now: DateTime<Utc>) -> bool {
    event.date >= now
}

/// Upcoming events matching `filter`, in input order.
pub fn query<'a>(
    events: &'a [EventRecord],
    filter: &FilterSpec,
    now: DateTime<Utc>,
) -> Vec<&'a EventRecord> {
    events
        .iter()
        .filter(|e| is_upcoming(e, now) && filter.matches(e))
        .collect()
}
