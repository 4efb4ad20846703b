use serde::Serialize;
use stargaze_common::{EventRecord, EventSource};

/// User-facing messages describing a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Notice {
    NoMatches,
    FromGoogle(usize),
    FromAgencies(usize),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::NoMatches => write!(
                f,
                "No events found matching your filters. Try adjusting your filters to see more events."
            ),
            Notice::FromGoogle(n) => write!(f, "Found {n} events from Google space research collaborations"),
            Notice::FromAgencies(n) => write!(
                f,
                "Loaded {n} space agency events, including ESA, JAXA, CSA and Google collaborations"
            ),
        }
    }
}

pub fn notices<'a>(results: impl IntoIterator<Item = &'a EventRecord>) -> Vec<Notice> {
    let mut total = 0;
    let mut google = 0;
    let mut agency = 0;
    for event in results {
        total += 1;
        if let Some(source) = event.source {
            if source == EventSource::Google {
                google += 1;
            }
            if source.is_agency() {
                agency += 1;
            }
        }
    }

    if total == 0 {
        return vec![Notice::NoMatches];
    }
    let mut out = Vec::new();
    if google > 0 {
        out.push(Notice::FromGoogle(google));
    }
    if agency > 0 && agency != google {
        out.push(Notice::FromAgencies(agency));
    }
    out
}
