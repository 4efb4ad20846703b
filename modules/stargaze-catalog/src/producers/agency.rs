//! Built-in space-agency calendar.
//!
//! Stands in for public agency calendars until a real feed is configured.
//! Events are scheduled at fixed day offsets from the clock's current day,
//! 10:00 UTC, so two fetches on the same day return identical records.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use stargaze_common::{EventRecord, EventSource, EventType};

use super::EventProducer;
use crate::clock::Clock;
use crate::error::ProducerError;

struct AgencyEntry {
    slug: &'static str,
    days_ahead: i64,
    title: &'static str,
    description: &'static str,
    long_description: &'static str,
    kind: EventType,
    location: &'static str,
    source: EventSource,
    tips: [&'static str; 3],
}

const SCHEDULE: [AgencyEntry; 5] = [
    AgencyEntry {
        slug: "esa-telescope-launch",
        days_ahead: 22,
        title: "ESA Advanced Telescope Launch",
        description: "The European Space Agency launches its next-generation space telescope.",
        long_description: "The European Space Agency is set to launch its most advanced space telescope yet, designed to observe exoplanets and distant galaxies with unprecedented clarity. The mission is part of ESA's Cosmic Vision program and aims to expand our understanding of planetary formation and galactic evolution.",
        kind: EventType::Other,
        location: "Kourou, French Guiana",
        source: EventSource::Esa,
        tips: [
            "Watch the live stream on ESA's official website",
            "The launch window opens at 10:00 UTC",
            "The telescope will take approximately 3 months to reach its operational orbit",
        ],
    },
    AgencyEntry {
        slug: "google-spacex-satellite-deployment",
        days_ahead: 52,
        title: "Google-SpaceX Satellite Constellation Deployment",
        description: "SpaceX to deploy satellites with Google Cloud computing capabilities.",
        long_description: "Google and SpaceX are collaborating on a new satellite constellation that will provide both internet connectivity and edge computing capabilities powered by Google Cloud. This deployment represents a significant advancement in space-based computing infrastructure and could change how data is processed in remote locations.",
        kind: EventType::Other,
        location: "Low Earth Orbit",
        source: EventSource::Google,
        tips: [
            "The deployment will be visible from certain locations with binoculars",
            "SpaceX will live stream the launch and deployment",
            "Initial service availability expected within 2 months of deployment",
        ],
    },
    AgencyEntry {
        slug: "jaxa-lunar-rover-mission",
        days_ahead: 82,
        title: "JAXA Lunar Rover Mission",
        description: "Japan Aerospace Exploration Agency launches its first autonomous lunar rover.",
        long_description: "The Japan Aerospace Exploration Agency (JAXA) is launching its first fully autonomous lunar rover designed to explore the Moon's south pole region. The rover will carry instruments to analyze the lunar regolith for water ice and other resources that could support future human missions.",
        kind: EventType::Moon,
        location: "Tanegashima Space Center, Japan",
        source: EventSource::Jaxa,
        tips: [
            "The mission includes new AI navigation technologies",
            "The rover is expected to operate for at least one lunar day (14 Earth days)",
            "Scientific data will be made available to researchers worldwide",
        ],
    },
    AgencyEntry {
        slug: "google-space-research",
        days_ahead: 30,
        title: "Google Space Research Initiative",
        description: "Google announces new partnerships with space agencies for advanced research.",
        long_description: "Google is launching a major space research initiative, partnering with multiple space agencies and research institutions worldwide. The program applies machine learning to large astronomical datasets, with the aim of accelerating discoveries in astrophysics and planetary science.",
        kind: EventType::Other,
        location: "Mountain View, California",
        source: EventSource::Google,
        tips: [
            "Live stream will be available on Google's YouTube channel",
            "Research findings will be published in open-access journals",
            "The initiative includes funding opportunities for space science researchers",
        ],
    },
    AgencyEntry {
        slug: "google-lunar-mapping",
        days_ahead: 45,
        title: "Google Lunar Mapping Project",
        description: "Google to release detailed 3D maps of lunar surface using new AI analysis.",
        long_description: "Google is set to release detailed 3D maps of the lunar surface, built by analyzing data from multiple lunar missions. The maps are intended for researchers, mission planners and the general public.",
        kind: EventType::Moon,
        location: "Online Release",
        source: EventSource::Google,
        tips: [
            "Maps will be integrated into Google Earth",
            "Educational resources will be available for schools",
            "API access will be provided for researchers and developers",
        ],
    },
];

pub struct AgencyProducer {
    clock: Arc<dyn Clock>,
}

impl AgencyProducer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// The schedule as of `now`.
    pub fn events_at(now: DateTime<Utc>) -> Vec<EventRecord> {
        let launch_hour = now
            .date_naive()
            .and_hms_opt(10, 0, 0)
            .map(|t| t.and_utc())
            .unwrap_or(now);

        SCHEDULE
            .iter()
            .map(|entry| {
                let date = launch_hour + Duration::days(entry.days_ahead);
                EventRecord::new(
                    format!("{}-{}", entry.slug, date.format("%Y%m%d")),
                    entry.title,
                    entry.description,
                    date,
                    entry.kind,
                )
                .with_long_description(entry.long_description)
                .with_location(entry.location)
                .with_source(entry.source)
                .with_tips(entry.tips)
            })
            .collect()
    }
}

#[async_trait]
impl EventProducer for AgencyProducer {
    fn name(&self) -> &str {
        "space-agencies"
    }

    async fn fetch(&self) -> Result<Vec<EventRecord>, ProducerError> {
        tracing::debug!("Building space agency schedule");
        Ok(Self::events_at(self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn same_day_fetches_are_identical() {
        let morning = Utc.with_ymd_and_hms(2030, 3, 1, 6, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2030, 3, 1, 23, 0, 0).unwrap();
        assert_eq!(AgencyProducer::events_at(morning), AgencyProducer::events_at(evening));
    }

    #[test]
    fn ids_carry_the_event_date() {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 6, 0, 0).unwrap();
        let events = AgencyProducer::events_at(now);
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].id, "esa-telescope-launch-20300323");
        assert_eq!(
            events[0].date,
            Utc.with_ymd_and_hms(2030, 3, 23, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn every_event_is_in_the_future_and_sourced() {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 23, 59, 0).unwrap();
        for event in AgencyProducer::events_at(now) {
            assert!(event.date > now, "{} is not upcoming", event.id);
            assert!(event.source.is_some_and(|s| s.is_agency()));
        }
    }
}
