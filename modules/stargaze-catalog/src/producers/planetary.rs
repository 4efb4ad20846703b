//! Planetary producer: APOD, near-Earth asteroids, ISS positions and the
//! NASA mission schedule, fetched in parallel and merged by date.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use nasa_client::{ApodResponse, Asteroid, IssClient, NasaClient, NeoFeedResponse, SatellitePosition};
use stargaze_common::{parse_timestamp, EventRecord, EventSource, EventType};
use tracing::{info, warn};

use super::EventProducer;
use crate::clock::Clock;
use crate::error::ProducerError;

const APOD_PAGE_URL: &str = "https://apod.nasa.gov/apod/astropix.html";
const APOD_SUMMARY_CHARS: usize = 150;
const NEO_MAX_PER_DAY: usize = 5;
const NEO_WINDOW_DAYS: i64 = 7;
const ISS_ORBIT_MINUTES: i64 = 90;
const ISS_PREDICTIONS: i64 = 5;

pub struct PlanetaryProducer {
    nasa: NasaClient,
    iss: IssClient,
    clock: Arc<dyn Clock>,
}

impl PlanetaryProducer {
    pub fn new(nasa: NasaClient, iss: IssClient, clock: Arc<dyn Clock>) -> Self {
        Self { nasa, iss, clock }
    }

    async fn fetch_apod(&self) -> Result<Vec<EventRecord>, ProducerError> {
        let apod = self.nasa.apod().await?;
        Ok(apod_event(&apod).into_iter().collect())
    }

    async fn fetch_asteroids(&self, now: DateTime<Utc>) -> Result<Vec<EventRecord>, ProducerError> {
        let today = now.date_naive();
        let feed = self
            .nasa
            .neo_feed(today, today + Duration::days(NEO_WINDOW_DAYS))
            .await?;
        Ok(asteroid_events(&feed, now))
    }

    async fn fetch_iss(&self, now: DateTime<Utc>) -> Result<Vec<EventRecord>, ProducerError> {
        let position = self.iss.position_at(now.timestamp()).await?;
        Ok(iss_events(&position, now))
    }
}

#[async_trait]
impl EventProducer for PlanetaryProducer {
    fn name(&self) -> &str {
        "nasa"
    }

    async fn fetch(&self) -> Result<Vec<EventRecord>, ProducerError> {
        let now = self.clock.now();
        let (apod, asteroids, iss) = tokio::join!(
            self.fetch_apod(),
            self.fetch_asteroids(now),
            self.fetch_iss(now)
        );

        let mut events = Vec::new();
        let mut failures = 0;
        for (source, result) in [("apod", apod), ("neo", asteroids), ("iss", iss)] {
            match result {
                Ok(batch) => events.extend(batch),
                Err(e) => {
                    failures += 1;
                    warn!(source, error = %e, "Planetary sub-source failed");
                }
            }
        }
        if failures == 3 {
            return Err(ProducerError::Unavailable(self.name().to_string()));
        }

        events.extend(mission_events(now));
        events.sort_by_key(|e| e.date);
        info!(count = events.len(), failures, "Fetched planetary events");
        Ok(events)
    }
}

/// APOD as an `other` event dated on the picture's day.
pub fn apod_event(apod: &ApodResponse) -> Option<EventRecord> {
    let Some(date) = parse_timestamp(&apod.date) else {
        warn!(date = %apod.date, "APOD date does not parse, skipping");
        return None;
    };
    let summary: String = apod.explanation.chars().take(APOD_SUMMARY_CHARS).collect();

    Some(
        EventRecord::new(
            format!("apod-{}", apod.date),
            apod.title.clone(),
            format!("{summary}..."),
            date,
            EventType::Other,
        )
        .with_long_description(apod.explanation.clone())
        .with_image_url(apod.url.clone())
        .with_info_url(APOD_PAGE_URL)
        .with_source(EventSource::Nasa)
        .with_tips([
            "View the high-resolution image on NASA's website",
            "Check back tomorrow for a new astronomy picture",
        ]),
    )
}

/// Hazardous, close (under 10 lunar distances) or large (over 0.5 km).
pub fn is_notable(asteroid: &Asteroid) -> bool {
    let close = asteroid
        .first_approach()
        .and_then(|a| a.lunar_distance())
        .is_some_and(|lunar| lunar < 10.0);
    asteroid.is_potentially_hazardous_asteroid || close || asteroid.max_diameter_km() > 0.5
}

/// Size plus proximity, capped at 10.
pub fn asteroid_intensity(diameter_km: f64, lunar_distance: f64) -> u8 {
    let proximity = 10.0 - (lunar_distance / 5.0).min(10.0);
    (diameter_km * 5.0 + proximity).round().clamp(0.0, 10.0) as u8
}

/// Notable upcoming approaches, at most five per feed day, in feed order.
pub fn asteroid_events(feed: &NeoFeedResponse, now: DateTime<Utc>) -> Vec<EventRecord> {
    let mut events = Vec::new();
    for asteroids in feed.near_earth_objects.values() {
        for asteroid in asteroids.iter().filter(|a| is_notable(a)).take(NEO_MAX_PER_DAY) {
            let Some(approach) = asteroid.first_approach() else {
                continue;
            };
            let Some(date) = parse_timestamp(&approach.close_approach_date) else {
                warn!(
                    asteroid = %asteroid.id,
                    date = %approach.close_approach_date,
                    "Close approach date does not parse, skipping"
                );
                continue;
            };
            if date < now {
                continue;
            }

            let lunar = approach.lunar_distance().unwrap_or(f64::INFINITY);
            let size = asteroid.max_diameter_km();
            let mut long_description = format!(
                "This asteroid has an estimated diameter of {size:.2} km and will pass {} km from Earth at a velocity of {} km/h.",
                approach.miss_distance.kilometers, approach.relative_velocity.kilometers_per_hour
            );
            if asteroid.is_potentially_hazardous_asteroid {
                long_description.push_str(" NASA classifies this asteroid as potentially hazardous.");
            }

            events.push(
                EventRecord::new(
                    format!("asteroid-{}", asteroid.id),
                    format!("Near Earth Asteroid: {}", asteroid.name),
                    format!(
                        "Asteroid passing within {} lunar distances of Earth.",
                        lunar.round()
                    ),
                    date,
                    EventType::Asteroid,
                )
                .with_long_description(long_description)
                .with_external_id(asteroid.id.clone())
                .with_info_url(asteroid.nasa_jpl_url.clone())
                .with_intensity(asteroid_intensity(size, lunar))
                .with_visibility(3)
                .with_source(EventSource::Nasa)
                .with_tips([
                    "Asteroids are typically not visible to the naked eye",
                    "Professional telescopes track these objects",
                    "This information is provided for astronomical interest",
                ]),
            );
        }
    }
    events
}

/// Current ISS position plus rough predictions one orbit apart.
pub fn iss_events(position: &SatellitePosition, now: DateTime<Utc>) -> Vec<EventRecord> {
    let (lat, lng) = (position.latitude, position.longitude);
    let mut events = vec![EventRecord::new(
        format!("iss-{}", now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        "ISS Current Position",
        format!("The International Space Station is currently over {lat:.2}° lat, {lng:.2}° long."),
        now,
        EventType::Iss,
    )
    .with_long_description(
        "The International Space Station (ISS) is a large spacecraft in orbit around Earth. It serves as a home where crews of astronauts and cosmonauts live and conduct research. The space station flies at an average altitude of 400 kilometers above Earth.",
    )
    .with_location(format!("Above {lat:.2}° lat, {lng:.2}° long"))
    .with_coordinates(lat, lng)
    .with_visibility(7)
    .with_source(EventSource::Nasa)
    .with_tips([
        "The ISS appears as a bright, fast-moving star in the night sky",
        "Best viewed shortly after sunset or before sunrise",
        "Completes an orbit around Earth every 90 minutes",
    ])];

    for i in 1..=ISS_PREDICTIONS {
        let date = now + Duration::minutes(i * ISS_ORBIT_MINUTES);
        let (p_lat, p_lng) = predicted_position(lat, lng, i);
        events.push(
            EventRecord::new(
                format!(
                    "iss-future-{i}-{}",
                    date.to_rfc3339_opts(SecondsFormat::Millis, true)
                ),
                "Predicted ISS Position",
                format!("The ISS is predicted to be over {p_lat:.2}° lat, {p_lng:.2}° long."),
                date,
                EventType::Iss,
            )
            .with_long_description(
                "This is a predicted position of the International Space Station based on its current orbit. The ISS completes an orbit around Earth every 90 minutes at an average altitude of 400 kilometers.",
            )
            .with_location(format!("Predicted position: {p_lat:.2}° lat, {p_lng:.2}° long"))
            .with_coordinates(p_lat, p_lng)
            .with_visibility(7)
            .with_source(EventSource::Nasa)
            .with_tips([
                "The ISS appears as a bright, fast-moving star in the night sky",
                "Best viewed shortly after sunset or before sunrise",
                "This is a predicted position and may vary slightly",
            ]),
        );
    }
    events
}

/// Coarse offset per orbit. Latitude is clamped to the poles and longitude
/// wrapped into [-180, 180).
fn predicted_position(lat: f64, lng: f64, orbit: i64) -> (f64, f64) {
    let p_lat = (lat + ((orbit * 15) % 180) as f64 - 90.0).clamp(-90.0, 90.0);
    let p_lng = (lng + ((orbit * 20) % 360) as f64 - 180.0 + 180.0).rem_euclid(360.0) - 180.0;
    (p_lat, p_lng)
}

/// Upcoming NASA missions, scheduled relative to `now`.
pub fn mission_events(now: DateTime<Utc>) -> Vec<EventRecord> {
    vec![
        EventRecord::new(
            "mission-artemis-2",
            "Artemis II Mission",
            "NASA's Artemis II will be the first crewed mission to orbit the Moon since Apollo.",
            now + Duration::days(45),
            EventType::Spacewalk,
        )
        .with_long_description(
            "The Artemis II mission will send four astronauts in the Orion spacecraft into lunar orbit, testing NASA's capabilities to send humans back to the Moon and eventually to Mars. This will be the first crewed mission of the Artemis program and will test critical systems with humans on board.",
        )
        .with_info_url("https://www.nasa.gov/mission/artemis-ii/")
        .with_source(EventSource::Nasa)
        .with_tips([
            "Watch live coverage on NASA TV",
            "Follow NASA's social media for updates",
            "The mission duration is approximately 10 days",
        ]),
        EventRecord::new(
            "mission-europa-clipper",
            "Europa Clipper Launch",
            "Launch of the mission to study Jupiter's moon Europa.",
            now + Duration::days(90),
            EventType::Other,
        )
        .with_long_description(
            "The Europa Clipper mission will conduct detailed reconnaissance of Jupiter's moon Europa to determine whether the icy moon could harbor conditions suitable for life. The spacecraft will make about 45 close passes over Europa, shifting its flight path for each flyby so that it eventually scans nearly the entire moon.",
        )
        .with_info_url("https://europa.nasa.gov/")
        .with_source(EventSource::Nasa)
        .with_tips([
            "The mission will launch on a SpaceX Falcon Heavy rocket",
            "It will take several years to reach Jupiter",
            "Europa is believed to have a subsurface ocean of liquid water",
        ]),
        EventRecord::new(
            "mission-psyche",
            "Psyche Mission Asteroid Arrival",
            "NASA's Psyche spacecraft will reach the metal-rich asteroid.",
            now + Duration::days(180),
            EventType::Asteroid,
        )
        .with_long_description(
            "The Psyche mission will explore a metal-rich asteroid of the same name, which appears to be the exposed nickel-iron core of an early planet. The mission offers a window into the collisions and accretion that created terrestrial planets like Earth.",
        )
        .with_info_url("https://www.nasa.gov/mission/psyche/")
        .with_source(EventSource::Nasa)
        .with_tips([
            "This is the first mission to a metal asteroid",
            "Scientists believe the asteroid may be the core of an early planet",
            "The mission will help understand how planets form",
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn asteroid(id: &str, hazardous: bool, diameter_km: f64, lunar: &str, date: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("({id})"),
            "nasa_jpl_url": format!("https://ssd.jpl.nasa.gov/?sstr={id}"),
            "absolute_magnitude_h": 22.1,
            "estimated_diameter": {
                "kilometers": {
                    "estimated_diameter_min": diameter_km / 2.0,
                    "estimated_diameter_max": diameter_km
                }
            },
            "is_potentially_hazardous_asteroid": hazardous,
            "close_approach_data": [{
                "close_approach_date": date,
                "close_approach_date_full": null,
                "epoch_date_close_approach": 0,
                "relative_velocity": {
                    "kilometers_per_second": "10.0",
                    "kilometers_per_hour": "36000.0",
                    "miles_per_hour": "22369.4"
                },
                "miss_distance": {
                    "astronomical": "0.1",
                    "lunar": lunar,
                    "kilometers": "15000000.0",
                    "miles": "9320567.0"
                },
                "orbiting_body": "Earth"
            }]
        })
    }

    #[test]
    fn apod_summary_is_truncated_with_ellipsis() {
        let apod = ApodResponse {
            date: "2030-03-01".to_string(),
            explanation: "x".repeat(400),
            title: "Nebula".to_string(),
            url: "https://apod.nasa.gov/a.jpg".to_string(),
            hdurl: None,
            media_type: Some("image".to_string()),
            service_version: None,
        };
        let event = apod_event(&apod).unwrap();
        assert_eq!(event.id, "apod-2030-03-01");
        assert_eq!(event.description.len(), 153);
        assert!(event.description.ends_with("..."));
        assert_eq!(event.long_description.as_deref().map(str::len), Some(400));
        assert_eq!(event.date, Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn apod_with_bad_date_is_skipped() {
        let apod = ApodResponse {
            date: "today".to_string(),
            explanation: "x".to_string(),
            title: "t".to_string(),
            url: "u".to_string(),
            hdurl: None,
            media_type: None,
            service_version: None,
        };
        assert!(apod_event(&apod).is_none());
    }

    #[test]
    fn intensity_combines_size_and_proximity() {
        assert_eq!(asteroid_intensity(0.2, 9.88), 9);
        assert_eq!(asteroid_intensity(0.05, 80.0), 0);
        assert_eq!(asteroid_intensity(3.0, 1.0), 10);
    }

    #[test]
    fn only_notable_upcoming_asteroids_become_events() {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap();
        let feed: NeoFeedResponse = serde_json::from_value(json!({
            "element_count": 4,
            "near_earth_objects": {
                "2030-03-01": [asteroid("past", true, 0.3, "4.0", "2030-03-01")],
                "2030-03-03": [
                    asteroid("hazard", true, 0.1, "40.0", "2030-03-03"),
                    asteroid("boring", false, 0.1, "40.0", "2030-03-03"),
                    asteroid("close", false, 0.01, "3.5", "2030-03-03"),
                    asteroid("big", false, 0.9, "60.0", "2030-03-03")
                ]
            }
        }))
        .unwrap();

        let events = asteroid_events(&feed, now);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["asteroid-hazard", "asteroid-close", "asteroid-big"]);
        assert!(events[0]
            .long_description
            .as_deref()
            .unwrap()
            .ends_with("potentially hazardous."));
        assert_eq!(events[1].description, "Asteroid passing within 4 lunar distances of Earth.");
        assert!(events.iter().all(|e| e.visibility == Some(3)));
    }

    #[test]
    fn at_most_five_asteroids_per_day() {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).unwrap();
        let day: Vec<_> = (0..8)
            .map(|i| asteroid(&format!("a{i}"), true, 0.2, "20.0", "2030-03-02"))
            .collect();
        let feed: NeoFeedResponse = serde_json::from_value(json!({
            "element_count": 8,
            "near_earth_objects": { "2030-03-02": day }
        }))
        .unwrap();
        assert_eq!(asteroid_events(&feed, now).len(), 5);
    }

    #[test]
    fn iss_events_span_five_orbits() {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).unwrap();
        let position = SatellitePosition {
            name: "iss".to_string(),
            id: 25544,
            latitude: 10.0,
            longitude: 170.0,
            altitude: 420.0,
            velocity: 27600.0,
            visibility: None,
            timestamp: now.timestamp(),
        };
        let events = iss_events(&position, now);
        assert_eq!(events.len(), 6);
        assert_eq!(events[0].date, now);
        assert_eq!(events[0].id, "iss-2030-03-01T00:00:00.000Z");
        assert_eq!(events[5].date, now + Duration::minutes(450));
        assert!(events.iter().all(|e| e.source == Some(EventSource::Nasa)));
        for e in &events {
            let c = e.coordinates.unwrap();
            assert!((-90.0..=90.0).contains(&c.lat));
            assert!((-180.0..180.0).contains(&c.lng));
        }
    }

    #[test]
    fn missions_are_scheduled_ahead() {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).unwrap();
        let missions = mission_events(now);
        assert_eq!(missions.len(), 3);
        assert_eq!(missions[0].date, now + Duration::days(45));
        assert_eq!(missions[2].kind, EventType::Asteroid);
    }
}
