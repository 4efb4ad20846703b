use chrono::{DateTime, Datelike, Month, Utc};
use serde::{Deserialize, Serialize};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Meteor,
    Eclipse,
    Planet,
    Moon,
    Asteroid,
    Iss,
    Spacewalk,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Meteor,
        EventType::Eclipse,
        EventType::Planet,
        EventType::Moon,
        EventType::Asteroid,
        EventType::Iss,
        EventType::Spacewalk,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Meteor => "meteor",
            EventType::Eclipse => "eclipse",
            EventType::Planet => "planet",
            EventType::Moon => "moon",
            EventType::Asteroid => "asteroid",
            EventType::Iss => "iss",
            EventType::Spacewalk => "spacewalk",
            EventType::Other => "other",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| format!("unknown event type: {s}"))
    }
}

/// Provenance of an event. Only used for messaging, never for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Nasa,
    Google,
    Esa,
    Jaxa,
    Csa,
    Roscosmos,
    Other,
}

impl EventSource {
    pub const ALL: [EventSource; 7] = [
        EventSource::Nasa,
        EventSource::Google,
        EventSource::Esa,
        EventSource::Jaxa,
        EventSource::Csa,
        EventSource::Roscosmos,
        EventSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::Nasa => "nasa",
            EventSource::Google => "google",
            EventSource::Esa => "esa",
            EventSource::Jaxa => "jaxa",
            EventSource::Csa => "csa",
            EventSource::Roscosmos => "roscosmos",
            EventSource::Other => "other",
        }
    }

    /// Sources counted as "space agency" in result notices.
    pub fn is_agency(&self) -> bool {
        matches!(
            self,
            EventSource::Esa | EventSource::Jaxa | EventSource::Csa | EventSource::Google
        )
    }
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        EventSource::ALL
            .into_iter()
            .find(|src| src.as_str() == lower)
            .ok_or_else(|| format!("unknown event source: {s}"))
    }
}

// --- Event record ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A validated astronomy event. Construct from untrusted input through
/// [`crate::ingest`]; every timestamp here is already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_events: Vec<String>,
}

impl EventRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
        kind: EventType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            long_description: None,
            date,
            end_date: None,
            kind,
            location: None,
            peak_time: None,
            intensity: None,
            visibility: None,
            tips: Vec::new(),
            coordinates: None,
            source: None,
            image_url: None,
            info_url: None,
            external_id: None,
            related_events: Vec::new(),
        }
    }

    pub fn with_long_description(mut self, text: impl Into<String>) -> Self {
        self.long_description = Some(text.into());
        self
    }

    pub fn with_end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_peak_time(mut self, peak: DateTime<Utc>) -> Self {
        self.peak_time = Some(peak);
        self
    }

    /// Values are clamped into 1..=10.
    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = Some(intensity.clamp(1, 10));
        self
    }

    /// Values are clamped into 1..=10.
    pub fn with_visibility(mut self, visibility: u8) -> Self {
        self.visibility = Some(visibility.clamp(1, 10));
        self
    }

    pub fn with_tips<I, S>(mut self, tips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tips = tips.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates { lat, lng });
        self
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_info_url(mut self, url: impl Into<String>) -> Self {
        self.info_url = Some(url.into());
        self
    }

    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Text for the detail view: the long description when present.
    pub fn detail_text(&self) -> &str {
        self.long_description.as_deref().unwrap_or(&self.description)
    }
}

// --- Filter ---

/// User-selected restriction. `None` on any field means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, rename = "type")]
    pub kind: Option<EventType>,
    #[serde(default)]
    pub month: Option<Month>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl FilterSpec {
    /// The all-wildcard filter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, kind: EventType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind.is_none() && self.month.is_none() && self.year.is_none()
    }

    /// Type, month and year predicates. Month and year are read from the
    /// event date in UTC. The date cutoff is not part of this check.
    pub fn matches(&self, event: &EventRecord) -> bool {
        let type_match = self.kind.map_or(true, |k| k == event.kind);
        let month_match = self
            .month
            .map_or(true, |m| m.number_from_month() == event.date.month());
        let year_match = self.year.map_or(true, |y| y == event.date.year());
        type_match && month_match && year_match
    }
}

/// Parse a 1-based month number.
pub fn month_from_number(n: u32) -> Option<Month> {
    u8::try_from(n).ok().and_then(|n| Month::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_on(y: i32, m: u32, d: u32, kind: EventType) -> EventRecord {
        EventRecord::new(
            format!("e-{y}-{m}-{d}"),
            "Test",
            "Test event",
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            kind,
        )
    }

    #[test]
    fn event_type_round_trips_through_str() {
        for t in EventType::ALL {
            assert_eq!(t.as_str().parse::<EventType>().unwrap(), t);
        }
        assert_eq!("ISS".parse::<EventType>().unwrap(), EventType::Iss);
        assert!("comet".parse::<EventType>().is_err());
    }

    #[test]
    fn wildcard_filter_matches_everything() {
        let f = FilterSpec::all();
        assert!(f.is_wildcard());
        for t in EventType::ALL {
            assert!(f.matches(&event_on(2030, 6, 1, t)));
        }
    }

    #[test]
    fn month_and_year_come_from_event_date() {
        let e = event_on(2030, 8, 12, EventType::Meteor);
        assert!(FilterSpec::all().with_month(Month::August).matches(&e));
        assert!(!FilterSpec::all().with_month(Month::July).matches(&e));
        assert!(FilterSpec::all().with_year(2030).matches(&e));
        assert!(!FilterSpec::all().with_year(2031).matches(&e));
    }

    #[test]
    fn all_predicates_must_hold() {
        let e = event_on(2030, 8, 12, EventType::Meteor);
        let f = FilterSpec::all()
            .with_type(EventType::Meteor)
            .with_month(Month::August)
            .with_year(2031);
        assert!(!f.matches(&e));
    }

    #[test]
    fn month_from_number_rejects_out_of_range() {
        assert_eq!(month_from_number(1), Some(Month::January));
        assert_eq!(month_from_number(12), Some(Month::December));
        assert_eq!(month_from_number(0), None);
        assert_eq!(month_from_number(13), None);
    }

    #[test]
    fn detail_text_falls_back_to_description() {
        let e = event_on(2030, 1, 1, EventType::Moon);
        assert_eq!(e.detail_text(), "Test event");
        let e = e.with_long_description("Full story");
        assert_eq!(e.detail_text(), "Full story");
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let e = event_on(2030, 1, 1, EventType::Iss).with_peak_time(
            Utc.with_ymd_and_hms(2030, 1, 1, 21, 0, 0).unwrap(),
        );
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["type"], "iss");
        assert!(v.get("peakTime").is_some());
        assert!(v.get("longDescription").is_none());
    }
}
