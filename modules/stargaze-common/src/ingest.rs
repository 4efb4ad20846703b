//! Conversion of loosely-typed producer records into [`EventRecord`].
//!
//! A record enters the catalog only if every timestamp parses and the
//! 1–10 scales are in range. Bad records are reported individually so one
//! malformed entry never sinks the rest of a batch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{Coordinates, EventRecord, EventSource, EventType};

/// Event record as it arrives from a producer: dates and enums are strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    pub date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub peak_time: Option<String>,
    #[serde(default)]
    pub intensity: Option<i64>,
    #[serde(default)]
    pub visibility: Option<i64>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    #[serde(default, alias = "nasaUrl")]
    pub info_url: Option<String>,
    #[serde(default, alias = "nasaId")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub related_events: Vec<String>,
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date read as
/// midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl TryFrom<RawEventRecord> for EventRecord {
    type Error = ValidationError;

    fn try_from(raw: RawEventRecord) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        let id = raw.id;

        let timestamp = |field: &'static str, value: &str| {
            parse_timestamp(value).ok_or_else(|| ValidationError::MalformedDate {
                id: id.clone(),
                field,
                value: value.to_string(),
            })
        };
        let scale = |field: &'static str, value: Option<i64>| match value {
            None => Ok(None),
            Some(v @ 1..=10) => Ok(Some(v as u8)),
            Some(v) => Err(ValidationError::OutOfRange {
                id: id.clone(),
                field,
                value: v,
            }),
        };

        let date = timestamp("date", &raw.date)?;
        let end_date = raw
            .end_date
            .as_deref()
            .map(|v| timestamp("endDate", v))
            .transpose()?;
        let peak_time = raw
            .peak_time
            .as_deref()
            .map(|v| timestamp("peakTime", v))
            .transpose()?;
        let intensity = scale("intensity", raw.intensity)?;
        let visibility = scale("visibility", raw.visibility)?;

        let kind: EventType = raw.kind.parse().map_err(|_| ValidationError::UnknownVariant {
            id: id.clone(),
            field: "type",
            value: raw.kind.clone(),
        })?;
        let source = raw
            .source
            .as_deref()
            .map(|s| {
                s.parse::<EventSource>()
                    .map_err(|_| ValidationError::UnknownVariant {
                        id: id.clone(),
                        field: "source",
                        value: s.to_string(),
                    })
            })
            .transpose()?;

        Ok(EventRecord {
            id,
            title: raw.title,
            description: raw.description,
            long_description: raw.long_description,
            date,
            end_date,
            kind,
            location: raw.location,
            peak_time,
            intensity,
            visibility,
            tips: raw.tips,
            coordinates: raw.coordinates,
            source,
            image_url: raw.image_url,
            info_url: raw.info_url,
            external_id: raw.external_id,
            related_events: raw.related_events,
        })
    }
}

/// Validate a batch. Accepted records keep their relative order.
pub fn ingest(
    raw: impl IntoIterator<Item = RawEventRecord>,
) -> (Vec<EventRecord>, Vec<ValidationError>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for record in raw {
        match EventRecord::try_from(record) {
            Ok(event) => accepted.push(event),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected event record at ingestion");
                rejected.push(e);
            }
        }
    }
    (accepted, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(id: &str, date: &str) -> RawEventRecord {
        RawEventRecord {
            id: id.to_string(),
            title: "Perseids".to_string(),
            description: "Meteor shower".to_string(),
            date: date.to_string(),
            kind: "meteor".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn parses_rfc3339_and_bare_dates() {
        assert_eq!(
            parse_timestamp("2023-01-03T21:00:00Z"),
            Some(Utc.with_ymd_and_hms(2023, 1, 3, 21, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2023-01-03T22:00:00+01:00"),
            Some(Utc.with_ymd_and_hms(2023, 1, 3, 21, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-03-02"),
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
    }

    #[test]
    fn malformed_date_is_rejected_with_field_name() {
        let err = EventRecord::try_from(raw("bad", "soon")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedDate {
                id: "bad".to_string(),
                field: "date",
                value: "soon".to_string(),
            }
        );

        let mut r = raw("bad-peak", "2030-01-01");
        r.peak_time = Some("after dusk".to_string());
        let err = EventRecord::try_from(r).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedDate { field: "peakTime", .. }));
    }

    #[test]
    fn scales_outside_one_to_ten_are_rejected() {
        let mut r = raw("loud", "2030-01-01");
        r.intensity = Some(11);
        assert!(matches!(
            EventRecord::try_from(r).unwrap_err(),
            ValidationError::OutOfRange { field: "intensity", value: 11, .. }
        ));

        let mut r = raw("dim", "2030-01-01");
        r.visibility = Some(0);
        assert!(EventRecord::try_from(r).is_err());
    }

    #[test]
    fn unknown_type_and_source_are_rejected() {
        let mut r = raw("comet", "2030-01-01");
        r.kind = "comet".to_string();
        assert!(matches!(
            EventRecord::try_from(r).unwrap_err(),
            ValidationError::UnknownVariant { field: "type", .. }
        ));

        let mut r = raw("isro", "2030-01-01");
        r.source = Some("isro".to_string());
        assert!(matches!(
            EventRecord::try_from(r).unwrap_err(),
            ValidationError::UnknownVariant { field: "source", .. }
        ));
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(
            EventRecord::try_from(raw("  ", "2030-01-01")).unwrap_err(),
            ValidationError::MissingId
        );
    }

    #[test]
    fn ingest_keeps_good_records_in_order() {
        let batch = vec![
            raw("a", "2030-01-01"),
            raw("b", "not a date"),
            raw("c", "2030-01-02T00:00:00Z"),
        ];
        let (accepted, rejected) = ingest(batch);
        let ids: Vec<_> = accepted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn accepts_legacy_field_aliases() {
        let json = serde_json::json!({
            "id": "asteroid-1",
            "title": "Near Earth Asteroid",
            "description": "Close pass",
            "date": "2030-05-01",
            "type": "asteroid",
            "nasaId": "3542519",
            "nasaUrl": "https://ssd.jpl.nasa.gov/",
            "image": "https://example.com/a.jpg",
            "source": "nasa"
        });
        let raw: RawEventRecord = serde_json::from_value(json).unwrap();
        let event = EventRecord::try_from(raw).unwrap();
        assert_eq!(event.external_id.as_deref(), Some("3542519"));
        assert_eq!(event.info_url.as_deref(), Some("https://ssd.jpl.nasa.gov/"));
        assert_eq!(event.image_url.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(event.source, Some(EventSource::Nasa));
    }
}
