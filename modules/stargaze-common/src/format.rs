use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{EventRecord, EventType};

/// `Wednesday, January 3, 2024`
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%A, %B %-d, %Y").to_string()
}

/// `09:00 PM UTC`
pub fn format_time(ts: &DateTime<Utc>) -> String {
    ts.format("%I:%M %p UTC").to_string()
}

/// Everything the detail view shows for one event, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDetail {
    pub id: String,
    pub title: String,
    pub kind: EventType,
    pub body: String,
    pub date: String,
    pub end_date: Option<String>,
    pub peak_time: Option<String>,
    pub location: Option<String>,
    pub intensity: Option<u8>,
    pub visibility: Option<u8>,
    pub tips: Vec<String>,
    pub info_url: Option<String>,
}

impl From<&EventRecord> for EventDetail {
    fn from(event: &EventRecord) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            kind: event.kind,
            body: event.detail_text().to_string(),
            date: format_date(&event.date),
            end_date: event.end_date.as_ref().map(format_date),
            peak_time: event.peak_time.as_ref().map(format_time),
            location: event.location.clone(),
            intensity: event.intensity,
            visibility: event.visibility,
            tips: event.tips.clone(),
            info_url: event.info_url.clone(),
        }
    }
}

impl std::fmt::Display for EventDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} [{}]", self.title, self.kind)?;
        match &self.end_date {
            Some(end) => writeln!(f, "{} to {}", self.date, end)?,
            None => writeln!(f, "{}", self.date)?,
        }
        if let Some(peak) = &self.peak_time {
            writeln!(f, "Peak: {peak}")?;
        }
        if let Some(location) = &self.location {
            writeln!(f, "Visible from: {location}")?;
        }
        if let Some(v) = self.intensity {
            writeln!(f, "Intensity: {v}/10")?;
        }
        if let Some(v) = self.visibility {
            writeln!(f, "Visibility: {v}/10")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.body)?;
        if !self.tips.is_empty() {
            writeln!(f)?;
            writeln!(f, "Viewing tips:")?;
            for tip in &self.tips {
                writeln!(f, "  - {tip}")?;
            }
        }
        if let Some(url) = &self.info_url {
            writeln!(f)?;
            writeln!(f, "More: {url}")?;
        }
        Ok(())
    }
}
