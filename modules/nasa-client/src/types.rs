use std::collections::BTreeMap;

use serde::Deserialize;

// --- APOD ---

/// Response of `GET /planetary/apod`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApodResponse {
    /// Calendar date of the picture, `YYYY-MM-DD`.
    pub date: String,
    pub explanation: String,
    pub title: String,
    pub url: String,
    pub hdurl: Option<String>,
    pub media_type: Option<String>,
    pub service_version: Option<String>,
}

// --- NeoWs feed ---

/// Response of `GET /neo/rest/v1/feed`. Keys of `near_earth_objects` are
/// `YYYY-MM-DD` dates, so the map iterates in date order.
#[derive(Debug, Clone, Deserialize)]
pub struct NeoFeedResponse {
    pub element_count: u32,
    pub near_earth_objects: BTreeMap<String, Vec<Asteroid>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asteroid {
    pub id: String,
    pub name: String,
    pub nasa_jpl_url: String,
    pub absolute_magnitude_h: f64,
    pub estimated_diameter: EstimatedDiameter,
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

impl Asteroid {
    pub fn max_diameter_km(&self) -> f64 {
        self.estimated_diameter.kilometers.estimated_diameter_max
    }

    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approach_data.first()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimatedDiameter {
    pub kilometers: DiameterRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

/// NeoWs reports distances and velocities as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseApproach {
    pub close_approach_date: String,
    pub close_approach_date_full: Option<String>,
    pub epoch_date_close_approach: i64,
    pub relative_velocity: RelativeVelocity,
    pub miss_distance: MissDistance,
    pub orbiting_body: String,
}

impl CloseApproach {
    pub fn lunar_distance(&self) -> Option<f64> {
        self.miss_distance.lunar.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelativeVelocity {
    pub kilometers_per_second: String,
    pub kilometers_per_hour: String,
    pub miles_per_hour: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissDistance {
    pub astronomical: String,
    pub lunar: String,
    pub kilometers: String,
    pub miles: String,
}

// --- wheretheiss.at ---

/// One entry of `GET /v1/satellites/{id}/positions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SatellitePosition {
    pub name: String,
    pub id: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub visibility: Option<String>,
    pub timestamp: i64,
}
