pub mod error;
pub mod types;

pub use error::{NasaError, Result};
pub use types::{
    ApodResponse, Asteroid, CloseApproach, MissDistance, NeoFeedResponse, SatellitePosition,
};

use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

pub const NASA_BASE_URL: &str = "https://api.nasa.gov";
pub const ISS_BASE_URL: &str = "https://api.wheretheiss.at";

/// NORAD catalog number of the International Space Station.
pub const ISS_NORAD_ID: u32 = 25544;

/// NeoWs rejects feed windows longer than this many days.
pub const NEO_FEED_MAX_DAYS: i64 = 7;

fn build_http(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NasaError::Network(format!("failed to build HTTP client: {e}")))
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(NasaError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Client for the api.nasa.gov endpoints (APOD and NeoWs).
#[derive(Clone)]
pub struct NasaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Today's Astronomy Picture of the Day.
    pub async fn apod(&self) -> Result<ApodResponse> {
        let url = format!("{}/planetary/apod", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let apod: ApodResponse = read_json(resp).await?;
        tracing::debug!(date = %apod.date, title = %apod.title, "Fetched APOD");
        Ok(apod)
    }

    /// Near-Earth objects with a close approach between `start` and `end`
    /// (inclusive). The window is clamped to [`NEO_FEED_MAX_DAYS`].
    pub async fn neo_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<NeoFeedResponse> {
        let end = end.min(start + chrono::Duration::days(NEO_FEED_MAX_DAYS));
        let start_date = start.format("%Y-%m-%d").to_string();
        let end_date = end.format("%Y-%m-%d").to_string();

        let url = format!("{}/neo/rest/v1/feed", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let feed: NeoFeedResponse = read_json(resp).await?;
        tracing::debug!(
            start = %start_date,
            end = %end_date,
            count = feed.element_count,
            "Fetched NEO feed"
        );
        Ok(feed)
    }
}

/// Client for the wheretheiss.at satellite API.
#[derive(Clone)]
pub struct IssClient {
    client: reqwest::Client,
    base_url: String,
}

impl IssClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Position of the ISS at each unix timestamp in `timestamps`.
    pub async fn positions(&self, timestamps: &[i64]) -> Result<Vec<SatellitePosition>> {
        let joined = timestamps
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let url = format!(
            "{}/v1/satellites/{}/positions",
            self.base_url, ISS_NORAD_ID
        );
        let resp = self
            .client
            .get(&url)
            .query(&[("timestamps", joined.as_str())])
            .send()
            .await?;

        let positions: Vec<SatellitePosition> = read_json(resp).await?;
        if positions.is_empty() {
            return Err(NasaError::Parse("empty position list".to_string()));
        }
        Ok(positions)
    }

    /// Position of the ISS at `timestamp`.
    pub async fn position_at(&self, timestamp: i64) -> Result<SatellitePosition> {
        let mut positions = self.positions(&[timestamp]).await?;
        Ok(positions.swap_remove(0))
    }
}
