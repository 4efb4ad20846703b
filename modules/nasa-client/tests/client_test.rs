//! HTTP contract tests against a local wiremock server.

use std::time::Duration;

use chrono::NaiveDate;
use nasa_client::{IssClient, NasaClient, NasaError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn nasa(server: &MockServer) -> NasaClient {
    NasaClient::new(&server.uri(), "TEST_KEY", Duration::from_secs(5)).unwrap()
}

fn neo_body() -> serde_json::Value {
    json!({
        "element_count": 1,
        "near_earth_objects": {
            "2024-03-02": [{
                "id": "3542519",
                "name": "(2010 PK9)",
                "nasa_jpl_url": "https://ssd.jpl.nasa.gov/tools/sbdb_lookup.html#/?sstr=3542519",
                "absolute_magnitude_h": 21.9,
                "estimated_diameter": {
                    "kilometers": {
                        "estimated_diameter_min": 0.1010543415,
                        "estimated_diameter_max": 0.2259643771
                    }
                },
                "is_potentially_hazardous_asteroid": true,
                "close_approach_data": [{
                    "close_approach_date": "2024-03-02",
                    "close_approach_date_full": "2024-Mar-02 13:02",
                    "epoch_date_close_approach": 1709384520000_i64,
                    "relative_velocity": {
                        "kilometers_per_second": "11.2",
                        "kilometers_per_hour": "40320.1",
                        "miles_per_hour": "25053.4"
                    },
                    "miss_distance": {
                        "astronomical": "0.0254",
                        "lunar": "9.88",
                        "kilometers": "3799772.1",
                        "miles": "2361063.3"
                    },
                    "orbiting_body": "Earth"
                }]
            }]
        }
    })
}

#[tokio::test]
async fn apod_sends_api_key_and_parses_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .and(query_param("api_key", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "2024-03-01",
            "explanation": "A spiral galaxy.",
            "title": "M101",
            "url": "https://apod.nasa.gov/apod/image/m101.jpg",
            "media_type": "image",
            "service_version": "v1"
        })))
        .mount(&server)
        .await;

    let apod = nasa(&server).apod().await.unwrap();
    assert_eq!(apod.date, "2024-03-01");
    assert_eq!(apod.title, "M101");
    assert!(apod.hdurl.is_none());
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(429).set_body_string("OVER_RATE_LIMIT"))
        .mount(&server)
        .await;

    let err = nasa(&server).apod().await.unwrap_err();
    match err {
        NasaError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "OVER_RATE_LIMIT");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = nasa(&server).apod().await.unwrap_err();
    assert!(matches!(err, NasaError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn neo_feed_clamps_window_to_seven_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/neo/rest/v1/feed"))
        .and(query_param("start_date", "2024-03-01"))
        .and(query_param("end_date", "2024-03-08"))
        .respond_with(ResponseTemplate::new(200).set_body_json(neo_body()))
        .mount(&server)
        .await;

    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
    let feed = nasa(&server).neo_feed(start, end).await.unwrap();

    let day = &feed.near_earth_objects["2024-03-02"];
    assert_eq!(day.len(), 1);
    assert!(day[0].is_potentially_hazardous_asteroid);
    let approach = day[0].first_approach().unwrap();
    assert_eq!(approach.lunar_distance(), Some(9.88));
}

#[tokio::test]
async fn iss_position_at_returns_first_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/satellites/25544/positions"))
        .and(query_param("timestamps", "1709251200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "iss",
            "id": 25544,
            "latitude": 12.5,
            "longitude": -45.25,
            "altitude": 418.2,
            "velocity": 27600.1,
            "visibility": "daylight",
            "timestamp": 1709251200
        }])))
        .mount(&server)
        .await;

    let iss = IssClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let pos = iss.position_at(1_709_251_200).await.unwrap();
    assert_eq!(pos.latitude, 12.5);
    assert_eq!(pos.longitude, -45.25);
}

#[tokio::test]
async fn iss_empty_position_list_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/satellites/25544/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let iss = IssClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let err = iss.position_at(0).await.unwrap_err();
    assert!(matches!(err, NasaError::Parse(_)));
}
