//! Geolocation refresh tests.

use std::sync::Arc;
use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};

use funceble_worker::error_handling::LocationError;
use funceble_worker::location::{LocationRecord, LocationSlot};
use funceble_worker::refresh::{refresh_location, register_location_refresh};
use funceble_worker::scheduler::Scheduler;

fn known_record() -> LocationRecord {
    LocationRecord {
        country: Some("Germany".to_string()),
        lat: Some(50.1),
        lon: Some(8.7),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_ok_response_replaces_record() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/json"),
            request::query(url_decoded(contains(key("fields")))),
        ])
        .respond_with(json_encoded(serde_json::json!({"lat": 1.0, "lon": 2.0}))),
    );

    let slot = LocationSlot::new();
    slot.replace(known_record());

    refresh_location(
        &reqwest::Client::new(),
        &server.url("/json").to_string(),
        &slot,
    )
    .await
    .unwrap();

    let record = slot.snapshot();
    assert_eq!(record.lat, Some(1.0));
    assert_eq!(record.lon, Some(2.0));
}

#[tokio::test]
async fn test_camel_case_keys_are_translated() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/json")).respond_with(json_encoded(
            serde_json::json!({"countryCode": "DE", "regionName": "Hesse", "as": "AS3320"}),
        )),
    );

    let slot = LocationSlot::new();
    refresh_location(
        &reqwest::Client::new(),
        &server.url("/json").to_string(),
        &slot,
    )
    .await
    .unwrap();

    let record = slot.snapshot();
    assert_eq!(record.country_code.as_deref(), Some("DE"));
    assert_eq!(record.region_name.as_deref(), Some("Hesse"));
    assert_eq!(record.as_.as_deref(), Some("AS3320"));
}

#[tokio::test]
async fn test_unavailable_service_leaves_record_unchanged() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/json"))
            .respond_with(status_code(503)),
    );

    let slot = LocationSlot::new();
    slot.replace(known_record());

    let result = refresh_location(
        &reqwest::Client::new(),
        &server.url("/json").to_string(),
        &slot,
    )
    .await;

    assert!(matches!(result, Err(LocationError::UnexpectedStatus(503))));
    assert_eq!(slot.snapshot(), known_record());
}

#[tokio::test]
async fn test_scheduled_refresh_survives_failures() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/json"))
            .times(2..)
            .respond_with(status_code(503)),
    );

    let slot = Arc::new(LocationSlot::new());
    slot.replace(known_record());

    let mut scheduler = Scheduler::new();
    register_location_refresh(
        &mut scheduler,
        reqwest::Client::new(),
        server.url("/json").to_string(),
        Arc::clone(&slot),
        Duration::from_millis(100),
    );
    scheduler.start();

    tokio::time::sleep(Duration::from_millis(450)).await;

    assert_eq!(scheduler.running(), 1);
    assert_eq!(slot.snapshot(), known_record());
    scheduler.stop().await;
}
