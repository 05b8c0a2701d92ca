//! Geolocation refresh.

use crate::config::LOCATION_REQUEST_TIMEOUT;
use crate::error_handling::LocationError;
use crate::location::{LocationRecord, LocationSlot, ServicePayload};

/// Queries the geolocation service and swaps the result into `slot`.
///
/// On any failure the current record is left untouched and the failure is
/// logged as critical before being returned.
pub async fn refresh_location(
    client: &reqwest::Client,
    url: &str,
    slot: &LocationSlot,
) -> Result<(), LocationError> {
    match fetch_location(client, url).await {
        Ok(record) => {
            log::info!(
                "Location updated: {} ({})",
                record.query.as_deref().unwrap_or("unknown address"),
                record.country_code.as_deref().unwrap_or("??")
            );
            slot.replace(record);
            Ok(())
        }
        Err(e) => {
            log::error!("CRITICAL: {}", e);
            Err(e)
        }
    }
}

async fn fetch_location(
    client: &reqwest::Client,
    url: &str,
) -> Result<LocationRecord, LocationError> {
    let response = client
        .get(url)
        .query(&[("fields", LocationRecord::service_fields())])
        .timeout(LOCATION_REQUEST_TIMEOUT)
        .send()
        .await?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(LocationError::UnexpectedStatus(response.status().as_u16()));
    }

    let payload: ServicePayload = response
        .json()
        .await
        .map_err(|e| LocationError::Payload(e.to_string()))?;

    Ok(payload.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    #[tokio::test]
    async fn test_requests_only_record_fields() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/json"),
                request::query(url_decoded(contains(key("fields")))),
            ])
            .respond_with(json_encoded(serde_json::json!({
                "countryCode": "FR",
                "city": "Lyon"
            }))),
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
        assert_eq!(record.country_code.as_deref(), Some("FR"));
        assert_eq!(record.city.as_deref(), Some("Lyon"));
    }

    #[tokio::test]
    async fn test_non_object_payload_keeps_record() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/json"))
                .respond_with(status_code(200).body("[1, 2, 3]")),
        );

        let slot = LocationSlot::new();
        let previous = LocationRecord {
            isp: Some("Example ISP".to_string()),
            ..Default::default()
        };
        slot.replace(previous.clone());

        let result = refresh_location(
            &reqwest::Client::new(),
            &server.url("/json").to_string(),
            &slot,
        )
        .await;

        assert!(matches!(result, Err(LocationError::Payload(_))));
        assert_eq!(slot.snapshot(), previous);
    }

    #[tokio::test]
    async fn test_transport_error_keeps_record() {
        let slot = LocationSlot::new();
        // Nothing listens on port 1
        let result =
            refresh_location(&reqwest::Client::new(), "http://127.0.0.1:1/json", &slot).await;
        assert!(matches!(result, Err(LocationError::Request(_))));
        assert_eq!(slot.snapshot(), LocationRecord::default());
    }
}
