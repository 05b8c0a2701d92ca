//! Geolocation of the serving node.
//!
//! The [`LocationRecord`] is empty at startup and replaced wholesale by the
//! location refresh task. The geolocation service answers in camelCase; its
//! payload is read into [`ServicePayload`] and converted.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Network geolocation snapshot of the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    #[serde(rename = "as")]
    pub as_: Option<String>,
    pub query: Option<String>,
}

impl LocationRecord {
    /// The `fields` query value of the geolocation request.
    pub fn service_fields() -> String {
        ServicePayload::FIELDS.join(",")
    }
}

/// Geolocation service response. Unknown keys are ignored and missing ones
/// stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    #[serde(rename = "as")]
    pub as_: Option<String>,
    pub query: Option<String>,
}

impl ServicePayload {
    /// Service-side names of every field, in declaration order.
    pub const FIELDS: [&'static str; 13] = [
        "country",
        "countryCode",
        "region",
        "regionName",
        "city",
        "zip",
        "lat",
        "lon",
        "timezone",
        "isp",
        "org",
        "as",
        "query",
    ];
}

impl From<ServicePayload> for LocationRecord {
    fn from(payload: ServicePayload) -> Self {
        Self {
            country: payload.country,
            country_code: payload.country_code,
            region: payload.region,
            region_name: payload.region_name,
            city: payload.city,
            zip: payload.zip,
            lat: payload.lat,
            lon: payload.lon,
            timezone: payload.timezone,
            isp: payload.isp,
            org: payload.org,
            as_: payload.as_,
            query: payload.query,
        }
    }
}

/// Process-wide holder of the current [`LocationRecord`].
#[derive(Debug, Default)]
pub struct LocationSlot {
    inner: RwLock<LocationRecord>,
}

impl LocationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the current record.
    pub fn snapshot(&self) -> LocationRecord {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Swaps in a new record.
    pub fn replace(&self, record: LocationRecord) {
        match self.inner.write() {
            Ok(mut guard) => *guard = record,
            Err(poisoned) => *poisoned.into_inner() = record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_fields() {
        let fields = LocationRecord::service_fields();
        assert!(fields.starts_with("country,countryCode,region,regionName,"));
        assert!(fields.ends_with(",as,query"));
    }

    #[test]
    fn test_service_payload_into_record() {
        let payload = json!({
            "countryCode": "DE",
            "regionName": "Hesse",
            "lat": 50.1,
            "lon": 8.6,
            "as": "AS3320 Deutsche Telekom AG",
            "status": "success"
        });
        let payload: ServicePayload = serde_json::from_value(payload).unwrap();
        let record = LocationRecord::from(payload);
        assert_eq!(record.country_code.as_deref(), Some("DE"));
        assert_eq!(record.region_name.as_deref(), Some("Hesse"));
        assert_eq!(record.lat, Some(50.1));
        assert_eq!(record.as_.as_deref(), Some("AS3320 Deutsche Telekom AG"));
        assert_eq!(record.city, None);
    }

    #[test]
    fn test_snake_case_keys_are_not_service_keys() {
        let payload: ServicePayload =
            serde_json::from_value(json!({"country_code": "DE"})).unwrap();
        assert_eq!(LocationRecord::from(payload).country_code, None);
    }

    #[test]
    fn test_record_serializes_as_key() {
        let record = LocationRecord {
            as_: Some("AS1".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["as"], "AS1");
    }

    #[test]
    fn test_slot_replace() {
        let slot = LocationSlot::new();
        assert_eq!(slot.snapshot(), LocationRecord::default());
        slot.replace(LocationRecord {
            city: Some("Paris".to_string()),
            ..Default::default()
        });
        assert_eq!(slot.snapshot().city.as_deref(), Some("Paris"));
    }
}
