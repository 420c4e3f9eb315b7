//! Geolocation data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Identifies which external provider produced a location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum ProviderKind {
    /// Primary free provider
    #[serde(rename = "ipapi.co")]
    #[strum(serialize = "ipapi.co")]
    IpApiCo,
    /// Secondary free provider
    #[serde(rename = "ip-api.com")]
    #[strum(serialize = "ip-api.com")]
    IpApiCom,
    /// Paid final fallback (geolocate + reverse geocode)
    #[serde(rename = "google")]
    #[strum(serialize = "google")]
    Google,
}

impl ProviderKind {
    /// Stable provider identifier, as stored with each record
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved location.
///
/// Immutable once built by a provider. Coordinates are always finite: providers
/// reject responses with missing or non-finite coordinates. String fields are
/// empty when the provider did not supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub region: String,
    pub country: String,
    pub country_code: String,
    /// IANA timezone name; never set by the paid provider
    pub timezone: Option<String>,
    pub provider: ProviderKind,
    pub created_at: DateTime<Utc>,
    /// Accuracy radius in meters (paid provider only)
    pub accuracy: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_provider_kind_identifiers() {
        assert_eq!(ProviderKind::IpApiCo.as_str(), "ipapi.co");
        assert_eq!(ProviderKind::IpApiCom.as_str(), "ip-api.com");
        assert_eq!(ProviderKind::Google.to_string(), "google");
    }

    #[test]
    fn test_provider_kind_parses_its_own_identifier() {
        for kind in ProviderKind::iter() {
            assert_eq!(ProviderKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(ProviderKind::from_str("maxmind").is_err());
    }

    #[test]
    fn test_provider_kind_serde_uses_identifier() {
        let json = serde_json::to_string(&ProviderKind::IpApiCom).unwrap();
        assert_eq!(json, "\"ip-api.com\"");
        let back: ProviderKind = serde_json::from_str("\"google\"").unwrap();
        assert_eq!(back, ProviderKind::Google);
    }

    #[test]
    fn test_location_record_serializes_provider_identifier() {
        let record = LocationRecord {
            latitude: 37.4,
            longitude: -122.1,
            city: "Mountain View".to_string(),
            region: "California".to_string(),
            country: "United States".to_string(),
            country_code: "US".to_string(),
            timezone: Some("America/Los_Angeles".to_string()),
            provider: ProviderKind::IpApiCo,
            created_at: Utc::now(),
            accuracy: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["provider"], "ipapi.co");
        assert_eq!(value["city"], "Mountain View");
        assert!(value["accuracy"].is_null());
    }
}
