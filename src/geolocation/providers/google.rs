//! Provider C: Google geolocation + reverse geocoding (paid).
//!
//! The geolocation API has no IP parameter. It is called with `considerIp` and a
//! synthetic access-point list, so the answer reflects the requester's IP
//! context; the coordinates are then reverse-geocoded into address parts.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{fetch_json, finite_coordinates, GeoProvider};
use crate::error_handling::ProviderError;
use crate::geolocation::private_ip::is_private_ip;
use crate::geolocation::types::{LocationRecord, ProviderKind};

const PROVIDER: ProviderKind = ProviderKind::Google;

/// Placeholder access points; the API requires at least two to accept the list.
const SYNTHETIC_ACCESS_POINTS: [&str; 2] = ["00:25:9c:cf:1c:ac", "00:25:9c:cf:1c:ad"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeolocateRequest {
    consider_ip: bool,
    wifi_access_points: Vec<WifiAccessPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WifiAccessPoint {
    mac_address: &'static str,
    signal_strength: i32,
    signal_to_noise_ratio: i32,
}

impl GeolocateRequest {
    fn synthetic() -> Self {
        Self {
            consider_ip: true,
            wifi_access_points: SYNTHETIC_ACCESS_POINTS
                .iter()
                .map(|mac| WifiAccessPoint {
                    mac_address: mac,
                    signal_strength: -65,
                    signal_to_noise_ratio: 0,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    location: Option<LatLng>,
    accuracy: Option<f64>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Address parts extracted from the first geocoding result.
#[derive(Debug, Default, PartialEq)]
struct AddressParts {
    city: String,
    region: String,
    country: String,
    country_code: String,
}

impl AddressParts {
    fn from_components(components: &[AddressComponent]) -> Self {
        let mut parts = AddressParts::default();
        for component in components {
            let has = |tag: &str| component.types.iter().any(|t| t == tag);
            if has("locality") {
                parts.city = component.long_name.clone();
            } else if has("administrative_area_level_1") {
                parts.region = component.long_name.clone();
            } else if has("country") {
                parts.country = component.long_name.clone();
                parts.country_code = component.short_name.clone();
            }
        }
        parts
    }
}

/// Paid final fallback.
pub struct GoogleProvider {
    client: reqwest::Client,
    geolocate_url: String,
    geocode_url: String,
    api_key: Option<String>,
}

impl GoogleProvider {
    /// A blank key is treated as unconfigured.
    pub fn new(
        client: reqwest::Client,
        geolocate_url: &str,
        geocode_url: &str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            geolocate_url: geolocate_url.to_string(),
            geocode_url: geocode_url.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn geolocate(&self, key: &str) -> Result<(f64, f64, Option<f64>), ProviderError> {
        let request = self
            .client
            .post(&self.geolocate_url)
            .query(&[("key", key)])
            .json(&GeolocateRequest::synthetic());
        let body: GeolocateResponse = fetch_json(PROVIDER, request).await?;

        if let Some(error) = body.error {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: error
                    .message
                    .unwrap_or_else(|| "geolocation error".to_string()),
            });
        }

        let location = body.location.unwrap_or(LatLng {
            lat: None,
            lng: None,
        });
        let (lat, lng) = finite_coordinates(PROVIDER, location.lat, location.lng)?;
        Ok((lat, lng, body.accuracy))
    }

    async fn reverse_geocode(
        &self,
        key: &str,
        lat: f64,
        lng: f64,
    ) -> Result<AddressParts, ProviderError> {
        let latlng = format!("{},{}", lat, lng);
        let request = self
            .client
            .get(&self.geocode_url)
            .query(&[("latlng", latlng.as_str()), ("key", key)]);
        let body: GeocodeResponse = fetch_json(PROVIDER, request).await?;

        if body.status == "ZERO_RESULTS" {
            return Err(ProviderError::NoResults { provider: PROVIDER });
        }
        if body.status != "OK" {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: body.error_message.unwrap_or(body.status),
            });
        }

        let first = body
            .results
            .first()
            .ok_or(ProviderError::NoResults { provider: PROVIDER })?;
        Ok(AddressParts::from_components(&first.address_components))
    }
}

#[async_trait]
impl GeoProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        PROVIDER
    }

    async fn locate(&self, ip: &str) -> Result<LocationRecord, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey { provider: PROVIDER })?;

        if is_private_ip(ip) {
            return Err(ProviderError::PrivateAddress {
                provider: PROVIDER,
                ip: ip.to_string(),
            });
        }

        let (latitude, longitude, accuracy) = self.geolocate(key).await?;
        log::debug!(
            "{} geolocated {} to {},{} (accuracy {:?}m)",
            PROVIDER,
            ip,
            latitude,
            longitude,
            accuracy
        );
        let parts = self.reverse_geocode(key, latitude, longitude).await?;

        Ok(LocationRecord {
            latitude,
            longitude,
            city: parts.city,
            region: parts.region,
            country: parts.country,
            country_code: parts.country_code,
            timezone: None,
            provider: PROVIDER,
            created_at: Utc::now(),
            accuracy,
        })
    }
}
