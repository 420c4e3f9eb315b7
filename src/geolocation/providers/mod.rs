//! Geolocation provider adapters.
//!
//! Each adapter wraps one external source behind the [`GeoProvider`] trait. The
//! resolver drives them as an ordered list, cheapest first:
//! 1. [`IpApiCoProvider`]: free, primary
//! 2. [`IpApiComProvider`]: free, higher rate limit
//! 3. [`GoogleProvider`]: paid, two calls, only reached when both free ones fail
//!
//! Adapters never retry; a failure is reported and the resolver moves on.

mod google;
mod ip_api_com;
mod ipapi_co;

pub use google::GoogleProvider;
pub use ip_api_com::IpApiComProvider;
pub use ipapi_co::IpApiCoProvider;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::types::{LocationRecord, ProviderKind};
use crate::config::ProviderEndpoints;
use crate::error_handling::ProviderError;

/// A single external geolocation source.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Which provider this is (used for logging and stamped on records).
    fn kind(&self) -> ProviderKind;

    /// Resolves a public, prefix-stripped address.
    async fn locate(&self, ip: &str) -> Result<LocationRecord, ProviderError>;
}

/// Builds the production fallback chain in cost order.
pub fn default_chain(
    client: reqwest::Client,
    endpoints: &ProviderEndpoints,
    google_api_key: Option<String>,
) -> Vec<Arc<dyn GeoProvider>> {
    vec![
        Arc::new(IpApiCoProvider::new(client.clone(), &endpoints.ipapi_co_url)),
        Arc::new(IpApiComProvider::new(
            client.clone(),
            &endpoints.ip_api_com_url,
        )),
        Arc::new(GoogleProvider::new(
            client,
            &endpoints.google_geolocate_url,
            &endpoints.google_geocode_url,
            google_api_key,
        )),
    ]
}

/// Sends a request and decodes a JSON body, mapping failures to `ProviderError`.
///
/// Non-2xx statuses are rejected before the body is read, since error bodies
/// are not guaranteed to be JSON.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: ProviderKind,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Http { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| ProviderError::Http { provider, source })
}

/// Validates a coordinate pair taken from a provider response.
pub(crate) fn finite_coordinates(
    provider: ProviderKind,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(f64, f64), ProviderError> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Ok((lat, lon)),
        _ => Err(ProviderError::InvalidCoordinates { provider }),
    }
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_coordinates_accepts_valid_pair() {
        let coords = finite_coordinates(ProviderKind::IpApiCo, Some(37.4), Some(-122.1)).unwrap();
        assert_eq!(coords, (37.4, -122.1));
    }

    #[test]
    fn test_finite_coordinates_rejects_missing_or_nan() {
        for (lat, lon) in [
            (None, Some(1.0)),
            (Some(1.0), None),
            (Some(f64::NAN), Some(1.0)),
            (Some(1.0), Some(f64::INFINITY)),
        ] {
            let err = finite_coordinates(ProviderKind::IpApiCom, lat, lon).unwrap_err();
            assert!(matches!(err, ProviderError::InvalidCoordinates { .. }));
        }
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://ipapi.co/", "/8.8.8.8/json/"), "https://ipapi.co/8.8.8.8/json/");
        assert_eq!(join_url("http://ip-api.com", "json/1.1.1.1"), "http://ip-api.com/json/1.1.1.1");
    }

    #[test]
    fn test_default_chain_order() {
        let chain = default_chain(
            reqwest::Client::new(),
            &ProviderEndpoints::default(),
            None,
        );
        let kinds: Vec<ProviderKind> = chain.iter().map(|p| p.kind()).collect();
        assert_eq!(
            kinds,
            vec![ProviderKind::IpApiCo, ProviderKind::IpApiCom, ProviderKind::Google]
        );
    }
}
