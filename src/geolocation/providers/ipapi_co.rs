//! Provider A: ipapi.co.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use super::{fetch_json, finite_coordinates, join_url, GeoProvider};
use crate::error_handling::ProviderError;
use crate::geolocation::types::{LocationRecord, ProviderKind};

const PROVIDER: ProviderKind = ProviderKind::IpApiCo;

/// `GET {base}/{ip}/json/` response. Errors arrive as `{"error": true, "reason": ...}`.
#[derive(Debug, Deserialize)]
struct IpapiCoResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    timezone: Option<String>,
}

/// Primary free provider.
pub struct IpApiCoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiCoProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl GeoProvider for IpApiCoProvider {
    fn kind(&self) -> ProviderKind {
        PROVIDER
    }

    async fn locate(&self, ip: &str) -> Result<LocationRecord, ProviderError> {
        let url = join_url(&self.base_url, &format!("{}/json/", ip));
        let body: IpapiCoResponse = fetch_json(PROVIDER, self.client.get(&url)).await?;

        if body.error {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: body.reason.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let (latitude, longitude) = finite_coordinates(PROVIDER, body.latitude, body.longitude)?;

        Ok(LocationRecord {
            latitude,
            longitude,
            city: body.city.unwrap_or_default(),
            region: body.region.unwrap_or_default(),
            country: body.country_name.unwrap_or_default(),
            country_code: body.country_code.unwrap_or_default(),
            timezone: body.timezone,
            provider: PROVIDER,
            created_at: Utc::now(),
            accuracy: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> IpApiCoProvider {
        IpApiCoProvider::new(reqwest::Client::new(), &server.uri())
    }

    #[tokio::test]
    async fn test_locate_maps_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/8.8.8.8/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ip": "8.8.8.8",
                "city": "Mountain View",
                "region": "California",
                "country_name": "United States",
                "country_code": "US",
                "latitude": 37.4,
                "longitude": -122.1,
                "timezone": "America/Los_Angeles"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = provider_for(&server).await.locate("8.8.8.8").await.unwrap();
        assert_eq!(record.provider, ProviderKind::IpApiCo);
        assert_eq!(record.city, "Mountain View");
        assert_eq!(record.region, "California");
        assert_eq!(record.country, "United States");
        assert_eq!(record.country_code, "US");
        assert_eq!(record.latitude, 37.4);
        assert_eq!(record.longitude, -122.1);
        assert_eq!(record.timezone.as_deref(), Some("America/Los_Angeles"));
        assert!(record.accuracy.is_none());
    }

    #[tokio::test]
    async fn test_locate_embedded_error_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ip": "8.8.8.8",
                "error": true,
                "reason": "RateLimited"
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.locate("8.8.8.8").await.unwrap_err();
        match err {
            ProviderError::Api { provider, message } => {
                assert_eq!(provider, ProviderKind::IpApiCo);
                assert_eq!(message, "RateLimited");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_locate_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.locate("8.8.8.8").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_locate_missing_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": "Nowhere"
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.locate("8.8.8.8").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidCoordinates { .. }));
    }

    #[tokio::test]
    async fn test_locate_invalid_json_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.locate("8.8.8.8").await.unwrap_err();
        assert!(matches!(err, ProviderError::Http { .. }));
    }
}
