//! Provider B: ip-api.com.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use super::{fetch_json, finite_coordinates, join_url, GeoProvider};
use crate::error_handling::ProviderError;
use crate::geolocation::types::{LocationRecord, ProviderKind};

const PROVIDER: ProviderKind = ProviderKind::IpApiCom;

/// Fields requested from the API (keeps responses small)
const FIELDS: &str = "status,message,country,countryCode,regionName,city,lat,lon,timezone";

/// `status` is `"success"` or `"fail"`; on failure `message` explains why.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiComResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    region_name: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    timezone: Option<String>,
}

/// Secondary free provider.
pub struct IpApiComProvider {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiComProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl GeoProvider for IpApiComProvider {
    fn kind(&self) -> ProviderKind {
        PROVIDER
    }

    async fn locate(&self, ip: &str) -> Result<LocationRecord, ProviderError> {
        let url = join_url(&self.base_url, &format!("json/{}", ip));
        let request = self.client.get(&url).query(&[("fields", FIELDS)]);
        let body: IpApiComResponse = fetch_json(PROVIDER, request).await?;

        if body.status == "fail" {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: body.message.unwrap_or_else(|| "fail".to_string()),
            });
        }

        let (latitude, longitude) = finite_coordinates(PROVIDER, body.lat, body.lon)?;

        Ok(LocationRecord {
            latitude,
            longitude,
            city: body.city.unwrap_or_default(),
            region: body.region_name.unwrap_or_default(),
            country: body.country.unwrap_or_default(),
            country_code: body.country_code.unwrap_or_default(),
            timezone: body.timezone,
            provider: PROVIDER,
            created_at: Utc::now(),
            accuracy: None,
        })
    }
}
