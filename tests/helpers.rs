// Shared test helpers: provider mocks, input files and runner configs.
//
// Every provider endpoint of the chain is pointed at one wiremock server; the
// providers are told apart by their URL paths.

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

use geo_enrich::config::ProviderEndpoints;
use geo_enrich::{Config, LogFormat, LogLevel};

/// Provider endpoints that all resolve to `server`.
#[allow(dead_code)]
pub fn endpoints_for(server: &MockServer) -> ProviderEndpoints {
    ProviderEndpoints {
        ipapi_co_url: server.uri(),
        ip_api_com_url: server.uri(),
        google_geolocate_url: format!("{}/geolocation/v1/geolocate", server.uri()),
        google_geocode_url: format!("{}/maps/api/geocode/json", server.uri()),
    }
}

/// Runner config against `server`, without a paid provider key.
#[allow(dead_code)] // Used by other test files
pub fn create_test_config(input_file: PathBuf, db_path: PathBuf, server: &MockServer) -> Config {
    Config {
        file: input_file,
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        db_path,
        timeout_seconds: 5,
        job_timeout_seconds: 10,
        user_agent: "geo_enrich_test/1.0".to_string(),
        google_api_key: None,
        endpoints: endpoints_for(server),
    }
}

/// Writes input lines to a temporary file (sync I/O).
#[allow(dead_code)]
pub fn write_jobs_to_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write line");
    }
    file.flush().expect("Failed to flush file");
    file
}

/// Mounts a successful primary-provider response for `ip`, expected `times` times.
#[allow(dead_code)]
pub async fn mount_ipapi_co_success(
    server: &MockServer,
    ip: &str,
    city: &str,
    times: impl Into<Times>,
) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/json/", ip)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": ip,
            "city": city,
            "region": "California",
            "country_name": "United States",
            "country_code": "US",
            "latitude": 37.42,
            "longitude": -122.08,
            "timezone": "America/Los_Angeles"
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Makes the primary provider fail with `status` for every address.
#[allow(dead_code)]
pub async fn mount_ipapi_co_failure(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/[^/]+/json/$"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mounts a successful secondary-provider response for every address.
#[allow(dead_code)]
pub async fn mount_ip_api_com_success(server: &MockServer, city: &str) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/json/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "country": "United States",
            "countryCode": "US",
            "regionName": "Virginia",
            "city": city,
            "lat": 39.03,
            "lon": -77.5,
            "timezone": "America/New_York"
        })))
        .mount(server)
        .await;
}

/// Makes the secondary provider report a failure payload for every address.
#[allow(dead_code)]
pub async fn mount_ip_api_com_failure(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/json/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail",
            "message": "quota exceeded"
        })))
        .mount(server)
        .await;
}
