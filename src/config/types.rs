//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, ValueEnum};

use crate::config::constants::{
    CHAIN_HTTP_REQUESTS, DB_PATH, DEFAULT_USER_AGENT, GOOGLE_GEOCODE_URL, GOOGLE_GEOLOCATE_URL, HTTP_TIMEOUT_SECS,
    IPAPI_CO_BASE_URL, IP_API_COM_BASE_URL, JOB_TIMEOUT_MARGIN_SECS, JOB_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Base URLs of the three geolocation providers.
///
/// Overridable so tests and staging setups can point the chain at mock servers.
#[derive(Args, Debug, Clone)]
pub struct ProviderEndpoints {
    /// Base URL of the primary free provider (ipapi.co)
    #[arg(long, default_value = IPAPI_CO_BASE_URL, hide = true)]
    pub ipapi_co_url: String,

    /// Base URL of the secondary free provider (ip-api.com)
    #[arg(long, default_value = IP_API_COM_BASE_URL, hide = true)]
    pub ip_api_com_url: String,

    /// Google geolocation endpoint
    #[arg(long, default_value = GOOGLE_GEOLOCATE_URL, hide = true)]
    pub google_geolocate_url: String,

    /// Google reverse geocoding endpoint
    #[arg(long, default_value = GOOGLE_GEOCODE_URL, hide = true)]
    pub google_geocode_url: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            ipapi_co_url: IPAPI_CO_BASE_URL.to_string(),
            ip_api_com_url: IP_API_COM_BASE_URL.to_string(),
            google_geolocate_url: GOOGLE_GEOLOCATE_URL.to_string(),
            google_geocode_url: GOOGLE_GEOCODE_URL.to_string(),
        }
    }
}

/// Runner configuration.
///
/// Parsed from the command line by the binary, or constructed programmatically
/// by library users.
///
/// # Examples
///
/// ```no_run
/// use geo_enrich::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("contacts.txt"),
///     job_timeout_seconds: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geo_enrich",
    about = "Resolves contact IP addresses to locations and stores them in SQLite."
)]
pub struct Config {
    /// File with `identifier ip` pairs, one per line (`-` for stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Database path (SQLite file) holding the job queue and resolved locations
    #[arg(long, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Upper bound for one job attempt in seconds (raised to cover the whole provider chain)
    #[arg(long, default_value_t = JOB_TIMEOUT_SECS)]
    pub job_timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// API key of the paid provider; without it the paid fallback is skipped
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    #[command(flatten)]
    pub endpoints: ProviderEndpoints,
}

impl Config {
    /// Shortest attempt timeout that lets every chain request run to its own timeout
    pub fn min_job_timeout_seconds(&self) -> u64 {
        CHAIN_HTTP_REQUESTS
            .saturating_mul(self.timeout_seconds)
            .saturating_add(JOB_TIMEOUT_MARGIN_SECS)
    }

    /// Job attempt timeout as a `Duration`.
    ///
    /// Never shorter than [`Config::min_job_timeout_seconds`], so a hanging free
    /// provider cannot cut the paid fallback short.
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_seconds.max(self.min_job_timeout_seconds()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("contacts.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            timeout_seconds: HTTP_TIMEOUT_SECS,
            job_timeout_seconds: JOB_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            google_api_key: None,
            endpoints: ProviderEndpoints::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
        assert_eq!(log::LevelFilter::from(LogLevel::Info), log::LevelFilter::Info);
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.job_timeout_seconds, 45);
        assert_eq!(config.job_timeout(), Duration::from_secs(45));
        assert!(config.google_api_key.is_none());
        assert_eq!(config.db_path, PathBuf::from("./geo_enrich.db"));
        assert_eq!(config.endpoints.ipapi_co_url, "https://ipapi.co");
    }

    #[test]
    fn test_config_parse_minimal() {
        let config = Config::try_parse_from(["geo_enrich", "contacts.txt"]).unwrap();
        assert_eq!(config.file, PathBuf::from("contacts.txt"));
        assert_eq!(config.endpoints.ip_api_com_url, "http://ip-api.com");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_config_parse_overrides() {
        let config = Config::try_parse_from([
            "geo_enrich",
            "-",
            "--log-format",
            "json",
            "--job-timeout-seconds",
            "5",
            "--google-api-key",
            "secret",
            "--ipapi-co-url",
            "http://127.0.0.1:9999",
        ])
        .unwrap();
        assert_eq!(config.file, PathBuf::from("-"));
        assert!(matches!(config.log_format, LogFormat::Json));
        assert_eq!(config.job_timeout_seconds, 5);
        assert_eq!(config.google_api_key.as_deref(), Some("secret"));
        assert_eq!(config.endpoints.ipapi_co_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_job_timeout_covers_full_chain() {
        let config = Config {
            timeout_seconds: 1,
            job_timeout_seconds: 3,
            ..Default::default()
        };
        assert_eq!(config.min_job_timeout_seconds(), 9);
        assert_eq!(config.job_timeout(), Duration::from_secs(9));

        let config = Config {
            timeout_seconds: 1,
            job_timeout_seconds: 120,
            ..Default::default()
        };
        assert_eq!(config.job_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_default_job_timeout_exceeds_chain_budget() {
        let config = Config::default();
        assert!(config.job_timeout_seconds > CHAIN_HTTP_REQUESTS * config.timeout_seconds);
    }

    #[test]
    fn test_config_requires_file() {
        assert!(Config::try_parse_from(["geo_enrich"]).is_err());
    }
}
