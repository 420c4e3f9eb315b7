//! Configuration constants.
//!
//! This module defines the defaults used throughout the application: provider
//! endpoints, network timeouts and the retry policy of the location queue.

use std::time::Duration;

/// Default SQLite database path for the CLI runner
pub const DB_PATH: &str = "./geo_enrich.db";

// Network operation timeouts
/// Per-request HTTP timeout in seconds (applies to every provider call)
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// Sequential HTTP requests in a full pass of the provider chain
/// (one per free provider, two for the paid provider)
pub const CHAIN_HTTP_REQUESTS: u64 = 4;
/// Headroom on top of the chain's HTTP budget for the update callback
pub const JOB_TIMEOUT_MARGIN_SECS: u64 = 5;
/// Upper bound for a single job attempt (resolution plus update callback).
/// Covers every chain request timing out: `CHAIN_HTTP_REQUESTS * HTTP_TIMEOUT_SECS + margin`.
pub const JOB_TIMEOUT_SECS: u64 = CHAIN_HTTP_REQUESTS * HTTP_TIMEOUT_SECS + JOB_TIMEOUT_MARGIN_SECS;

/// Default User-Agent string for provider requests.
pub const DEFAULT_USER_AGENT: &str = concat!("geo_enrich/", env!("CARGO_PKG_VERSION"));

// Provider endpoints
/// Provider A (free): `{base}/{ip}/json/`
pub const IPAPI_CO_BASE_URL: &str = "https://ipapi.co";
/// Provider B (free, higher rate limit): `{base}/json/{ip}`
pub const IP_API_COM_BASE_URL: &str = "http://ip-api.com";
/// Provider C (paid) step one: IP-context geolocation
pub const GOOGLE_GEOLOCATE_URL: &str = "https://www.googleapis.com/geolocation/v1/geolocate";
/// Provider C (paid) step two: reverse geocoding of the returned coordinates
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
/// Environment variable holding the paid provider's API key
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

// Retry strategy
/// Delay before the first retry of a failed job.
/// Doubles with every further attempt (2000ms, 4000ms, ...).
pub const RETRY_BASE_DELAY_MS: u64 = 2000;
/// Growth factor of the retry delay
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 60;
/// Maximum number of attempts per job (including the initial attempt)
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// How long the worker sleeps when no job is due and nothing was enqueued
pub const QUEUE_IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// How often `wait_until_drained` re-checks the job store
pub const QUEUE_DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Maximum error message length persisted with a rescheduled job
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

/// How often the runner logs progress while draining the queue
pub const LOGGING_INTERVAL: Duration = Duration::from_secs(5);
