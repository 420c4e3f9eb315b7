//! geo_enrich library: resilient IP geolocation for contact records
//!
//! This library resolves the remote address of a request to a location through
//! an ordered chain of external providers (two free, one paid), caches
//! successful resolutions for the lifetime of the process and runs the work
//! through a durable SQLite-backed job queue with bounded exponential-backoff
//! retries.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use geo_enrich::config::ProviderEndpoints;
//! use geo_enrich::geolocation::{default_chain, GeoResolver, ResolutionCache};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = reqwest::Client::new();
//! let providers = default_chain(client, &ProviderEndpoints::default(), None);
//! let resolver = GeoResolver::new(providers, Arc::new(ResolutionCache::new()));
//!
//! if let Some(location) = resolver.resolve("::ffff:8.8.8.8").await {
//!     println!("{}, {} via {}", location.city, location.country_code, location.provider);
//! }
//! # }
//! ```
//!
//! The CLI entry point is [`run_enrichment`], which reads `identifier ip`
//! pairs, queues them and stores resolved locations in SQLite.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
pub mod error_handling;
pub mod geolocation;
pub mod initialization;
pub mod queue;
mod run;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use geolocation::{GeoResolver, LocationRecord, ProviderKind, ResolutionCache};
pub use queue::{LocationLookup, LocationQueue, LocationUpdater, QueueConfig};
pub use run::{run_enrichment, EnrichmentReport};
pub use storage::run_migrations;
