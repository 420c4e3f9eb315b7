//! IP geolocation.
//!
//! This module resolves request addresses to locations:
//! - Private/loopback detection and IPv6-mapped prefix stripping
//! - Three provider adapters tried in cost order (free, free, paid)
//! - A process-lifetime in-memory cache of successful resolutions
//!
//! The [`GeoResolver`] ties these together and is what the location queue calls.

mod cache;
mod private_ip;
pub mod providers;
mod resolver;
mod types;

// Re-export public API
pub use cache::ResolutionCache;
pub use private_ip::{is_private_ip, normalize_ip, IPV6_MAPPED_PREFIX};
pub use providers::{default_chain, GeoProvider};
pub use resolver::GeoResolver;
pub use types::{LocationRecord, ProviderKind};
