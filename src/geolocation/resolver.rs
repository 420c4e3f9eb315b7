//! Fallback-chain resolution with caching.

use std::sync::Arc;

use log::{debug, info, warn};

use super::cache::ResolutionCache;
use super::private_ip::{is_private_ip, normalize_ip};
use super::providers::GeoProvider;
use super::types::LocationRecord;

/// Resolves addresses through an ordered provider chain.
///
/// The first provider to succeed wins; its record is cached under the
/// normalized address. A failing provider is logged and skipped, so only total
/// exhaustion of the chain yields `None`. Nothing is cached on failure.
pub struct GeoResolver {
    providers: Vec<Arc<dyn GeoProvider>>,
    cache: Arc<ResolutionCache>,
}

impl GeoResolver {
    /// Creates a resolver over `providers`, tried in the given order.
    pub fn new(providers: Vec<Arc<dyn GeoProvider>>, cache: Arc<ResolutionCache>) -> Self {
        Self { providers, cache }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Resolves a raw address (as read from a request's remote address).
    ///
    /// Returns `None` without any network call for private/loopback addresses.
    pub async fn resolve(&self, raw_ip: &str) -> Option<LocationRecord> {
        let ip = normalize_ip(raw_ip);

        if is_private_ip(ip) {
            debug!("Skipping geolocation for private address {}", ip);
            return None;
        }

        if let Some(cached) = self.cache.get(ip) {
            debug!("Geolocation cache hit for {}", ip);
            return Some(cached);
        }

        for provider in &self.providers {
            match provider.locate(ip).await {
                Ok(record) => {
                    info!(
                        "Resolved {} via {}: {}, {}",
                        ip, record.provider, record.city, record.country_code
                    );
                    self.cache.put(ip, record.clone());
                    return Some(record);
                }
                Err(e) if e.is_configuration() => {
                    warn!("Geolocation provider {} skipped for {}: {}", provider.kind(), ip, e);
                }
                Err(e) => {
                    warn!("Geolocation provider {} failed for {}: {}", provider.kind(), ip, e);
                }
            }
        }

        warn!("All geolocation providers failed for {}", ip);
        None
    }
}
