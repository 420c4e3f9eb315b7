//! In-memory resolution cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::types::LocationRecord;

/// Address → location cache shared by every resolution.
///
/// Entries live for the lifetime of the owning process: there is no TTL and no
/// eviction. Only successful resolutions are stored, so private addresses and
/// failed lookups go through the full provider chain on every call.
///
/// Reads take a shared lock; writes are last-writer-wins per key.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<String, LocationRecord>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the cached record for a normalized address.
    pub fn get(&self, ip: &str) -> Option<LocationRecord> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ip)
            .cloned()
    }

    /// Stores (or replaces) the record for a normalized address.
    pub fn put(&self, ip: &str, record: LocationRecord) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ip.to_string(), record);
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(ip)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::ProviderKind;
    use chrono::Utc;
    use std::sync::Arc;

    fn record(city: &str, provider: ProviderKind) -> LocationRecord {
        LocationRecord {
            latitude: 1.0,
            longitude: 2.0,
            city: city.to_string(),
            region: String::new(),
            country: String::new(),
            country_code: String::new(),
            timezone: None,
            provider,
            created_at: Utc::now(),
            accuracy: None,
        }
    }

    #[test]
    fn test_get_missing_returns_none() {
        let cache = ResolutionCache::new();
        assert!(cache.get("8.8.8.8").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let cache = ResolutionCache::new();
        let rec = record("Mountain View", ProviderKind::IpApiCo);
        cache.put("8.8.8.8", rec.clone());
        assert_eq!(cache.get("8.8.8.8"), Some(rec));
        assert!(cache.contains("8.8.8.8"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = ResolutionCache::new();
        cache.put("1.1.1.1", record("First", ProviderKind::IpApiCo));
        cache.put("1.1.1.1", record("Second", ProviderKind::IpApiCom));
        let got = cache.get("1.1.1.1").unwrap();
        assert_eq!(got.city, "Second");
        assert_eq!(got.provider, ProviderKind::IpApiCom);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ResolutionCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let key = format!("203.0.113.{}", i);
                    cache.put(&key, record("Somewhere", ProviderKind::Google));
                    for _ in 0..100 {
                        assert!(cache.get(&key).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
    }
}
