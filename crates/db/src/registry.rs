//! Region client registry.
//!
//! [`RegionRegistry`] is built once at startup and shared by reference. It
//! resolves a region key to a backend client, constructing each region's
//! client at most once and handing out the same `Arc` afterwards. Cached
//! clients are never invalidated; rotating credentials means building a new
//! registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use cnec_core::region::Region;
use serde::Serialize;

use crate::backend::RegionBackend;
use crate::config::{RegionConfig, RegionSettings, RegionUnavailable};
use crate::postgrest::PostgrestClient;

/// Builds a backend client from validated settings.
pub type BackendFactory = Box<dyn Fn(Region, &RegionConfig) -> Arc<dyn RegionBackend> + Send + Sync>;

/// Availability of one region, as reported by [`RegionRegistry::status`].
#[derive(Debug, Clone, Serialize)]
pub struct RegionStatus {
    pub region: Region,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Memoizing map from region to backend client.
pub struct RegionRegistry {
    settings: RegionSettings,
    factory: BackendFactory,
    clients: Mutex<HashMap<Region, Arc<dyn RegionBackend>>>,
}

impl RegionRegistry {
    /// Create a registry that builds clients with `factory`.
    pub fn new(settings: RegionSettings, factory: BackendFactory) -> Self {
        Self {
            settings,
            factory,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Create a registry of PostgREST clients sharing one HTTP client.
    pub fn postgrest(settings: RegionSettings, http: reqwest::Client) -> Self {
        Self::new(
            settings,
            Box::new(move |region: Region, config: &RegionConfig| -> Arc<dyn RegionBackend> {
                tracing::debug!(%region, url = %config.url, "Creating regional backend client");
                Arc::new(PostgrestClient::new(http.clone(), config))
            }),
        )
    }

    /// Resolve a region key or alias to its client.
    pub fn client(&self, key: &str) -> Result<Arc<dyn RegionBackend>, RegionUnavailable> {
        let region =
            Region::parse(key).ok_or_else(|| RegionUnavailable::UnknownRegion(key.to_string()))?;
        self.client_for(region)
    }

    /// Resolve a region to its client, constructing it on first use.
    pub fn client_for(&self, region: Region) -> Result<Arc<dyn RegionBackend>, RegionUnavailable> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(&region) {
            return Ok(Arc::clone(client));
        }

        let config = self.settings.validate(region)?;
        let client = (self.factory)(region, config);
        clients.insert(region, Arc::clone(&client));
        Ok(client)
    }

    /// Silent-degradation view of [`client`](Self::client): `None` for
    /// unknown, unconfigured or malformed regions.
    pub fn get(&self, key: &str) -> Option<Arc<dyn RegionBackend>> {
        self.client(key).ok()
    }

    /// Whether a region has usable settings. Does not construct a client.
    pub fn is_configured(&self, region: Region) -> bool {
        self.settings.validate(region).is_ok()
    }

    /// Availability of every region, in [`Region::ALL`] order.
    pub fn status(&self) -> Vec<RegionStatus> {
        Region::ALL
            .into_iter()
            .map(|region| match self.settings.validate(region) {
                Ok(_) => RegionStatus {
                    region,
                    configured: true,
                    reason: None,
                },
                Err(e) => RegionStatus {
                    region,
                    configured: false,
                    reason: Some(e.to_string()),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::backend::{BackendError, SelectQuery};

    struct NullBackend;

    #[async_trait]
    impl RegionBackend for NullBackend {
        async fn insert(&self, _table: &str, row: &Value) -> Result<Value, BackendError> {
            Ok(row.clone())
        }

        async fn select(&self, _table: &str, _query: &SelectQuery) -> Result<Vec<Value>, BackendError> {
            Ok(Vec::new())
        }
    }

    fn counting_registry(settings: RegionSettings) -> (RegionRegistry, Arc<AtomicUsize>) {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let registry = RegionRegistry::new(
            settings,
            Box::new(move |_: Region, _: &RegionConfig| -> Arc<dyn RegionBackend> {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new(NullBackend)
            }),
        );
        (registry, built)
    }

    fn japan_only() -> RegionSettings {
        RegionSettings::new().with(Region::Japan, "https://jp.supabase.co", "key")
    }

    #[test]
    fn unknown_key_yields_none_not_panic() {
        let (registry, built) = counting_registry(japan_only());
        assert!(registry.get("atlantis").is_none());
        assert_matches!(
            registry.client("atlantis").err(),
            Some(RegionUnavailable::UnknownRegion(k)) if k == "atlantis"
        );
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unconfigured_region_yields_none() {
        let (registry, _) = counting_registry(japan_only());
        assert!(registry.get("us").is_none());
        assert_matches!(
            registry.client("taiwan").err(),
            Some(RegionUnavailable::NotConfigured(Region::Taiwan))
        );
    }

    #[test]
    fn repeated_lookups_return_the_same_client() {
        let (registry, built) = counting_registry(japan_only());

        let first = registry.client("japan").unwrap();
        let second = registry.client("jp").unwrap();
        let third = registry.client_for(Region::Japan).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_lookups_do_not_construct() {
        let (registry, built) = counting_registry(
            RegionSettings::new().with(Region::Korea, "not a url", "key"),
        );
        for _ in 0..3 {
            assert_matches!(
                registry.client("kr").err(),
                Some(RegionUnavailable::InvalidUrl { .. })
            );
        }
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn status_lists_every_region_with_reason() {
        let (registry, built) = counting_registry(japan_only());
        let status = registry.status();

        assert_eq!(status.len(), Region::ALL.len());
        let japan = status.iter().find(|s| s.region == Region::Japan).unwrap();
        assert!(japan.configured);
        assert!(japan.reason.is_none());

        let biz = status.iter().find(|s| s.region == Region::Biz).unwrap();
        assert!(!biz.configured);
        assert!(biz.reason.as_deref().unwrap().contains("biz"));

        assert!(registry.is_configured(Region::Japan));
        assert_eq!(built.load(Ordering::SeqCst), 0, "status must not build clients");
    }

    #[test]
    fn postgrest_registry_builds_clients() {
        let registry = RegionRegistry::postgrest(japan_only(), reqwest::Client::new());
        assert!(registry.get("japan").is_some());
    }
}
