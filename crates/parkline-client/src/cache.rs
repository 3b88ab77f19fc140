//! Short-lived permit list cache.
//!
//! Listing permits costs two upstream round trips, so the surface serves
//! repeated reads from memory for a few seconds. Any successful create or
//! expire drops the cached list before returning, so the next read sees the
//! mutation, even when a slower listing started before the write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use crate::client::ParkingClient;
use crate::error::ApiResult;
use crate::types::{CancelConfirmation, NewPermit, Permit, RemainingQuota, UsageSnapshot};

/// The cache holds a single list per client.
const PERMITS_KEY: &str = "permits";

pub type CachedPermits = Arc<Vec<Permit>>;

/// TTL cache for the tenant's permit list.
///
/// Every invalidation bumps a generation counter. A list fetched under an
/// older generation is never stored.
#[derive(Clone)]
pub struct PermitCache {
    inner: Cache<&'static str, CachedPermits>,
    generation: Arc<AtomicU64>,
}

impl std::fmt::Debug for PermitCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermitCache")
            .field("entries", &self.inner.entry_count())
            .field("generation", &self.generation())
            .finish()
    }
}

impl PermitCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().time_to_live(ttl).build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn get(&self) -> Option<CachedPermits> {
        self.inner.get(PERMITS_KEY)
    }

    /// Current generation; take it before fetching a list to store.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store `permits` if no invalidation happened since `generation`.
    ///
    /// Returns whether the list was kept.
    pub fn put(&self, generation: u64, permits: CachedPermits) -> bool {
        if self.generation() != generation {
            return false;
        }
        self.inner.insert(PERMITS_KEY, permits);
        // An invalidation may have landed between the check and the insert.
        if self.generation() != generation {
            self.inner.invalidate(PERMITS_KEY);
            return false;
        }
        true
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.invalidate(PERMITS_KEY);
    }
}

/// [`ParkingClient`] with cached permit listing.
///
/// Reads of usage and quota are never cached.
#[derive(Debug, Clone)]
pub struct CachedClient {
    client: ParkingClient,
    permits: PermitCache,
}

impl CachedClient {
    /// Wrap `client`, caching lists for its configured TTL.
    pub fn new(client: ParkingClient) -> Self {
        let ttl = Duration::from_secs(client.config().permit_cache_ttl_secs);
        Self::with_cache(client, PermitCache::new(ttl))
    }

    pub fn with_cache(client: ParkingClient, permits: PermitCache) -> Self {
        Self { client, permits }
    }

    pub fn client(&self) -> &ParkingClient {
        &self.client
    }

    pub async fn list_permits(&self) -> ApiResult<CachedPermits> {
        if let Some(permits) = self.permits.get() {
            debug!(count = permits.len(), "serving permit list from cache");
            return Ok(permits);
        }

        let generation = self.permits.generation();
        let permits = Arc::new(self.client.list_permits().await?);
        if !self.permits.put(generation, Arc::clone(&permits)) {
            debug!("permit list changed while fetching; not caching");
        }
        Ok(permits)
    }

    pub async fn create_permit(&self, permit: &NewPermit) -> ApiResult<String> {
        let permit_id = self.client.create_permit(permit).await?;
        self.permits.invalidate();
        Ok(permit_id)
    }

    pub async fn delete_permit(&self, permit_id: &str) -> ApiResult<CancelConfirmation> {
        let confirmation = self.client.delete_permit(permit_id).await?;
        self.permits.invalidate();
        Ok(confirmation)
    }

    pub async fn usage_and_policy(&self) -> ApiResult<UsageSnapshot> {
        self.client.usage_and_policy().await
    }

    pub async fn remaining_quota(&self) -> RemainingQuota {
        self.client.remaining_quota().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permit(id: &str) -> Permit {
        Permit {
            id: id.into(),
            license_plate: "ABC1234".into(),
            expiration: "2024-01-15T10:00:00-08:00".into(),
        }
    }

    #[test]
    fn test_put_get_invalidate() {
        let cache = PermitCache::new(Duration::from_secs(60));
        assert!(cache.get().is_none());

        assert!(cache.put(cache.generation(), Arc::new(vec![permit("P1")])));
        assert_eq!(cache.get().unwrap().as_slice(), &[permit("P1")]);

        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_put_replaces_previous_list() {
        let cache = PermitCache::new(Duration::from_secs(60));
        cache.put(cache.generation(), Arc::new(vec![permit("P1")]));
        cache.put(cache.generation(), Arc::new(vec![permit("P2"), permit("P3")]));
        assert_eq!(cache.get().unwrap().len(), 2);
    }

    #[test]
    fn test_expires_after_ttl() {
        let cache = PermitCache::new(Duration::from_millis(20));
        cache.put(cache.generation(), Arc::new(vec![permit("P1")]));
        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_put_after_invalidate_is_dropped() {
        let cache = PermitCache::new(Duration::from_secs(60));
        let before = cache.generation();
        cache.invalidate();

        assert!(!cache.put(before, Arc::new(vec![permit("P1")])));
        assert!(cache.get().is_none());

        assert!(cache.put(cache.generation(), Arc::new(vec![permit("P2")])));
        assert_eq!(cache.get().unwrap().as_slice(), &[permit("P2")]);
    }

    #[test]
    fn test_clones_share_generation() {
        let cache = PermitCache::new(Duration::from_secs(60));
        let other = cache.clone();
        let before = cache.generation();
        other.invalidate();
        assert!(!cache.put(before, Arc::new(vec![permit("P1")])));
    }
}
