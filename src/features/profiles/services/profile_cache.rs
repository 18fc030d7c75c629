use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::features::profiles::models::Profile;

struct CachedProfile {
    profile: Profile,
    cached_at: Instant,
}

/// Per-principal profile cache.
///
/// Entries expire after `ttl`, are replaced whenever the profile is written,
/// and are dropped when the principal signs out.
pub struct ProfileCache {
    entries: RwLock<HashMap<String, CachedProfile>>,
    ttl: Duration,
}

impl ProfileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh cached profile for `principal`, if any
    pub async fn get(&self, principal: &str) -> Option<Profile> {
        let entries = self.entries.read().await;
        entries
            .get(principal)
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.profile.clone())
    }

    pub async fn put(&self, profile: Profile) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.cached_at.elapsed() < self.ttl);
        entries.insert(
            profile.id.clone(),
            CachedProfile {
                profile,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for `principal`; returns whether one existed
    pub async fn invalidate(&self, principal: &str) -> bool {
        self.entries.write().await.remove(principal).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::profiles::models::{fixtures::profile, ProfileRole};

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        cache.put(profile("u1", ProfileRole::Citizen)).await;

        assert_eq!(cache.get("u1").await.map(|p| p.id), Some("u1".to_string()));
        assert!(cache.get("u2").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_ignored() {
        let cache = ProfileCache::new(Duration::from_millis(20));
        cache.put(profile("u1", ProfileRole::Citizen)).await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get("u1").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        cache.put(profile("u1", ProfileRole::Contractor)).await;

        assert!(cache.invalidate("u1").await);
        assert!(!cache.invalidate("u1").await);
        assert!(cache.get("u1").await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        cache.put(profile("u1", ProfileRole::Citizen)).await;
        let mut updated = profile("u1", ProfileRole::Citizen);
        updated.display_name = "Renamed".to_string();
        cache.put(updated).await;

        assert_eq!(cache.get("u1").await.unwrap().display_name, "Renamed");
    }
}
