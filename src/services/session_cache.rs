// src/services/session_cache.rs
// DOCUMENTATION: In-memory session state with TTL
// PURPOSE: Hold wizard drafts and per-user liked sets between requests

use crate::services::review_wizard::ReviewWizard;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Session-scoped convenience state
/// DOCUMENTATION: Never authoritative - wizard drafts die with their TTL
/// and liked sets are an opportunistic mirror of the relation tables
pub struct SessionCache {
    wizards: Arc<RwLock<HashMap<String, CacheEntry<ReviewWizard>>>>,
    liked_sets: Arc<RwLock<HashMap<Uuid, CacheEntry<HashSet<Uuid>>>>>,
    default_ttl: Duration,
}

impl SessionCache {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            wizards: Arc::new(RwLock::new(HashMap::new())),
            liked_sets: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Start a new wizard session, returning its opaque id
    pub async fn create_wizard(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let mut wizards = self.wizards.write().await;
        wizards.insert(
            session_id.clone(),
            CacheEntry::new(ReviewWizard::new(), self.default_ttl),
        );
        log::debug!("Wizard session started: {}", session_id);
        session_id
    }

    /// Get a wizard session's current state
    pub async fn get_wizard(&self, session_id: &str) -> Option<ReviewWizard> {
        let wizards = self.wizards.read().await;
        wizards
            .get(session_id)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.data.clone())
    }

    /// Store a wizard session back (refreshes the TTL)
    pub async fn put_wizard(&self, session_id: &str, wizard: ReviewWizard) {
        let mut wizards = self.wizards.write().await;
        wizards.insert(
            session_id.to_string(),
            CacheEntry::new(wizard, self.default_ttl),
        );
    }

    /// Drop a wizard session (navigation away / submit)
    pub async fn remove_wizard(&self, session_id: &str) {
        let mut wizards = self.wizards.write().await;
        wizards.remove(session_id);
    }

    /// Cached liked-gym ids for a user, if fresh
    pub async fn get_liked_set(&self, user_id: Uuid) -> Option<HashSet<Uuid>> {
        let sets = self.liked_sets.read().await;
        sets.get(&user_id)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.data.clone())
    }

    /// Replace a user's cached liked set (after a store read)
    pub async fn set_liked_set(&self, user_id: Uuid, gym_ids: HashSet<Uuid>) {
        let mut sets = self.liked_sets.write().await;
        sets.insert(user_id, CacheEntry::new(gym_ids, self.default_ttl));
    }

    /// Opportunistically apply a toggle outcome to the cached set
    /// No-op when nothing is cached for the user
    pub async fn apply_like_toggle(&self, user_id: Uuid, gym_id: Uuid, active: bool) {
        let mut sets = self.liked_sets.write().await;
        if let Some(entry) = sets.get_mut(&user_id) {
            if entry.is_expired() {
                sets.remove(&user_id);
                return;
            }
            if active {
                entry.data.insert(gym_id);
            } else {
                entry.data.remove(&gym_id);
            }
        }
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut wizards = self.wizards.write().await;
        let before = wizards.len();
        wizards.retain(|_, entry| !entry.is_expired());
        let removed_wizards = before - wizards.len();
        drop(wizards);

        let mut sets = self.liked_sets.write().await;
        let before = sets.len();
        sets.retain(|_, entry| !entry.is_expired());
        let removed_sets = before - sets.len();
        drop(sets);

        if removed_wizards + removed_sets > 0 {
            log::info!(
                "Session cleanup: removed {} wizard sessions, {} liked sets",
                removed_wizards,
                removed_sets
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> SessionCacheStats {
        let wizards = self.wizards.read().await;
        let sets = self.liked_sets.read().await;

        SessionCacheStats {
            wizard_sessions: wizards.len(),
            expired_wizard_sessions: wizards.values().filter(|e| e.is_expired()).count(),
            liked_sets: sets.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCacheStats {
    pub wizard_sessions: usize,
    pub expired_wizard_sessions: usize,
    pub liked_sets: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<SessionCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wizard_session_roundtrip() {
        let cache = SessionCache::new(60);
        let session_id = cache.create_wizard().await;

        let wizard = cache.get_wizard(&session_id).await;
        assert!(wizard.is_some());

        cache.remove_wizard(&session_id).await;
        assert!(cache.get_wizard(&session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_wizard_session_expires() {
        let cache = SessionCache::new(1);
        let session_id = cache.create_wizard().await;

        assert!(cache.get_wizard(&session_id).await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(cache.get_wizard(&session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_liked_set_toggle_mirror() {
        let cache = SessionCache::new(60);
        let user = Uuid::new_v4();
        let gym = Uuid::new_v4();

        // No cached set yet - toggle is a no-op
        cache.apply_like_toggle(user, gym, true).await;
        assert!(cache.get_liked_set(user).await.is_none());

        cache.set_liked_set(user, HashSet::new()).await;
        cache.apply_like_toggle(user, gym, true).await;
        assert!(cache.get_liked_set(user).await.unwrap().contains(&gym));

        cache.apply_like_toggle(user, gym, false).await;
        assert!(!cache.get_liked_set(user).await.unwrap().contains(&gym));
    }

    #[tokio::test]
    async fn test_cleanup_removes_expired() {
        let cache = SessionCache::new(1);
        cache.create_wizard().await;
        cache.create_wizard().await;

        tokio::time::sleep(Duration::from_secs(2)).await;

        cache.cleanup().await;

        let stats = cache.stats().await;
        assert_eq!(stats.wizard_sessions, 0);
    }
}
