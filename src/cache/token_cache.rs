use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::cache_key::CacheKey;
use crate::cache::token::Token;
use crate::helpers::time::{add_seconds, now};

/// Cached token together with the moment the cache stops serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub token: Token,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        at < self.expires_at
    }
}

/// Key-value cache with per-entry expiration, owned by the host.
pub trait TokenCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> impl Future<Output = Option<CacheEntry>> + Send;

    fn set(&self, key: &CacheKey, token: Token, ttl: Duration) -> impl Future<Output = ()> + Send;
}

/// Process-local cache: cache_key -> entry
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenCache {
    inner: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn remove(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.inner.write().await.remove(key)
    }
}

impl TokenCache for InMemoryTokenCache {
    /// Get entry if it exists and has not expired; expired entries are dropped lazily.
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let now = now();
        {
            let map = self.inner.read().await;
            match map.get(key) {
                Some(entry) if entry.is_valid_at(now) => return Some(entry.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut map = self.inner.write().await;
        // re-check, another writer may have refreshed the slot meanwhile
        if map.get(key).is_some_and(|entry| !entry.is_valid_at(now)) {
            debug!(key = %key, "dropping expired token");
            map.remove(key);
        }
        map.get(key).cloned()
    }

    async fn set(&self, key: &CacheKey, token: Token, ttl: Duration) {
        let expires_at = add_seconds(now(), ttl.as_secs());
        let mut map = self.inner.write().await;
        map.insert(key.to_owned(), CacheEntry { token, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::credentials::OAuthCredentials;
    use chrono::Duration as ChronoDuration;

    fn key() -> CacheKey {
        CacheKey::new(&OAuthCredentials::new("id", "secret"), "https://api.sandbox.paypal.com/v1")
    }

    fn token(value: &str) -> Token {
        Token::new(value.into(), "Bearer".into(), Utc::now() + ChronoDuration::hours(1))
    }

    #[tokio::test]
    async fn stores_and_returns_live_entries() {
        let cache = InMemoryTokenCache::new();
        assert!(cache.get(&key()).await.is_none());

        cache.set(&key(), token("abc"), Duration::from_secs(60)).await;

        let entry = cache.get(&key()).await.expect("entry must be cached");
        assert_eq!(entry.token.access_token(), "abc");
        assert!(entry.expires_at > Utc::now());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn zero_ttl_entries_are_never_served() {
        let cache = InMemoryTokenCache::new();
        cache.set(&key(), token("abc"), Duration::ZERO).await;

        assert!(cache.get(&key()).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = InMemoryTokenCache::new();
        cache.set(&key(), token("short"), Duration::from_secs(1)).await;
        assert!(cache.get(&key()).await.is_some());

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert!(cache.get(&key()).await.is_none());
    }

    #[tokio::test]
    async fn newer_token_replaces_older_one() {
        let cache = InMemoryTokenCache::new();
        cache.set(&key(), token("first"), Duration::from_secs(60)).await;
        cache.set(&key(), token("second"), Duration::from_secs(60)).await;

        let entry = cache.get(&key()).await.unwrap();
        assert_eq!(entry.token.access_token(), "second");
        assert_eq!(cache.len().await, 1);
    }
}
