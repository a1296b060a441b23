// Test doubles for the token cache and the OAuth client factory.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::StatusCode;

use crate::cache::cache_key::CacheKey;
use crate::cache::token::{Token, TokenGrant};
use crate::cache::token_cache::{CacheEntry, TokenCache};
use crate::client::credentials::OAuthCredentials;
use crate::client::oauth_client::{OAuthClient, OAuthClientFactory};
use crate::errors::{Error, Result};
use crate::helpers::time::{add_seconds, now};

pub const ACCESS_TOKEN: &str = "A21AAFEpH4PsADK7qSS7pSRsgzfENtu";
pub const CACHED_ACCESS_TOKEN: &str = "A21AAGcachedTokenFromEarlierFetch";
pub const TOKEN_TYPE: &str = "Bearer";
pub const EXPIRES_IN: u64 = 32_400;
pub const UNREACHABLE_REASON: &str = "connection refused";
pub const ENDPOINT: &str = "https://api.sandbox.paypal.com/v1";

pub fn credentials() -> OAuthCredentials {
    OAuthCredentials::new("testClientId", "testClientSecret")
}

pub fn token_expiring_at(access_token: &str, expires_at: DateTime<Utc>) -> Token {
    Token::new(access_token.to_owned(), TOKEN_TYPE.to_owned(), expires_at)
}

/// Cache that hands back whatever was stored, expired or not, and counts calls.
#[derive(Clone, Default)]
pub struct RecordingTokenCache {
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
    gets: Arc<AtomicUsize>,
    sets: Arc<AtomicUsize>,
}

impl RecordingTokenCache {
    pub fn preload(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.lock().unwrap().insert(key, entry);
    }

    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

impl TokenCache for RecordingTokenCache {
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.entry(key)
    }

    async fn set(&self, key: &CacheKey, token: Token, ttl: Duration) {
        self.sets.fetch_add(1, Ordering::SeqCst);
        let expires_at = add_seconds(now(), ttl.as_secs());
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), CacheEntry { token, expires_at });
    }
}

#[derive(Default)]
struct StubState {
    grant: Option<TokenGrant>,
    accepts: bool,
    unreachable: bool,
    fetches: AtomicUsize,
    validations: AtomicUsize,
    endpoints: Mutex<Vec<String>>,
}

/// Factory whose clients answer from canned data instead of calling PayPal.
#[derive(Clone)]
pub struct StubClientFactory {
    state: Arc<StubState>,
}

impl StubClientFactory {
    /// Issues `ACCESS_TOKEN` and accepts every credential check.
    pub fn issuing() -> Self {
        Self::with(
            Some(TokenGrant {
                access_token: ACCESS_TOKEN.to_owned(),
                token_type: TOKEN_TYPE.to_owned(),
                expires_in: EXPIRES_IN,
                app_id: None,
                scope: None,
                nonce: None,
            }),
            true,
        )
    }

    /// Rejects every token request and credential check.
    pub fn rejecting() -> Self {
        Self::with(None, false)
    }

    /// Every credential check fails on the wire.
    pub fn unreachable() -> Self {
        Self {
            state: Arc::new(StubState {
                unreachable: true,
                ..StubState::default()
            }),
        }
    }

    pub fn with(grant: Option<TokenGrant>, accepts: bool) -> Self {
        Self {
            state: Arc::new(StubState {
                grant,
                accepts,
                ..StubState::default()
            }),
        }
    }

    pub fn fetches(&self) -> usize {
        self.state.fetches.load(Ordering::SeqCst)
    }

    pub fn validations(&self) -> usize {
        self.state.validations.load(Ordering::SeqCst)
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.state.endpoints.lock().unwrap().clone()
    }
}

pub struct StubClient {
    state: Arc<StubState>,
}

impl OAuthClientFactory for StubClientFactory {
    type Client = StubClient;

    fn create(&self, endpoint: &str) -> StubClient {
        self.state.endpoints.lock().unwrap().push(endpoint.to_owned());
        StubClient {
            state: self.state.clone(),
        }
    }
}

impl OAuthClient for StubClient {
    async fn fetch_token(&self, _credentials: &OAuthCredentials) -> Result<TokenGrant> {
        self.state.fetches.fetch_add(1, Ordering::SeqCst);
        self.state.grant.clone().ok_or_else(|| {
            Error::authentication(Some(StatusCode::UNAUTHORIZED), "invalid_client")
        })
    }

    async fn validate_credentials(&self, _credentials: &OAuthCredentials) -> Result<bool> {
        self.state.validations.fetch_add(1, Ordering::SeqCst);
        if self.state.unreachable {
            return Err(Error::authentication(None, UNREACHABLE_REASON));
        }
        Ok(self.state.accepts)
    }
}
