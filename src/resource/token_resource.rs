use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::cache_key::CacheKey;
use crate::cache::token::Token;
use crate::cache::token_cache::TokenCache;
use crate::client::credentials::OAuthCredentials;
use crate::client::oauth_client::{OAuthClient, OAuthClientFactory};
use crate::errors::{Error, Result};
use crate::helpers::time::{add_seconds, cache_ttl_seconds, get_instant, now, seconds_until};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::DEFAULT_SAFETY_MARGIN_SECS;

static ERROR_MSG: &str = "error";
static TRANSPORT_MSG: &str = "transport";
static SERVER_MSG: &str = "server";
static MALFORMED_MSG: &str = "malformed";
static ACCEPTED_MSG: &str = "accepted";
static REJECTED_MSG: &str = "rejected";

/// Supplies OAuth bearer tokens, reusing cached ones while they are valid.
#[derive(Debug, Clone)]
pub struct TokenResource<C, F> {
    cache: C,
    client_factory: F,
    safety_margin_seconds: u64,
}

impl<C: TokenCache, F: OAuthClientFactory> TokenResource<C, F> {
    pub fn new(cache: C, client_factory: F) -> Self {
        Self {
            cache,
            client_factory,
            safety_margin_seconds: DEFAULT_SAFETY_MARGIN_SECS,
        }
    }

    pub fn with_safety_margin(mut self, safety_margin_seconds: u64) -> Self {
        self.safety_margin_seconds = safety_margin_seconds;
        self
    }

    pub fn safety_margin_seconds(&self) -> u64 {
        self.safety_margin_seconds
    }

    /// Cached token for (credentials, endpoint) if still valid, otherwise a freshly
    /// fetched one which replaces the cache entry. Fetch failures are returned as is.
    pub async fn get_token(&self, credentials: &OAuthCredentials, endpoint: &str) -> Result<Token> {
        let metrics = get_metrics().await;
        let cache_key = CacheKey::new(credentials, endpoint);

        if let Some(entry) = self.cache.get(&cache_key).await {
            let at = now();
            // the host cache may keep entries past the token's own expiry
            if entry.is_valid_at(at) && !entry.token.is_expired_at(at) {
                debug!(key = %cache_key, "token served from cache");
                if let Some(m) = metrics {
                    m.token_cache_hits.inc();
                }
                return Ok(entry.token);
            }
            debug!(key = %cache_key, "cached token expired");
        }
        if let Some(m) = metrics {
            m.token_cache_misses.inc();
        }

        let start = get_instant();
        let issued_at = now();
        let grant = self
            .client_factory
            .create(endpoint)
            .fetch_token(credentials)
            .await
            .inspect_err(|e| {
                warn!(endpoint, error = %e, "OAuth token fetch failed");
                if let Some(m) = metrics {
                    m.token_fetch_failures
                        .with_label_values(&[failure_reason(e)])
                        .inc();
                }
            })?;
        if let Some(m) = metrics {
            m.token_fetch_duration
                .with_label_values(&[endpoint])
                .observe(start.elapsed().as_secs_f64());
        }

        let token = Token::new(
            grant.access_token,
            grant.token_type,
            add_seconds(issued_at, grant.expires_in),
        );
        // from now, not issued_at: the entry must not outlive the token
        let remaining = seconds_until(token.expires_at(), now());
        let ttl = cache_ttl_seconds(remaining, self.safety_margin_seconds);
        self.cache
            .set(&cache_key, token.clone(), Duration::from_secs(ttl))
            .await;

        info!(
            endpoint,
            expires_in = grant.expires_in,
            cache_ttl = ttl,
            "fetched new OAuth token"
        );
        Ok(token)
    }

    /// Live check of the credentials against PayPal; the cache is neither read nor written.
    pub async fn test_api_credentials(
        &self,
        credentials: &OAuthCredentials,
        endpoint: &str,
    ) -> Result<bool> {
        let metrics = get_metrics().await;
        let outcome = self
            .client_factory
            .create(endpoint)
            .validate_credentials(credentials)
            .await;

        let label = match &outcome {
            Ok(true) => ACCEPTED_MSG,
            Ok(false) => REJECTED_MSG,
            Err(_) => ERROR_MSG,
        };
        if let Some(m) = metrics {
            m.credential_checks.with_label_values(&[label]).inc();
        }
        info!(endpoint, client_id = credentials.client_id(), result = label, "API credentials tested");

        outcome
    }
}

/// Metrics label for a failed token fetch.
fn failure_reason(err: &Error) -> &'static str {
    match err {
        Error::Authentication { status: None, .. } => TRANSPORT_MSG,
        Error::Authentication { status: Some(status), .. } if status.is_client_error() => REJECTED_MSG,
        Error::Authentication { status: Some(status), .. } if status.is_success() => MALFORMED_MSG,
        Error::Authentication { .. } => SERVER_MSG,
        _ => ERROR_MSG,
    }
}
