use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw token response of PayPal's `oauth2/token` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    /// lifetime in seconds
    pub expires_in: u64,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Issued OAuth bearer token. Replaced, never mutated, once it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    access_token: String,
    token_type: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(access_token: String, token_type: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            token_type,
            expires_at,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Value for the `Authorization` header of subsequent API calls.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
