use std::fmt;

use sha2::{Digest, Sha256};

use crate::client::credentials::OAuthCredentials;
use crate::utils::constants::CACHE_KEY_PREFIX;

/// Cache slot of a token, derived from the credentials and the API endpoint.
///
/// The secret takes part in the digest so rotated credentials never reuse a
/// token, but it never appears in the key itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(credentials: &OAuthCredentials, endpoint: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(credentials.client_id().as_bytes());
        hasher.update([0u8]);
        hasher.update(credentials.client_secret().as_bytes());
        hasher.update([0u8]);
        hasher.update(endpoint.trim_end_matches('/').as_bytes());
        Self(format!("{}{}", CACHE_KEY_PREFIX, hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
