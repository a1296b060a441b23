use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use http::StatusCode;
use reqwest::Client;
use tracing::{debug, warn};

use crate::cache::token::TokenGrant;
use crate::client::credentials::OAuthCredentials;
use crate::config::types::HttpConfig;
use crate::errors::{Error, Result};
use crate::utils::constants::{
    GRANT_TYPE_CLIENT_CREDENTIALS, OAUTH_TOKEN_PATH, PARTNER_ATTRIBUTION_HEADER,
};

/// Builds clients bound to one PayPal API root.
pub trait OAuthClientFactory: Send + Sync {
    type Client: OAuthClient;

    fn create(&self, endpoint: &str) -> Self::Client;
}

pub trait OAuthClient: Send + Sync {
    /// Request a new token with the client-credentials grant.
    fn fetch_token(
        &self,
        credentials: &OAuthCredentials,
    ) -> impl Future<Output = Result<TokenGrant>> + Send;

    /// `Ok(false)` when PayPal rejects the credentials, `Err` when the exchange itself fails.
    fn validate_credentials(
        &self,
        credentials: &OAuthCredentials,
    ) -> impl Future<Output = Result<bool>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpOAuthClientFactory {
    client: Client,
    partner_attribution_id: Option<String>,
}

impl HttpOAuthClientFactory {
    pub fn new(http_config: &HttpConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(http_config.timeout_ms))
            .build()
            .context("failed to build PayPal HTTP client")?;
        Ok(Self {
            client,
            partner_attribution_id: http_config.partner_attribution_id.clone(),
        })
    }

    /// Reuse an existing connection pool.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            partner_attribution_id: None,
        }
    }
}

impl OAuthClientFactory for HttpOAuthClientFactory {
    type Client = HttpOAuthClient;

    fn create(&self, endpoint: &str) -> HttpOAuthClient {
        HttpOAuthClient {
            client: self.client.clone(),
            token_url: format!("{}/{}", endpoint.trim_end_matches('/'), OAUTH_TOKEN_PATH),
            partner_attribution_id: self.partner_attribution_id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpOAuthClient {
    client: Client,
    token_url: String,
    /// fallback when the credentials carry none
    partner_attribution_id: Option<String>,
}

impl HttpOAuthClient {
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    async fn request_token(&self, credentials: &OAuthCredentials) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .post(&self.token_url)
            .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            .header(http::header::ACCEPT, "application/json")
            .form(&[("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS)]);

        let partner_attribution_id = credentials
            .partner_attribution_id()
            .or(self.partner_attribution_id.as_deref());
        if let Some(partner_attribution_id) = partner_attribution_id {
            request = request.header(PARTNER_ATTRIBUTION_HEADER, partner_attribution_id);
        }

        debug!(url = %self.token_url, client_id = credentials.client_id(), "requesting OAuth token");
        Ok(request.send().await?)
    }
}

impl OAuthClient for HttpOAuthClient {
    async fn fetch_token(&self, credentials: &OAuthCredentials) -> Result<TokenGrant> {
        let response = self.request_token(credentials).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %self.token_url, %status, "OAuth token request rejected");
            return Err(Error::authentication(
                Some(status),
                format!("token request failed: {} {}", status, body.trim()),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str::<TokenGrant>(&body).map_err(|err| {
            Error::authentication(Some(status), format!("invalid token response: {}", err))
        })
    }

    async fn validate_credentials(&self, credentials: &OAuthCredentials) -> Result<bool> {
        let response = self.request_token(credentials).await?;
        let status = response.status();
        match status {
            s if s.is_success() => Ok(true),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(url = %self.token_url, %status, "credentials rejected");
                Ok(false)
            }
            _ => Err(Error::authentication(
                Some(status),
                format!("credential check failed: {}", status),
            )),
        }
    }
}
