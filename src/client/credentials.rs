use std::fmt;

/// Client id / secret pair used for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    client_id: String,
    client_secret: String,
    partner_attribution_id: Option<String>,
}

impl OAuthCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            partner_attribution_id: None,
        }
    }

    pub fn with_partner_attribution_id(mut self, partner_attribution_id: impl Into<String>) -> Self {
        self.partner_attribution_id = Some(partner_attribution_id.into());
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn partner_attribution_id(&self) -> Option<&str> {
        self.partner_attribution_id.as_deref()
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("partner_attribution_id", &self.partner_attribution_id)
            .finish()
    }
}
