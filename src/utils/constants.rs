//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// Configuration namespace the plugin's settings keys are rooted at.
pub const DEFAULT_SETTINGS_NAMESPACE: &str = "SwagPayPal.settings";

// PayPal REST API roots
pub const PAYPAL_API_URL: &str = "https://api.paypal.com/v1";
pub const PAYPAL_API_URL_SANDBOX: &str = "https://api.sandbox.paypal.com/v1";

pub const OAUTH_TOKEN_PATH: &str = "oauth2/token";
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const PARTNER_ATTRIBUTION_HEADER: &str = "PayPal-Partner-Attribution-Id";

pub const CACHE_KEY_PREFIX: &str = "paypal_oauth_token_";
