pub mod credentials;
pub mod oauth_client;
