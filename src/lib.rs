//! # PayPal Core Library
//!
//! Obtains and caches PayPal OAuth bearer tokens, and projects the plugin's
//! flat key-value configuration into typed settings.
//!
//! Modules:
//! - `resource` — token resource: cache-first token retrieval, credential checks
//! - `cache` — tokens, cache keys and the token cache
//! - `client` — OAuth credentials and the HTTP token client
//! - `settings` — typed settings, settings stores and the settings service
//! - `config` — library configuration, YAML loading and validation
//! - `bootstrap` — wiring of the shipped implementations

pub mod bootstrap;
pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod resource;
pub mod settings;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::bootstrap::PayPalCore;
pub use crate::cache::token::Token;
pub use crate::client::credentials::OAuthCredentials;
pub use crate::errors::{Error, Result};
pub use crate::resource::token_resource::TokenResource;
pub use crate::settings::model::{LandingPage, PaymentIntent, SettingField, Settings};
pub use crate::settings::service::{SettingsService, SettingsUpdate};
