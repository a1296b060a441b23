//! Wiring of the shipped implementations from a [`CoreConfig`].

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cache::token::Token;
use crate::cache::token_cache::InMemoryTokenCache;
use crate::client::oauth_client::HttpOAuthClientFactory;
use crate::config::loader::file_to_config;
use crate::config::types::CoreConfig;
use crate::resource::token_resource::TokenResource;
use crate::settings::service::SettingsService;
use crate::settings::store::{FileSettingsStore, InMemorySettingsStore, SettingsStoreKind};
use crate::utils::logging;

pub type DefaultTokenResource = TokenResource<InMemoryTokenCache, HttpOAuthClientFactory>;
pub type DefaultSettingsService = SettingsService<SettingsStoreKind>;

pub fn build_token_resource(config: &CoreConfig) -> Result<DefaultTokenResource> {
    let factory = HttpOAuthClientFactory::new(&config.http)?;
    Ok(TokenResource::new(InMemoryTokenCache::new(), factory)
        .with_safety_margin(config.token.safety_margin_seconds))
}

pub async fn build_settings_service(config: &CoreConfig) -> Result<DefaultSettingsService> {
    let store = match &config.settings.store_path {
        Some(path) => SettingsStoreKind::File(FileSettingsStore::open(path).await?),
        None => SettingsStoreKind::Memory(InMemorySettingsStore::new()),
    };
    Ok(SettingsService::with_namespace(store, config.settings.namespace.clone()))
}

/// Token resource and settings service sharing one configuration.
#[derive(Debug, Clone)]
pub struct PayPalCore {
    pub config: CoreConfig,
    pub tokens: DefaultTokenResource,
    pub settings: DefaultSettingsService,
}

impl PayPalCore {
    pub async fn from_config(config: CoreConfig) -> Result<Self> {
        let tokens = build_token_resource(&config)?;
        let settings = build_settings_service(&config).await?;
        Ok(Self {
            config,
            tokens,
            settings,
        })
    }

    /// Load the YAML config, initialize logging and wire everything up.
    pub async fn load(path: &Path) -> Result<Self> {
        let config = file_to_config(path).await?;
        logging::run(&config);
        info!(namespace = %config.settings.namespace, "PayPal core starting");
        Self::from_config(config).await
    }

    /// Token for the credentials and environment currently stored in the settings.
    pub async fn current_token(&self) -> crate::errors::Result<Token> {
        let settings = self.settings.get_settings().await?;
        self.tokens
            .get_token(&settings.credentials(), settings.api_base_url())
            .await
    }

    /// Check the stored credentials against the stored environment.
    pub async fn test_current_credentials(&self) -> crate::errors::Result<bool> {
        let settings = self.settings.get_settings().await?;
        self.tokens
            .test_api_credentials(&settings.credentials(), settings.api_base_url())
            .await
    }
}
