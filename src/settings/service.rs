use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{Error, Result};
use crate::observability::metrics::get_metrics;
use crate::settings::model::{SettingField, Settings};
use crate::settings::store::SettingsStore;
use crate::utils::constants::DEFAULT_SETTINGS_NAMESPACE;

/// Field name -> new value, e.g. `{"sandbox": true}`.
pub type SettingsUpdate = BTreeMap<String, Value>;

static FOUND_MSG: &str = "found";
static NOT_FOUND_MSG: &str = "not_found";
static INVALID_MSG: &str = "invalid";

/// Projects the flat settings namespace of a [`SettingsStore`] into [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsService<S> {
    store: S,
    namespace: String,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self::with_namespace(store, DEFAULT_SETTINGS_NAMESPACE)
    }

    pub fn with_namespace(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build settings from the store.
    ///
    /// Absent fields take their defaults, but at least one recognized key must exist,
    /// otherwise the plugin counts as unconfigured and `SettingsNotFound` is returned.
    pub async fn get_settings(&self) -> Result<Settings> {
        let metrics = get_metrics().await;
        let prefix = format!("{}.", self.namespace);
        let values = self.store.list(&prefix).await?;

        let mut settings = Settings::default();
        let mut recognized = 0usize;
        for (key, value) in &values {
            let Some(name) = key.strip_prefix(&prefix) else {
                continue;
            };
            match SettingField::from_name(name) {
                Some(field) => {
                    settings.apply(field, value).inspect_err(|e| {
                        warn!(key = %key, error = %e, "stored setting has an invalid value");
                        if let Some(m) = metrics {
                            m.settings_reads.with_label_values(&[INVALID_MSG]).inc();
                        }
                    })?;
                    recognized += 1;
                }
                None => debug!(key = %key, "ignoring unrecognized settings key"),
            }
        }

        if recognized == 0 {
            info!(namespace = %self.namespace, "no PayPal settings configured");
            if let Some(m) = metrics {
                m.settings_reads.with_label_values(&[NOT_FOUND_MSG]).inc();
            }
            return Err(Error::SettingsNotFound {
                namespace: self.namespace.clone(),
            });
        }

        if let Some(m) = metrics {
            m.settings_reads.with_label_values(&[FOUND_MSG]).inc();
        }
        Ok(settings)
    }

    /// Write each field of `updates` to its namespaced key in one batch.
    ///
    /// Unknown field names and mistyped values reject the whole batch before anything is
    /// written, and a store failure leaves every key as it was.
    pub async fn update_settings(&self, updates: &SettingsUpdate) -> Result<()> {
        let mut fields = Vec::with_capacity(updates.len());
        let mut entries = Vec::with_capacity(updates.len());
        let mut scratch = Settings::default();
        for (name, value) in updates {
            let field = SettingField::from_name(name)
                .ok_or_else(|| Error::UnknownSettingField(name.to_owned()))?;
            scratch.apply(field, value)?;
            fields.push(field);
            entries.push((field.key(&self.namespace), value.to_owned()));
        }
        if entries.is_empty() {
            return Ok(());
        }

        self.store.set_many(entries).await?;

        let metrics = get_metrics().await;
        for field in fields {
            if let Some(m) = metrics {
                m.settings_writes.with_label_values(&[field.name()]).inc();
            }
            debug!(field = %field, "setting updated");
        }

        info!(namespace = %self.namespace, fields = updates.len(), "PayPal settings updated");
        Ok(())
    }
}
