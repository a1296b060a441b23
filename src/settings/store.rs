use std::collections::BTreeMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::{Error, Result};

/// Flat, dot-keyed configuration persistence owned by the host.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> + Send;

    /// Write every entry or none of them.
    fn set_many(&self, entries: Vec<(String, Value)>) -> impl Future<Output = Result<()>> + Send;

    /// Every key starting with `prefix`, with its value.
    fn list(&self, prefix: &str) -> impl Future<Output = Result<BTreeMap<String, Value>>> + Send;
}

fn collect_prefixed(map: &BTreeMap<String, Value>, prefix: &str) -> BTreeMap<String, Value> {
    map.range(prefix.to_owned()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    inner: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let map = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn snapshot(&self) -> BTreeMap<String, Value> {
        self.inner.read().await.clone()
    }
}

impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.inner.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<()> {
        self.inner.write().await.extend(entries);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<BTreeMap<String, Value>> {
        Ok(collect_prefixed(&*self.inner.read().await, prefix))
    }
}

/// Store persisted as a YAML mapping of flat keys, rewritten atomically on every write.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    inner: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl FileSettingsStore {
    /// Load `path`; a missing file starts an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_yaml::from_str::<BTreeMap<String, Value>>(&content).map_err(|e| {
                Error::Store(format!("invalid settings file '{}': {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("settings file '{}' not found, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(Error::Store(format!(
                    "failed to read settings file '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            inner: Arc::new(RwLock::new(values)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &BTreeMap<String, Value>) -> Result<()> {
        let content = serde_yaml::to_string(values)
            .map_err(|e| Error::Store(format!("failed to encode settings: {}", e)))?;

        // write + rename keeps readers from seeing a half-written file
        let tmp_path = self.path.with_extension("yaml.tmp");
        tokio::fs::write(&tmp_path, content.as_bytes())
            .await
            .map_err(|e| Error::Store(format!("failed to write '{}': {}", tmp_path.display(), e)))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| Error::Store(format!("failed to replace '{}': {}", self.path.display(), e)))?;

        debug!("settings persisted to '{}'", self.path.display());
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.set_many(vec![(key.to_owned(), value)]).await
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<()> {
        // hold the write lock across the file write so concurrent writers serialize
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.extend(entries);
        self.persist(&next).await?;
        *map = next;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<BTreeMap<String, Value>> {
        Ok(collect_prefixed(&*self.inner.read().await, prefix))
    }
}

/// Store selected by configuration.
#[derive(Debug, Clone)]
pub enum SettingsStoreKind {
    Memory(InMemorySettingsStore),
    File(FileSettingsStore),
}

impl SettingsStore for SettingsStoreKind {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        match self {
            SettingsStoreKind::Memory(s) => s.get(key).await,
            SettingsStoreKind::File(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        match self {
            SettingsStoreKind::Memory(s) => s.set(key, value).await,
            SettingsStoreKind::File(s) => s.set(key, value).await,
        }
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<()> {
        match self {
            SettingsStoreKind::Memory(s) => s.set_many(entries).await,
            SettingsStoreKind::File(s) => s.set_many(entries).await,
        }
    }

    async fn list(&self, prefix: &str) -> Result<BTreeMap<String, Value>> {
        match self {
            SettingsStoreKind::Memory(s) => s.list(prefix).await,
            SettingsStoreKind::File(s) => s.list(prefix).await,
        }
    }
}
