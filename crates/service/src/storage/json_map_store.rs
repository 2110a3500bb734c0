use std::{collections::HashMap, hash::Hash, path::{Path, PathBuf}, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file after every mutation. Without a
/// file path the map lives only in memory.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: Option<PathBuf>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Db(format!("corrupt store {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                write_map(&file_path, &empty).await?;
                empty
            }
            Err(e) => {
                return Err(ServiceError::Db(format!("read store {}: {e}", file_path.display())));
            }
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path: Some(file_path) }))
    }

    /// Store that never touches the filesystem.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(HashMap::new()), file_path: None })
    }

    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        match &self.file_path {
            Some(path) => write_map(path, map).await,
            None => Ok(()),
        }
    }

    /// List all values.
    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Remove a key and persist; returns whether it existed.
    ///
    /// The key stays in memory if the file write fails.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        if !map.contains_key(key) {
            return Ok(false);
        }
        let mut next = map.clone();
        next.remove(key);
        self.save(&next).await?;
        *map = next;
        Ok(true)
    }

    /// Apply a mutation to a copy of the map, persist it while still holding the
    /// write lock, then swap it in.
    ///
    /// The in-memory map is left untouched when `f` or the file write fails.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        self.save(&next).await?;
        *map = next;
        Ok(out)
    }
}

async fn write_map<K, V>(path: &Path, map: &HashMap<K, V>) -> Result<(), ServiceError>
where
    K: Eq + Hash + serde::Serialize,
    V: serde::Serialize,
{
    let data = serde_json::to_vec(map).map_err(|e| ServiceError::Db(e.to_string()))?;
    fs::write(path, data).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "json store write failed");
        ServiceError::Db(e.to_string())
    })
}
