use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file and provides simple CRUD helpers.
/// The whole map lives in memory; every mutation rewrites the file through a
/// temporary sibling and a rename, so a crash never leaves a half-written file.
/// Writers are serialised by the lock, and a mutation becomes visible only
/// once it is on disk.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    /// A file that exists but does not parse is an error rather than silently emptied.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{}: {}", file_path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(ServiceError::storage)?)
                    .await
                    .map_err(ServiceError::storage)?;
                empty
            }
            Err(e) => return Err(ServiceError::storage(e)),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(map).map_err(ServiceError::storage)?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        fs::rename(&tmp, &self.file_path).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    /// List all entries as `(key, value)` pairs.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get value by key.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// All values for which `pred` holds.
    pub async fn values_where<F>(&self, pred: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let map = self.inner.read().await;
        map.values().filter(|v| pred(v)).cloned().collect()
    }

    /// Insert or update a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.update_map(move |map| {
            map.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove<Q>(&self, key: &Q) -> Result<bool, ServiceError>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
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

    /// Apply a mutation to a copy of the map, persist it, then publish it.
    /// When `f` or the write fails, readers keep seeing the previous map.
    pub async fn update_map<F>(&self, f: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<(), ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        f(&mut next)?;
        self.save(&next).await?;
        *map = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonMapStore::<String, String>::new(&tmp).await?;

        // initially empty
        assert_eq!(store.list().await.len(), 0);

        // insert and check
        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        assert_eq!(store.get("a").await.as_deref(), Some("1"));
        assert_eq!(store.values_where(|v| v == "2").await, vec!["2".to_string()]);

        // update_map
        store
            .update_map(|m| {
                if let Some(v) = m.get_mut("a") { *v = "10".into(); }
                Ok(())
            })
            .await?;
        assert_eq!(store.get("a").await.as_deref(), Some("10"));

        // remove and reload persistence
        assert!(store.remove("b").await?);
        assert!(!store.remove("b").await?);
        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        let entries = reloaded.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(reloaded.get("a").await.as_deref(), Some("10"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_is_not_persisted() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonMapStore::<String, String>::new(&tmp).await?;
        store.insert("a".into(), "1".into()).await?;

        let res = store
            .update_map(|_| Err(ServiceError::not_found("entry")))
            .await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));

        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        assert_eq!(reloaded.get("a").await.as_deref(), Some("1"));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, b"{not json").await?;
        let res = JsonMapStore::<String, String>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_save_leaves_map_unchanged() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_map_store_{}", uuid::Uuid::new_v4()));
        let path = dir.join("customers.json");
        let store = JsonMapStore::<String, String>::new(&path).await?;
        store.insert("a".into(), "1".into()).await?;

        // a non-empty directory in place of the file makes the rename fail
        tokio::fs::remove_file(&path).await?;
        tokio::fs::create_dir_all(path.join("blocker")).await?;

        assert!(store.insert("b".into(), "2".into()).await.is_err());
        assert!(store.get("b").await.is_none());
        assert_eq!(store.list().await.len(), 1);

        assert!(store.remove("a").await.is_err());
        assert_eq!(store.get("a").await.as_deref(), Some("1"));

        let res = store
            .update_map(|m| {
                m.clear();
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        assert_eq!(store.list().await.len(), 1);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
