use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use sf_core::ports::ClientStoragePort;

/// Client storage kept as one JSON object on disk.
///
/// Every `set`/`remove` rewrites the whole file through a temp file and a
/// rename, so a crash leaves either the old or the new map.
pub struct FileClientStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl FileClientStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.dir() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create storage dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Missing file reads as an empty map.
    async fn load_map(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read storage failed: {}", self.path.display()))
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("parse storage json failed: {}", self.path.display()))?;
        match value {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!(
                "storage file {} holds {} instead of an object",
                self.path.display(),
                type_name(&other)
            ),
        }
    }

    async fn atomic_write(&self, map: &Map<String, Value>) -> Result<()> {
        self.ensure_parent_dir().await?;

        let content =
            serde_json::to_string_pretty(map).context("serialize client storage failed")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp storage failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp storage to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl ClientStoragePort for FileClientStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let map = self.load_map().await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        map.insert(key.to_string(), value);
        self.atomic_write(&map).await?;
        debug!(key, "client storage key written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.atomic_write(&map).await?;
        debug!(key, "client storage key removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> FileClientStorage {
        FileClientStorage::new(dir.path().join("nested").join("client_storage.json"))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        assert_eq!(storage.get("authToken").await.unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn set_creates_parent_dir_and_persists() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.set("authToken", json!("tok-1")).await.unwrap();
        storage
            .set("student", json!({"email": "a@b.co"}))
            .await
            .unwrap();

        let reopened = storage_in(&dir);
        assert_eq!(
            reopened.get_string("authToken").await.unwrap().as_deref(),
            Some("tok-1")
        );
        assert_eq!(
            reopened.get("student").await.unwrap(),
            Some(json!({"email": "a@b.co"}))
        );
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn set_overwrites_existing_key() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.set("authToken", json!("old")).await.unwrap();
        storage.set("authToken", json!("new")).await.unwrap();

        assert_eq!(
            storage.get_string("authToken").await.unwrap().as_deref(),
            Some("new")
        );
    }

    #[tokio::test]
    async fn remove_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.remove("nothing").await.unwrap();
        storage.set("authToken", json!("tok")).await.unwrap();
        storage.remove("authToken").await.unwrap();

        assert_eq!(storage.get("authToken").await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_string_ignores_non_string_values() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.set("authToken", json!(42)).await.unwrap();
        assert_eq!(storage.get_string("authToken").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client_storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileClientStorage::new(&path);
        let err = storage.get("authToken").await.unwrap_err();
        assert!(err.to_string().contains("parse storage json failed"));
    }

    #[tokio::test]
    async fn non_object_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client_storage.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let storage = FileClientStorage::new(&path);
        let err = storage.get("authToken").await.unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
