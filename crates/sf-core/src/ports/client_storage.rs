//! Durable client storage port
//!
//! Key → JSON value store that survives restarts. The session layer keeps the
//! bearer token, the signed-in identity and the admin gate here.

use async_trait::async_trait;

#[async_trait]
pub trait ClientStoragePort: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>>;

    async fn set(&self, key: &str, value: serde_json::Value) -> anyhow::Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;

    async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .get(key)
            .await?
            .and_then(|value| value.as_str().map(str::to_string)))
    }
}
