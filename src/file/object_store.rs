//! Remote object store clients.
//!
//! File bytes live with a hosted provider (ImageKit); Droply only keeps the
//! provider's object id and asks the provider to drop the object when the
//! node is deleted.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::ObjectStoreConfig;
use crate::{DroplyError, Result};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// User agent string for provider calls.
const USER_AGENT: &str = concat!("droply/", env!("CARGO_PKG_VERSION"));

/// Deletes remote objects by provider id.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Delete one object. An object that is already gone counts as deleted.
    async fn delete_object(&self, remote_id: &str) -> Result<()>;
}

/// ImageKit media API client.
pub struct ImageKitClient {
    client: Client,
    api_base: Url,
    private_key: String,
}

impl ImageKitClient {
    /// Create a client from the object store configuration.
    pub fn new(config: &ObjectStoreConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base).map_err(|e| {
            DroplyError::Config(format!("invalid object_store.api_base: {}", e))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(DroplyError::Config(format!(
                "invalid object_store.api_base: {}",
                config.api_base
            )));
        }

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        let client = builder
            .build()
            .map_err(|e| {
                DroplyError::ObjectStore(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_base,
            private_key: config.private_key.clone(),
        })
    }

    /// URL of the file resource for a remote id.
    fn file_url(&self, remote_id: &str) -> Url {
        let mut url = self.api_base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "files", remote_id]);
        }
        url
    }
}

#[async_trait]
impl ObjectStore for ImageKitClient {
    async fn delete_object(&self, remote_id: &str) -> Result<()> {
        let url = self.file_url(remote_id);

        let response = self
            .client
            .delete(url)
            .basic_auth(&self.private_key, Some(""))
            .send()
            .await
            .map_err(|e| DroplyError::ObjectStore(format!("failed to delete {}: {}", remote_id, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Remote object {} already absent", remote_id);
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DroplyError::ObjectStore(format!(
                "failed to delete {}: HTTP {} {}",
                remote_id,
                status,
                body.trim()
            )));
        }

        Ok(())
    }
}

/// In-process object store for development and tests.
///
/// Records every delete call and can be told to fail for given ids.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object.
    pub fn insert(&self, remote_id: impl Into<String>) {
        lock(&self.objects).insert(remote_id.into());
    }

    /// Whether an object is still stored.
    pub fn contains(&self, remote_id: &str) -> bool {
        lock(&self.objects).contains(remote_id)
    }

    /// Make every delete of `remote_id` fail.
    pub fn fail_on(&self, remote_id: impl Into<String>) {
        lock(&self.failing).insert(remote_id.into());
    }

    /// Every remote id passed to `delete_object`, in call order.
    pub fn delete_calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of delete calls made for `remote_id`.
    pub fn delete_count(&self, remote_id: &str) -> usize {
        lock(&self.calls).iter().filter(|id| *id == remote_id).count()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn delete_object(&self, remote_id: &str) -> Result<()> {
        lock(&self.calls).push(remote_id.to_string());

        if lock(&self.failing).contains(remote_id) {
            return Err(DroplyError::ObjectStore(format!(
                "failed to delete {}: injected failure",
                remote_id
            )));
        }

        lock(&self.objects).remove(remote_id);
        Ok(())
    }
}
