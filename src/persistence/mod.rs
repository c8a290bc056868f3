//! Per-account key-value persistence for small JSON documents.
//!
//! Values are stored as raw JSON text so that a corrupt document can be
//! detected on read and replaced with an empty default instead of failing
//! the request.

mod memory;
mod postgres;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;
use uuid::Uuid;

pub use memory::MemoryKeyValueStore;
pub use postgres::PgKeyValueStore;

pub const WEIGHT_HISTORY_KEY: &str = "weightHistory";
pub const FAVORITE_MEALS_KEY: &str = "favoriteMeals";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, owner: Uuid, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, owner: Uuid, key: &str, value: String) -> anyhow::Result<()>;
}

/// Typed view over one key of one account.
pub struct Bucket {
    store: Arc<dyn KeyValueStore>,
    owner: Uuid,
    key: &'static str,
}

impl Bucket {
    pub fn new(store: Arc<dyn KeyValueStore>, owner: Uuid, key: &'static str) -> Self {
        Self { store, owner, key }
    }

    /// Missing and undecodable documents both come back as `None`.
    pub async fn get<T: DeserializeOwned>(&self) -> anyhow::Result<Option<T>> {
        let Some(raw) = self
            .store
            .get(self.owner, self.key)
            .await
            .with_context(|| format!("read {}", self.key))?
        else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!(error = %e, owner = %self.owner, key = self.key, "stored value is corrupt; using default");
                Ok(None)
            }
        }
    }

    pub async fn get_or_default<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        Ok(self.get().await?.unwrap_or_default())
    }

    pub async fn set<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let raw = serde_json::to_string(value).context("encode stored value")?;
        self.store
            .set(self.owner, self.key, raw)
            .await
            .with_context(|| format!("write {}", self.key))
    }
}
