use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::KeyValueStore;

#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<(Uuid, String), String>>,
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, owner: Uuid, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .entries
            .read()
            .await
            .get(&(owner, key.to_string()))
            .cloned())
    }

    async fn set(&self, owner: Uuid, key: &str, value: String) -> anyhow::Result<()> {
        self.entries
            .write()
            .await
            .insert((owner, key.to_string()), value);
        Ok(())
    }
}
