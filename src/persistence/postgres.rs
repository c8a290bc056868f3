use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::KeyValueStore;

/// Rows of `user_kv`, one JSON document per account and key.
#[derive(Clone)]
pub struct PgKeyValueStore {
    db: PgPool,
}

impl PgKeyValueStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, owner: Uuid, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>(
            r#"
            SELECT value
              FROM user_kv
             WHERE user_id = $1 AND key = $2
            "#,
        )
        .bind(owner)
        .bind(key)
        .fetch_optional(&self.db)
        .await
        .context("select user_kv")?;
        Ok(row)
    }

    async fn set(&self, owner: Uuid, key: &str, value: String) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_kv (user_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(owner)
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await
        .context("upsert user_kv")?;
        Ok(())
    }
}
