use askama::Template;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::render::{file_name, PlanDocument};
use crate::{
    plan::{DietPlan, UserProfile},
    session::SessionStore,
    storage::StorageClient,
};

pub const LINK_TTL_SECONDS: u64 = 30 * 60;
const CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no plan is loaded")]
    NoPlan,
    #[error("render failed: {0}")]
    Render(#[from] askama::Error),
    #[error("storage failed: {0}")]
    Storage(anyhow::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedPlan {
    pub file_name: String,
    pub url: String,
}

pub fn object_key(user_id: Uuid, export_id: Uuid, file_name: &str) -> String {
    format!("exports/{user_id}/{export_id}/{file_name}")
}

pub fn render_document(profile: &UserProfile, plan: &DietPlan) -> Result<String, ExportError> {
    let today = OffsetDateTime::now_utc().date();
    Ok(PlanDocument::new(profile, plan, today).render()?)
}

#[instrument(skip(sessions, storage))]
pub async fn export_plan(
    sessions: &SessionStore,
    storage: &dyn StorageClient,
    user_id: Uuid,
) -> Result<ExportedPlan, ExportError> {
    let (profile, plan) = sessions
        .current_profile_and_plan(user_id)
        .await
        .ok_or(ExportError::NoPlan)?;

    let html = render_document(&profile, &plan)?;
    let file_name = file_name(&profile);
    let key = object_key(user_id, Uuid::new_v4(), &file_name);

    storage
        .put_object(&key, Bytes::from(html), CONTENT_TYPE)
        .await
        .map_err(ExportError::Storage)?;
    let url = storage
        .presign_get(&key, LINK_TTL_SECONDS)
        .await
        .map_err(ExportError::Storage)?;

    info!(user_id = %user_id, key = %key, "plan exported");
    Ok(ExportedPlan { file_name, url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::fixtures::{plan, profile};
    use crate::session::machine::Action;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStorage {
        puts: Mutex<Vec<(String, usize, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl StorageClient for RecordingStorage {
        async fn put_object(&self, key: &str, body: Bytes, ct: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("bucket unavailable");
            }
            self.puts
                .lock()
                .unwrap()
                .push((key.to_string(), body.len(), ct.to_string()));
            Ok(())
        }

        async fn presign_get(&self, key: &str, seconds: u64) -> anyhow::Result<String> {
            Ok(format!("https://files.local/{key}?ttl={seconds}"))
        }
    }

    async fn store_with_plan(user: Uuid) -> SessionStore {
        let sessions = SessionStore::default();
        sessions
            .apply(user, Action::SubmitProfile(profile()))
            .await
            .unwrap();
        sessions
            .apply(user, Action::Analyzed(crate::plan::AiResponse::Plan { plan: plan() }))
            .await
            .unwrap();
        sessions
    }

    #[tokio::test]
    async fn export_without_plan_is_rejected() {
        let storage = RecordingStorage::default();
        let err = export_plan(&SessionStore::default(), &storage, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::NoPlan));
        assert!(storage.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn export_uploads_under_account_prefix() {
        let user = Uuid::new_v4();
        let sessions = store_with_plan(user).await;
        let storage = RecordingStorage::default();

        let out = export_plan(&sessions, &storage, user).await.unwrap();
        assert_eq!(out.file_name, "NutriAI_Diyet_Plani_30yas.html");
        assert!(out.url.ends_with("ttl=1800"));

        let puts = storage.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        let (key, len, ct) = &puts[0];
        assert!(key.starts_with(&format!("exports/{user}/")));
        assert!(key.ends_with("/NutriAI_Diyet_Plani_30yas.html"));
        assert!(*len > 0);
        assert_eq!(ct, CONTENT_TYPE);
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let user = Uuid::new_v4();
        let sessions = store_with_plan(user).await;
        let storage = RecordingStorage {
            fail: true,
            ..Default::default()
        };
        let err = export_plan(&sessions, &storage, user).await.unwrap_err();
        assert!(matches!(err, ExportError::Storage(_)));
    }
}
