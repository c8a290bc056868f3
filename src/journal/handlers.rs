use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use super::model::{iso_date, ProgressSummary, WeightEntry, WeightHistory};
use crate::{
    auth::services::AuthUser,
    error::{bad_request, internal, ApiResult},
    persistence::{Bucket, WEIGHT_HISTORY_KEY},
    state::AppState,
};

pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/journal/weights", get(list_weights).put(record_weight))
        .route("/journal/weights/:date", delete(delete_weight))
}

#[derive(Debug, Deserialize)]
pub struct RecordWeightRequest {
    /// Defaults to today (UTC).
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct JournalResponse {
    pub entries: WeightHistory,
    pub summary: Option<ProgressSummary>,
}

impl From<WeightHistory> for JournalResponse {
    fn from(entries: WeightHistory) -> Self {
        let summary = entries.summary();
        Self { entries, summary }
    }
}

fn bucket(state: &AppState, user_id: Uuid) -> Bucket {
    Bucket::new(state.kv.clone(), user_id, WEIGHT_HISTORY_KEY)
}

async fn load(bucket: &Bucket) -> anyhow::Result<WeightHistory> {
    Ok(bucket.get_or_default::<WeightHistory>().await?.normalized())
}

#[instrument(skip(state))]
pub async fn list_weights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<JournalResponse>> {
    let history = load(&bucket(&state, user_id)).await.map_err(internal)?;
    Ok(Json(history.into()))
}

#[instrument(skip(state))]
pub async fn record_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RecordWeightRequest>,
) -> ApiResult<Json<JournalResponse>> {
    let date = body
        .date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let entry = WeightEntry::new(date, body.weight).map_err(bad_request)?;

    let bucket = bucket(&state, user_id);
    let mut history = load(&bucket).await.map_err(internal)?;
    history.upsert(entry);
    bucket.set(&history).await.map_err(internal)?;

    info!(%user_id, %date, weight = entry.weight, "weight recorded");
    Ok(Json(history.into()))
}

#[instrument(skip(state))]
pub async fn delete_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> ApiResult<Json<JournalResponse>> {
    let date = Date::parse(&date, format_description!("[year]-[month]-[day]"))
        .map_err(|_| bad_request("date must be YYYY-MM-DD"))?;

    let bucket = bucket(&state, user_id);
    let mut history = load(&bucket).await.map_err(internal)?;
    if history.remove(date) {
        bucket.set(&history).await.map_err(internal)?;
        info!(%user_id, %date, "weight entry deleted");
    }
    Ok(Json(history.into()))
}
