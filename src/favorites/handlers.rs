use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::model::FavoriteMeals;
use crate::{
    auth::services::AuthUser,
    error::{bad_request, internal, ApiResult},
    persistence::{Bucket, FAVORITE_MEALS_KEY},
    plan::Meal,
    state::AppState,
};

pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/:meal_id/toggle", post(toggle_favorite))
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub ids: FavoriteMeals,
    /// Favorites found in the plan of the current session.
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub meal_id: String,
    pub favorite: bool,
    pub ids: FavoriteMeals,
}

fn bucket(state: &AppState, user_id: Uuid) -> Bucket {
    Bucket::new(state.kv.clone(), user_id, FAVORITE_MEALS_KEY)
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<FavoritesResponse>> {
    let ids: FavoriteMeals = bucket(&state, user_id)
        .get_or_default()
        .await
        .map_err(internal)?;
    let meals = match state.sessions.current_plan(user_id).await {
        Some(plan) => ids.meals_in(&plan).into_iter().cloned().collect(),
        None => Vec::new(),
    };
    Ok(Json(FavoritesResponse { ids, meals }))
}

#[instrument(skip(state))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(meal_id): Path<String>,
) -> ApiResult<Json<ToggleResponse>> {
    let meal_id = meal_id.trim().to_string();
    if meal_id.is_empty() {
        return Err(bad_request("meal id must not be empty"));
    }

    let bucket = bucket(&state, user_id);
    let mut ids: FavoriteMeals = bucket.get_or_default().await.map_err(internal)?;
    let favorite = ids.toggle(&meal_id);
    bucket.set(&ids).await.map_err(internal)?;

    info!(%user_id, %meal_id, favorite, "favorite toggled");
    Ok(Json(ToggleResponse {
        meal_id,
        favorite,
        ids,
    }))
}
