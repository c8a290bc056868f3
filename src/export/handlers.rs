use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, instrument, warn};

use super::services::{export_plan, ExportError, ExportedPlan};
use crate::{auth::services::AuthUser, error::ApiResult, state::AppState};

pub fn export_routes() -> Router<AppState> {
    Router::new().route("/session/export", post(export))
}

fn export_error(e: ExportError) -> (StatusCode, String) {
    match e {
        ExportError::NoPlan => {
            warn!("export requested without a plan");
            (StatusCode::CONFLICT, e.to_string())
        }
        ExportError::Render(_) | ExportError::Storage(_) => {
            error!(error = %e, "export failed");
            (StatusCode::BAD_GATEWAY, "export failed".into())
        }
    }
}

#[instrument(skip(state))]
pub async fn export(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ExportedPlan>> {
    export_plan(&state.sessions, state.storage.as_ref(), user_id)
        .await
        .map(Json)
        .map_err(export_error)
}
