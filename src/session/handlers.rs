use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AnswersRequest, SessionView, ShoppingListResponse},
    machine::{Action, SessionError},
    services::dispatch,
};
use crate::{
    auth::services::AuthUser,
    error::{bad_request, conflict, ApiResult},
    plan::{shopping::shopping_list, UserProfile},
    state::AppState,
};

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/profile", post(submit_profile))
        .route("/session/answers", post(submit_answers))
        .route("/session/tracker", post(toggle_tracker))
        .route("/session/reset", post(reset))
        .route("/session/shopping-list", get(get_shopping_list))
}

fn session_error(e: SessionError) -> (StatusCode, String) {
    match e {
        SessionError::MissingAnswer(_) => bad_request(e),
        SessionError::InFlight | SessionError::InvalidTransition { .. } => {
            warn!(error = %e, "session action rejected");
            conflict(e)
        }
    }
}

async fn run(state: &AppState, user_id: uuid::Uuid, action: Action) -> ApiResult<Json<SessionView>> {
    let next = dispatch(&state.sessions, state.planner.clone(), user_id, action)
        .await
        .map_err(session_error)?;
    Ok(Json(SessionView::from(&next)))
}

#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<SessionView> {
    Json(SessionView::from(&state.sessions.snapshot(user_id).await))
}

#[instrument(skip(state, profile))]
pub async fn submit_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(profile): Json<UserProfile>,
) -> ApiResult<Json<SessionView>> {
    profile.validate().map_err(bad_request)?;
    info!(%user_id, goal = profile.goal.as_str(), "profile submitted");
    run(&state, user_id, Action::SubmitProfile(profile)).await
}

#[instrument(skip(state, body))]
pub async fn submit_answers(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AnswersRequest>,
) -> ApiResult<Json<SessionView>> {
    run(&state, user_id, Action::SubmitAnswers(body.answers)).await
}

#[instrument(skip(state))]
pub async fn toggle_tracker(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<SessionView>> {
    run(&state, user_id, Action::ToggleTracker).await
}

#[instrument(skip(state))]
pub async fn reset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<SessionView>> {
    run(&state, user_id, Action::Reset).await
}

#[instrument(skip(state))]
pub async fn get_shopping_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ShoppingListResponse>> {
    let plan = state
        .sessions
        .current_plan(user_id)
        .await
        .ok_or_else(|| conflict("no plan is loaded"))?;
    Ok(Json(ShoppingListResponse {
        items: shopping_list(&plan),
    }))
}
