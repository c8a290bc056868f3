use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, Credentials, PublicUser, RefreshRequest},
        repo::User,
        services::{
            hash_password, is_valid_email, normalize_email, verify_password, AuthUser,
            MIN_PASSWORD_LEN,
        },
        JwtKeys,
    },
    error::{internal, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn unauthorized(msg: &str) -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, msg.to_string())
}

fn issue_tokens(state: &AppState, user: User) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id).map_err(internal)?;
    let refresh_token = keys.sign_refresh(user.id).map_err(internal)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }

    if User::find_by_email(&state.db, &email)
        .await
        .map_err(internal)?
        .is_some()
    {
        warn!(email = %email, "email already registered");
        return Err((StatusCode::CONFLICT, "Email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(internal)?;
    let user = User::create(&state.db, &email, &hash)
        .await
        .map_err(internal)?;

    info!(user_id = %user.id, "account registered");
    issue_tokens(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let Some(user) = User::find_by_email(&state.db, &email)
        .await
        .map_err(internal)?
    else {
        warn!(email = %email, "login unknown email");
        return Err(unauthorized("Invalid credentials"));
    };

    if !verify_password(&payload.password, &user.password_hash).map_err(internal)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, "logged in");
    issue_tokens(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let claims = JwtKeys::from_ref(&state)
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| {
            warn!(error = %e, "refresh rejected");
            unauthorized("Invalid refresh token")
        })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(internal)?
        .ok_or_else(|| unauthorized("User not found"))?;
    issue_tokens(&state, user)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| unauthorized("User not found"))?;
    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_uses_snake_case_tokens() {
        let response = AuthResponse {
            access_token: "a".into(),
            refresh_token: "r".into(),
            user: PublicUser {
                id: uuid::Uuid::nil(),
                email: "ayse@example.com".into(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["refresh_token"], "r");
        assert_eq!(json["user"]["email"], "ayse@example.com");
        assert!(json["user"].get("password_hash").is_none());
    }
}
