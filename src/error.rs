use std::fmt::Display;

use axum::http::StatusCode;
use tracing::error;

pub type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn internal<E: Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
}

pub fn bad_request<E: Display>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

pub fn conflict<E: Display>(e: E) -> (StatusCode, String) {
    (StatusCode::CONFLICT, e.to_string())
}
