use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{AuthResponse, RegisteredUser};
use crate::auth::services;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

fn non_empty(body: &str) -> Option<&str> {
    (!body.is_empty()).then_some(body)
}

#[instrument(skip(state, body))]
async fn register(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    let created = services::register(&state, non_empty(&body)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, body))]
async fn login(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<AuthResponse>, ApiError> {
    let auth = services::login(&state, non_empty(&body)).await?;
    Ok(Json(auth))
}
