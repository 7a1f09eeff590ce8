use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::claims::AuthenticatedUser;
use crate::error::ApiError;
use crate::posts::dto::{ListQuery, PostList};
use crate::posts::repo::PostItem;
use crate::posts::services;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post).get(list_posts))
        .route(
            "/posts/:post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
}

fn non_empty(body: &str) -> Option<&str> {
    (!body.is_empty()).then_some(body)
}

#[instrument(skip(state, user, body))]
async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: String,
) -> Result<(StatusCode, Json<PostItem>), ApiError> {
    let post = services::create(&state, &user, non_empty(&body)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostItem>, ApiError> {
    let post = services::fetch(&state, &post_id).await?;
    Ok(Json(post))
}

#[instrument(skip(state))]
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PostList>, ApiError> {
    let items = services::list(&state, query.filter(), query.cap()).await?;
    let count = items.len();
    Ok(Json(PostList { items, count }))
}

#[instrument(skip(state, user, body))]
async fn update_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(post_id): Path<String>,
    body: String,
) -> Result<Json<PostItem>, ApiError> {
    let post = services::update(&state, &user, &post_id, non_empty(&body)).await?;
    Ok(Json(post))
}

#[instrument(skip(state, user))]
async fn delete_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(post_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    services::remove(&state, &user, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
