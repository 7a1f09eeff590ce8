use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::claims::AuthenticatedUser;
use crate::error::ApiError;
use crate::media::dto::{CreatedMedia, MediaList, MediaListQuery};
use crate::media::repo::MediaItem;
use crate::media::services;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/media", post(create_media).get(list_media))
        .route("/media/:media_id", get(get_media).delete(delete_media))
        .route("/media/:media_id/download", get(download_media))
}

fn non_empty(body: &str) -> Option<&str> {
    (!body.is_empty()).then_some(body)
}

#[instrument(skip(state, user, body))]
async fn create_media(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: String,
) -> Result<(StatusCode, Json<CreatedMedia>), ApiError> {
    let created = services::create(&state, &user, non_empty(&body)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
async fn get_media(
    State(state): State<AppState>,
    Path(media_id): Path<String>,
) -> Result<Json<MediaItem>, ApiError> {
    let media = services::fetch(&state, &media_id).await?;
    Ok(Json(media))
}

#[instrument(skip(state))]
async fn list_media(
    State(state): State<AppState>,
    Query(query): Query<MediaListQuery>,
) -> Result<Json<MediaList>, ApiError> {
    let items = services::list(&state, query.cap()).await?;
    let count = items.len();
    Ok(Json(MediaList { items, count }))
}

/// 302 with the pre-signed URL in `Location`; no body.
#[instrument(skip(state))]
async fn download_media(
    State(state): State<AppState>,
    Path(media_id): Path<String>,
) -> Result<(StatusCode, HeaderMap), ApiError> {
    let url = services::download_url(&state, &media_id).await?;
    let mut headers = HeaderMap::new();
    let location = url
        .parse()
        .map_err(|_| ApiError::Unexpected("An unexpected error occurred while preparing the download".into()))?;
    headers.insert(header::LOCATION, location);
    Ok((StatusCode::FOUND, headers))
}

#[instrument(skip(state, user))]
async fn delete_media(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(media_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    services::remove(&state, &user, &media_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
