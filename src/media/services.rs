use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;

use crate::auth::claims::AuthenticatedUser;
use crate::auth::policy::{is_permitted, PERMISSION_DENIED};
use crate::error::ApiError;
use crate::media::dto::CreatedMedia;
use crate::media::repo::MediaItem;
use crate::media::validate::validate_create_media_payload;
use crate::posts::policy::can_modify_post;
use crate::state::AppState;

const MEDIA_NOT_FOUND: &str = "Media not found";
const UNKNOWN_POST: &str = "postId does not reference an existing post";

fn unexpected(op: &str) -> ApiError {
    ApiError::Unexpected(format!("An unexpected error occurred while {op}"))
}

/// Create a media record and issue a pre-signed upload URL.
///
/// When the payload names a post, the post must exist and the caller must be
/// allowed to modify it; both checks run before any write.
pub async fn create(
    state: &AppState,
    user: &AuthenticatedUser,
    body: Option<&str>,
) -> Result<CreatedMedia, ApiError> {
    let payload = validate_create_media_payload(body)?;

    let post_id = match payload.post_id.as_deref() {
        Some(raw) => {
            let post = match Uuid::parse_str(raw).ok() {
                Some(id) => state.posts.get(id).await.map_err(|e| {
                    error!(error = %e, "post lookup for media failed");
                    unexpected("creating the media item")
                })?,
                None => None,
            };
            let Some(post) = post else {
                return Err(ApiError::Validation(UNKNOWN_POST.into()));
            };
            can_modify_post(user, &post)?;
            Some(post.post_id)
        }
        None => None,
    };

    let media = MediaItem::new(
        user.user_id,
        post_id,
        payload.media_type,
        payload.mime_type,
        payload.file_name,
        payload.file_size,
    );

    state.media.insert(&media).await.map_err(|e| {
        error!(error = %e, "insert media failed");
        unexpected("creating the media item")
    })?;

    let ttl = Duration::from_secs(state.config.presign_ttl_secs);
    let upload_url = state
        .blobs
        .presign_put(&media.bucket_key, &media.mime_type, ttl)
        .await
        .map_err(|e| {
            error!(error = %e, "presign upload url failed");
            unexpected("creating the media item")
        })?;

    info!(media_id = %media.media_id, owner_id = %media.owner_id, "media created");
    Ok(CreatedMedia { media, upload_url })
}

pub async fn fetch(state: &AppState, media_id: &str) -> Result<MediaItem, ApiError> {
    let Some(media_id) = Uuid::parse_str(media_id).ok() else {
        return Err(ApiError::NotFound(MEDIA_NOT_FOUND.into()));
    };
    state
        .media
        .get(media_id)
        .await
        .map_err(|e| {
            error!(error = %e, "get media failed");
            unexpected("fetching the media item")
        })?
        .ok_or_else(|| ApiError::NotFound(MEDIA_NOT_FOUND.into()))
}

pub async fn list(state: &AppState, limit: Option<i32>) -> Result<Vec<MediaItem>, ApiError> {
    state.media.scan(limit).await.map_err(|e| {
        error!(error = %e, "scan media failed");
        unexpected("listing media")
    })
}

/// Pre-signed, time-limited download URL for the stored object.
pub async fn download_url(state: &AppState, media_id: &str) -> Result<String, ApiError> {
    let media = fetch(state, media_id).await?;
    let ttl = Duration::from_secs(state.config.presign_ttl_secs);
    state
        .blobs
        .presign_get(&media.bucket_key, ttl)
        .await
        .map_err(|e| {
            error!(error = %e, "presign download url failed");
            unexpected("preparing the download")
        })
}

/// Delete the media record. The same ownership rule as post mutation,
/// evaluated against the media item's owner.
pub async fn remove(
    state: &AppState,
    user: &AuthenticatedUser,
    media_id: &str,
) -> Result<(), ApiError> {
    let media = fetch(state, media_id).await?;

    if !is_permitted(user.role, media.owner_id == user.user_id) {
        return Err(ApiError::Authorization(PERMISSION_DENIED.into()));
    }

    state.media.delete(media.media_id).await.map_err(|e| {
        error!(error = %e, "delete media failed");
        unexpected("deleting the media item")
    })?;

    info!(media_id = %media.media_id, "media deleted");
    Ok(())
}
