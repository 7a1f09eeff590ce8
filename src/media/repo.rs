use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::StoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Image,
    Video,
    Other,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "IMAGE",
            MediaType::Video => "VIDEO",
            MediaType::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<MediaType> {
        match s {
            "IMAGE" => Some(MediaType::Image),
            "VIDEO" => Some(MediaType::Video),
            "OTHER" => Some(MediaType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub media_id: Uuid,
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub mime_type: String,
    pub file_name: String,
    pub file_size: i64,
    /// Derived object key, never user-supplied.
    pub bucket_key: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MediaItem {
    pub fn new(
        owner_id: Uuid,
        post_id: Option<Uuid>,
        media_type: MediaType,
        mime_type: String,
        file_name: String,
        file_size: i64,
    ) -> Self {
        let media_id = Uuid::new_v4();
        let bucket_key = format!("media/{owner_id}/{media_id}-{file_name}");
        Self {
            media_id,
            owner_id,
            post_id,
            media_type,
            mime_type,
            file_name,
            file_size,
            bucket_key,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Media storage collaborator.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn get(&self, media_id: Uuid) -> Result<Option<MediaItem>, StoreError>;

    /// Conditional insert, guarded on the id not existing yet.
    async fn insert(&self, media: &MediaItem) -> Result<(), StoreError>;

    async fn delete(&self, media_id: Uuid) -> Result<(), StoreError>;

    async fn scan(&self, limit: Option<i32>) -> Result<Vec<MediaItem>, StoreError>;
}
