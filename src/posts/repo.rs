use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::StoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
        }
    }

    pub fn parse(s: &str) -> Option<PostStatus> {
        match s {
            "DRAFT" => Some(PostStatus::Draft),
            "PUBLISHED" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostItem {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PostItem {
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            post_id: Uuid::new_v4(),
            author_id,
            title,
            content,
            status: PostStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields to change on an existing post. `None` means "leave as is".
#[derive(Debug, Clone)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: OffsetDateTime,
}

/// Post storage collaborator.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn get(&self, post_id: Uuid) -> Result<Option<PostItem>, StoreError>;

    /// Conditional insert, guarded on the id not existing yet.
    async fn insert(&self, post: &PostItem) -> Result<(), StoreError>;

    /// Partial update, guarded on the record existing; returns the record as
    /// stored after the update.
    async fn update(&self, post_id: Uuid, patch: PostPatch) -> Result<PostItem, StoreError>;

    async fn delete(&self, post_id: Uuid) -> Result<(), StoreError>;

    /// Scan with an optional substring filter over title/content and an
    /// optional result-count cap.
    async fn scan(
        &self,
        filter: Option<&str>,
        limit: Option<i32>,
    ) -> Result<Vec<PostItem>, StoreError>;
}
