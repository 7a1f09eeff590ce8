//! In-memory store implementations backing `AppState::fake()` and the test
//! suite, with the same guard semantics as the real collaborators.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo::{AccountStore, UserItem};
use crate::db::StoreError;
use crate::media::repo::{MediaItem, MediaStore};
use crate::posts::repo::{PostItem, PostPatch, PostStore};
use crate::storage::BlobStore;

#[derive(Default)]
pub struct MemoryAccounts {
    items: Mutex<HashMap<Uuid, UserItem>>,
}

#[async_trait]
impl AccountStore for MemoryAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserItem>, StoreError> {
        let items = self.items.lock().unwrap();
        Ok(items.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &UserItem) -> Result<(), StoreError> {
        // Id and email uniqueness under one lock: of two racing inserts for
        // the same email exactly one wins.
        let mut items = self.items.lock().unwrap();
        if items.contains_key(&user.user_id) || items.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict);
        }
        items.insert(user.user_id, user.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPosts {
    items: Mutex<HashMap<Uuid, PostItem>>,
}

#[async_trait]
impl PostStore for MemoryPosts {
    async fn get(&self, post_id: Uuid) -> Result<Option<PostItem>, StoreError> {
        Ok(self.items.lock().unwrap().get(&post_id).cloned())
    }

    async fn insert(&self, post: &PostItem) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap();
        if items.contains_key(&post.post_id) {
            return Err(StoreError::Conflict);
        }
        items.insert(post.post_id, post.clone());
        Ok(())
    }

    async fn update(&self, post_id: Uuid, patch: PostPatch) -> Result<PostItem, StoreError> {
        let mut items = self.items.lock().unwrap();
        let post = items.get_mut(&post_id).ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        post.updated_at = patch.updated_at;
        Ok(post.clone())
    }

    async fn delete(&self, post_id: Uuid) -> Result<(), StoreError> {
        self.items.lock().unwrap().remove(&post_id);
        Ok(())
    }

    async fn scan(
        &self,
        filter: Option<&str>,
        limit: Option<i32>,
    ) -> Result<Vec<PostItem>, StoreError> {
        let items = self.items.lock().unwrap();
        let mut hits: Vec<PostItem> = items
            .values()
            .filter(|p| match filter {
                Some(q) => p.title.contains(q) || p.content.contains(q),
                None => true,
            })
            .cloned()
            .collect();
        if let Some(limit) = limit {
            hits.truncate(limit as usize);
        }
        Ok(hits)
    }
}

#[derive(Default)]
pub struct MemoryMedia {
    items: Mutex<HashMap<Uuid, MediaItem>>,
}

#[async_trait]
impl MediaStore for MemoryMedia {
    async fn get(&self, media_id: Uuid) -> Result<Option<MediaItem>, StoreError> {
        Ok(self.items.lock().unwrap().get(&media_id).cloned())
    }

    async fn insert(&self, media: &MediaItem) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap();
        if items.contains_key(&media.media_id) {
            return Err(StoreError::Conflict);
        }
        items.insert(media.media_id, media.clone());
        Ok(())
    }

    async fn delete(&self, media_id: Uuid) -> Result<(), StoreError> {
        self.items.lock().unwrap().remove(&media_id);
        Ok(())
    }

    async fn scan(&self, limit: Option<i32>) -> Result<Vec<MediaItem>, StoreError> {
        let items = self.items.lock().unwrap();
        let mut hits: Vec<MediaItem> = items.values().cloned().collect();
        if let Some(limit) = limit {
            hits.truncate(limit as usize);
        }
        Ok(hits)
    }
}

/// Blob collaborator that mints deterministic URLs instead of talking to S3.
pub struct FakeBlobs;

#[async_trait]
impl BlobStore for FakeBlobs {
    async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        ttl: Duration,
    ) -> anyhow::Result<String> {
        Ok(format!(
            "https://blobs.local/{key}?op=put&expires={}",
            ttl.as_secs()
        ))
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> anyhow::Result<String> {
        Ok(format!(
            "https://blobs.local/{key}?op=get&expires={}",
            ttl.as_secs()
        ))
    }
}
