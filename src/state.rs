use std::sync::Arc;

use aws_config::BehaviorVersion;

use crate::auth::repo::AccountStore;
use crate::config::AppConfig;
use crate::db::{DynamoAccounts, DynamoMedia, DynamoPosts};
use crate::media::repo::MediaStore;
use crate::posts::repo::PostStore;
use crate::storage::{BlobStore, S3Blobs};

/// Shared per-process state: read-only configuration plus the storage
/// collaborators behind trait objects.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub posts: Arc<dyn PostStore>,
    pub media: Arc<dyn MediaStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let accounts =
            Arc::new(DynamoAccounts::new(&sdk_config, &config.users_table)) as Arc<dyn AccountStore>;
        let posts =
            Arc::new(DynamoPosts::new(&sdk_config, &config.posts_table)) as Arc<dyn PostStore>;
        let media =
            Arc::new(DynamoMedia::new(&sdk_config, &config.media_table)) as Arc<dyn MediaStore>;
        let blobs =
            Arc::new(S3Blobs::new(&sdk_config, &config.media_bucket)) as Arc<dyn BlobStore>;

        Ok(Self {
            config,
            accounts,
            posts,
            media,
            blobs,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        accounts: Arc<dyn AccountStore>,
        posts: Arc<dyn PostStore>,
        media: Arc<dyn MediaStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            config,
            accounts,
            posts,
            media,
            blobs,
        }
    }

    /// State wired to in-memory collaborators; no network, no environment.
    pub fn fake() -> Self {
        use crate::memory::{FakeBlobs, MemoryAccounts, MemoryMedia, MemoryPosts};

        let config = Arc::new(AppConfig {
            jwt_secret: Some("test-secret".into()),
            users_table: "users-test".into(),
            posts_table: "posts-test".into(),
            media_table: "media-test".into(),
            media_bucket: "media-bucket-test".into(),
            presign_ttl_secs: 900,
        });

        Self {
            config,
            accounts: Arc::new(MemoryAccounts::default()),
            posts: Arc::new(MemoryPosts::default()),
            media: Arc::new(MemoryMedia::default()),
            blobs: Arc::new(FakeBlobs),
        }
    }
}
