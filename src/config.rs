use anyhow::Context;

/// Process-wide configuration, loaded once at startup and shared read-only.
///
/// The JWT secret stays an `Option`: its absence is classified per request as
/// a configuration error instead of aborting startup, so unauthenticated
/// read traffic keeps working on a misconfigured node.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: Option<String>,
    pub users_table: String,
    pub posts_table: String,
    pub media_table: String,
    pub media_bucket: String,
    /// TTL for pre-signed upload/download URLs, seconds.
    pub presign_ttl_secs: u64,
}

const DEFAULT_PRESIGN_TTL_SECS: u64 = 15 * 60;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            jwt_secret: std::env::var("JWT_SECRET").ok(),
            users_table: std::env::var("USERS_TABLE").context("USERS_TABLE is not set")?,
            posts_table: std::env::var("POSTS_TABLE").context("POSTS_TABLE is not set")?,
            media_table: std::env::var("MEDIA_TABLE").context("MEDIA_TABLE is not set")?,
            media_bucket: std::env::var("MEDIA_BUCKET").context("MEDIA_BUCKET is not set")?,
            presign_ttl_secs: std::env::var("PRESIGN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_PRESIGN_TTL_SECS),
        })
    }
}
