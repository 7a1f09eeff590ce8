use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::claims::Role;
use crate::db::StoreError;

/// Account record. `passwordHash` is the only persisted credential material
/// and never serializes outward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserItem {
    pub user_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserItem {
    /// New accounts always start as `AUTHOR`.
    pub fn new(email: String, password_hash: String, name: Option<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            user_id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role: Role::Author,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Account storage collaborator.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up at most one account by its unique, lower-cased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserItem>, StoreError>;

    /// Conditional insert: fails with [`StoreError::Conflict`] when the
    /// uniqueness guard is violated. Of two racing inserts for the same
    /// account exactly one may succeed.
    async fn insert(&self, user: &UserItem) -> Result<(), StoreError>;
}
