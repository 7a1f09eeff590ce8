use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::{types::AttributeValue, types::ReturnValue, Client};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::auth::claims::Role;
use crate::auth::repo::{AccountStore, UserItem};
use crate::media::repo::{MediaItem, MediaStore, MediaType};
use crate::posts::repo::{PostItem, PostPatch, PostStatus, PostStore};

/// Outcomes a store can signal besides plain success.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write lost to an existing record.
    #[error("conditional write conflict")]
    Conflict,

    /// A guarded update targeted a record that no longer exists.
    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Item = HashMap<String, AttributeValue>;

// ---- attribute helpers ----

fn req_s(item: &Item, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::Other(anyhow!("missing string attribute {key}")))
}

fn opt_s(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn req_uuid(item: &Item, key: &str) -> Result<Uuid, StoreError> {
    let raw = req_s(item, key)?;
    Uuid::parse_str(&raw).map_err(|e| StoreError::Other(anyhow!("attribute {key}: {e}")))
}

fn req_n(item: &Item, key: &str) -> Result<i64, StoreError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .ok_or_else(|| StoreError::Other(anyhow!("missing numeric attribute {key}")))
}

fn req_time(item: &Item, key: &str) -> Result<OffsetDateTime, StoreError> {
    let raw = req_s(item, key)?;
    OffsetDateTime::parse(&raw, &Rfc3339)
        .map_err(|e| StoreError::Other(anyhow!("attribute {key}: {e}")))
}

fn fmt_time(ts: OffsetDateTime) -> Result<String, StoreError> {
    ts.format(&Rfc3339)
        .map_err(|e| StoreError::Other(anyhow!("timestamp format: {e}")))
}

// ---- accounts ----

pub struct DynamoAccounts {
    client: Client,
    table: String,
}

impl DynamoAccounts {
    pub fn new(sdk_config: &SdkConfig, table: &str) -> Self {
        Self {
            client: Client::new(sdk_config),
            table: table.to_string(),
        }
    }
}

fn user_to_item(user: &UserItem) -> Result<Item, StoreError> {
    let mut item = Item::new();
    item.insert(
        "userId".into(),
        AttributeValue::S(user.user_id.to_string()),
    );
    item.insert("email".into(), AttributeValue::S(user.email.clone()));
    item.insert(
        "passwordHash".into(),
        AttributeValue::S(user.password_hash.clone()),
    );
    if let Some(name) = &user.name {
        item.insert("name".into(), AttributeValue::S(name.clone()));
    }
    item.insert(
        "role".into(),
        AttributeValue::S(user.role.as_str().to_string()),
    );
    item.insert(
        "createdAt".into(),
        AttributeValue::S(fmt_time(user.created_at)?),
    );
    item.insert(
        "updatedAt".into(),
        AttributeValue::S(fmt_time(user.updated_at)?),
    );
    Ok(item)
}

fn user_from_item(item: &Item) -> Result<UserItem, StoreError> {
    let role = req_s(item, "role")?;
    Ok(UserItem {
        user_id: req_uuid(item, "userId")?,
        email: req_s(item, "email")?,
        password_hash: req_s(item, "passwordHash")?,
        name: opt_s(item, "name"),
        role: Role::parse(&role)
            .ok_or_else(|| StoreError::Other(anyhow!("unknown role {role}")))?,
        created_at: req_time(item, "createdAt")?,
        updated_at: req_time(item, "updatedAt")?,
    })
}

#[async_trait]
impl AccountStore for DynamoAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserItem>, StoreError> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .index_name("email-index")
            .key_condition_expression("email = :email")
            .expression_attribute_values(":email", AttributeValue::S(email.to_string()))
            .limit(1)
            .send()
            .await
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("query email-index")))?;

        match output.items().first() {
            Some(item) => Ok(Some(user_from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &UserItem) -> Result<(), StoreError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(user_to_item(user)?))
            .condition_expression("attribute_not_exists(userId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Err(StoreError::Conflict)
                } else {
                    Err(StoreError::Other(
                        anyhow::Error::new(service_err).context("put user"),
                    ))
                }
            }
        }
    }
}

// ---- posts ----

pub struct DynamoPosts {
    client: Client,
    table: String,
}

impl DynamoPosts {
    pub fn new(sdk_config: &SdkConfig, table: &str) -> Self {
        Self {
            client: Client::new(sdk_config),
            table: table.to_string(),
        }
    }
}

fn post_to_item(post: &PostItem) -> Result<Item, StoreError> {
    let mut item = Item::new();
    item.insert(
        "postId".into(),
        AttributeValue::S(post.post_id.to_string()),
    );
    item.insert(
        "authorId".into(),
        AttributeValue::S(post.author_id.to_string()),
    );
    item.insert("title".into(), AttributeValue::S(post.title.clone()));
    item.insert("content".into(), AttributeValue::S(post.content.clone()));
    item.insert(
        "status".into(),
        AttributeValue::S(post.status.as_str().to_string()),
    );
    item.insert(
        "createdAt".into(),
        AttributeValue::S(fmt_time(post.created_at)?),
    );
    item.insert(
        "updatedAt".into(),
        AttributeValue::S(fmt_time(post.updated_at)?),
    );
    Ok(item)
}

fn post_from_item(item: &Item) -> Result<PostItem, StoreError> {
    let status = req_s(item, "status")?;
    Ok(PostItem {
        post_id: req_uuid(item, "postId")?,
        author_id: req_uuid(item, "authorId")?,
        title: req_s(item, "title")?,
        content: req_s(item, "content")?,
        status: PostStatus::parse(&status)
            .ok_or_else(|| StoreError::Other(anyhow!("unknown status {status}")))?,
        created_at: req_time(item, "createdAt")?,
        updated_at: req_time(item, "updatedAt")?,
    })
}

#[async_trait]
impl PostStore for DynamoPosts {
    async fn get(&self, post_id: Uuid) -> Result<Option<PostItem>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("postId", AttributeValue::S(post_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("get post")))?;

        match output.item() {
            Some(item) => Ok(Some(post_from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, post: &PostItem) -> Result<(), StoreError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(post_to_item(post)?))
            .condition_expression("attribute_not_exists(postId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Err(StoreError::Conflict)
                } else {
                    Err(StoreError::Other(
                        anyhow::Error::new(service_err).context("put post"),
                    ))
                }
            }
        }
    }

    async fn update(&self, post_id: Uuid, patch: PostPatch) -> Result<PostItem, StoreError> {
        // SET only what was supplied, plus updatedAt, mirroring a partial
        // document update.
        let mut sets = Vec::new();
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table)
            .key("postId", AttributeValue::S(post_id.to_string()))
            .condition_expression("attribute_exists(postId)")
            .return_values(ReturnValue::AllNew);

        if let Some(title) = patch.title {
            sets.push("#title = :title");
            request = request
                .expression_attribute_names("#title", "title")
                .expression_attribute_values(":title", AttributeValue::S(title));
        }
        if let Some(content) = patch.content {
            sets.push("#content = :content");
            request = request
                .expression_attribute_names("#content", "content")
                .expression_attribute_values(":content", AttributeValue::S(content));
        }
        sets.push("#updatedAt = :updatedAt");
        request = request
            .expression_attribute_names("#updatedAt", "updatedAt")
            .expression_attribute_values(
                ":updatedAt",
                AttributeValue::S(fmt_time(patch.updated_at)?),
            );

        let result = request
            .update_expression(format!("SET {}", sets.join(", ")))
            .send()
            .await;

        match result {
            Ok(output) => {
                let attributes = output
                    .attributes()
                    .ok_or_else(|| StoreError::Other(anyhow!("update returned no attributes")))?;
                post_from_item(attributes)
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Err(StoreError::NotFound)
                } else {
                    Err(StoreError::Other(
                        anyhow::Error::new(service_err).context("update post"),
                    ))
                }
            }
        }
    }

    async fn delete(&self, post_id: Uuid) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("postId", AttributeValue::S(post_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("delete post")))?;
        Ok(())
    }

    async fn scan(
        &self,
        filter: Option<&str>,
        limit: Option<i32>,
    ) -> Result<Vec<PostItem>, StoreError> {
        let mut request = self.client.scan().table_name(&self.table);

        if let Some(limit) = limit {
            request = request.limit(limit);
        }
        if let Some(query) = filter {
            request = request
                .filter_expression("contains(#title, :q) OR contains(#content, :q)")
                .expression_attribute_names("#title", "title")
                .expression_attribute_names("#content", "content")
                .expression_attribute_values(":q", AttributeValue::S(query.to_string()));
        }

        let output = request
            .send()
            .await
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("scan posts")))?;

        output.items().iter().map(post_from_item).collect()
    }
}

// ---- media ----

pub struct DynamoMedia {
    client: Client,
    table: String,
}

impl DynamoMedia {
    pub fn new(sdk_config: &SdkConfig, table: &str) -> Self {
        Self {
            client: Client::new(sdk_config),
            table: table.to_string(),
        }
    }
}

fn media_to_item(media: &MediaItem) -> Result<Item, StoreError> {
    let mut item = Item::new();
    item.insert(
        "mediaId".into(),
        AttributeValue::S(media.media_id.to_string()),
    );
    item.insert(
        "ownerId".into(),
        AttributeValue::S(media.owner_id.to_string()),
    );
    if let Some(post_id) = media.post_id {
        item.insert("postId".into(), AttributeValue::S(post_id.to_string()));
    }
    item.insert(
        "type".into(),
        AttributeValue::S(media.media_type.as_str().to_string()),
    );
    item.insert(
        "mimeType".into(),
        AttributeValue::S(media.mime_type.clone()),
    );
    item.insert(
        "fileName".into(),
        AttributeValue::S(media.file_name.clone()),
    );
    item.insert(
        "fileSize".into(),
        AttributeValue::N(media.file_size.to_string()),
    );
    item.insert(
        "bucketKey".into(),
        AttributeValue::S(media.bucket_key.clone()),
    );
    item.insert(
        "createdAt".into(),
        AttributeValue::S(fmt_time(media.created_at)?),
    );
    Ok(item)
}

fn media_from_item(item: &Item) -> Result<MediaItem, StoreError> {
    let media_type = req_s(item, "type")?;
    let post_id = match opt_s(item, "postId") {
        Some(raw) => Some(
            Uuid::parse_str(&raw)
                .map_err(|e| StoreError::Other(anyhow!("attribute postId: {e}")))?,
        ),
        None => None,
    };
    Ok(MediaItem {
        media_id: req_uuid(item, "mediaId")?,
        owner_id: req_uuid(item, "ownerId")?,
        post_id,
        media_type: MediaType::parse(&media_type)
            .ok_or_else(|| StoreError::Other(anyhow!("unknown media type {media_type}")))?,
        mime_type: req_s(item, "mimeType")?,
        file_name: req_s(item, "fileName")?,
        file_size: req_n(item, "fileSize")?,
        bucket_key: req_s(item, "bucketKey")?,
        created_at: req_time(item, "createdAt")?,
    })
}

#[async_trait]
impl MediaStore for DynamoMedia {
    async fn get(&self, media_id: Uuid) -> Result<Option<MediaItem>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("mediaId", AttributeValue::S(media_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("get media")))?;

        match output.item() {
            Some(item) => Ok(Some(media_from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, media: &MediaItem) -> Result<(), StoreError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(media_to_item(media)?))
            .condition_expression("attribute_not_exists(mediaId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Err(StoreError::Conflict)
                } else {
                    Err(StoreError::Other(
                        anyhow::Error::new(service_err).context("put media"),
                    ))
                }
            }
        }
    }

    async fn delete(&self, media_id: Uuid) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("mediaId", AttributeValue::S(media_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("delete media")))?;
        Ok(())
    }

    async fn scan(&self, limit: Option<i32>) -> Result<Vec<MediaItem>, StoreError> {
        let mut request = self.client.scan().table_name(&self.table);
        if let Some(limit) = limit {
            request = request.limit(limit);
        }
        let output = request
            .send()
            .await
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("scan media")))?;

        output.items().iter().map(media_from_item).collect()
    }
}
