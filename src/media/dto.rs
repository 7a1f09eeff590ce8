use serde::{Deserialize, Serialize};

use crate::media::repo::{MediaItem, MediaType};

/// Raw media-create body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaBody {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub post_id: Option<String>,
}

/// Created media record plus the URL the client uploads the bytes to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMedia {
    #[serde(flatten)]
    pub media: MediaItem,
    pub upload_url: String,
}

/// Listing query string; like posts, a malformed limit is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct MediaListQuery {
    pub limit: Option<String>,
}

impl MediaListQuery {
    pub fn cap(&self) -> Option<i32> {
        self.limit
            .as_deref()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|n| *n > 0)
    }
}

#[derive(Debug, Serialize)]
pub struct MediaList {
    pub items: Vec<MediaItem>,
    pub count: usize,
}
