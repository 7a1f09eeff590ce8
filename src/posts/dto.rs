use serde::{Deserialize, Serialize};

use crate::posts::repo::PostItem;

/// Raw create/update body; the validators decide what counts as supplied.
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Listing query string. `limit` stays raw text so a malformed value is
/// ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn cap(&self) -> Option<i32> {
        self.limit
            .as_deref()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|n| *n > 0)
    }
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub items: Vec<PostItem>,
    pub count: usize,
}
