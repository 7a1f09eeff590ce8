use crate::error::ApiError;
use crate::posts::dto::PostBody;

/// Normalized create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Normalized update payload. An absent field means "do not change",
/// distinct from an empty string (which fails the length rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

fn invalid(message: &str) -> ApiError {
    ApiError::Validation(message.into())
}

/// Rules, in order: body present, parseable, title present after trim, title
/// at least 3 characters, content present after trim, content at least 10.
pub fn validate_create_post_payload(body: Option<&str>) -> Result<NewPost, ApiError> {
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Err(invalid("Request body is required"));
    };

    let parsed: PostBody =
        serde_json::from_str(body).map_err(|_| invalid("Invalid JSON body"))?;

    let title = parsed
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let Some(title) = title else {
        return Err(invalid("Title is required"));
    };
    if title.chars().count() < 3 {
        return Err(invalid("Title must be at least 3 characters long"));
    }

    let content = parsed
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let Some(content) = content else {
        return Err(invalid("Content is required"));
    };
    if content.chars().count() < 10 {
        return Err(invalid("Content must be at least 10 characters long"));
    }

    Ok(NewPost {
        title: title.to_owned(),
        content: content.to_owned(),
    })
}

/// Rules, in order: body present, parseable, at least one field supplied,
/// then per-field length checks on whatever was supplied.
pub fn validate_update_post_payload(body: Option<&str>) -> Result<PostUpdate, ApiError> {
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Err(invalid("Request body is required"));
    };

    let parsed: PostBody =
        serde_json::from_str(body).map_err(|_| invalid("Invalid JSON body"))?;

    let title = parsed.title.as_deref().map(str::trim);
    let content = parsed.content.as_deref().map(str::trim);

    if title.is_none() && content.is_none() {
        return Err(invalid("At least one of title or content must be updated"));
    }

    if let Some(title) = title {
        if title.chars().count() < 3 {
            return Err(invalid("Title must be at least 3 characters long"));
        }
    }

    if let Some(content) = content {
        if content.chars().count() < 10 {
            return Err(invalid("Content must be at least 10 characters long"));
        }
    }

    Ok(PostUpdate {
        title: title.map(str::to_owned),
        content: content.map(str::to_owned),
    })
}
