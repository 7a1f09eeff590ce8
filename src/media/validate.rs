use crate::error::ApiError;
use crate::media::dto::MediaBody;
use crate::media::repo::MediaType;

/// Normalized media-create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedia {
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub media_type: MediaType,
    /// Raw reference to a post; resolved and authorized by the service.
    pub post_id: Option<String>,
}

fn invalid(message: &str) -> ApiError {
    ApiError::Validation(message.into())
}

/// Rules, in order: body present, parseable, fileName present after trim,
/// mimeType present after trim, fileSize present and positive. `type`
/// defaults to IMAGE; `postId` is trimmed and kept only if non-empty.
pub fn validate_create_media_payload(body: Option<&str>) -> Result<NewMedia, ApiError> {
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Err(invalid("Request body is required"));
    };

    let parsed: MediaBody =
        serde_json::from_str(body).map_err(|_| invalid("Invalid JSON body"))?;

    let file_name = parsed
        .file_name
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    let Some(file_name) = file_name else {
        return Err(invalid("fileName is required"));
    };

    let mime_type = parsed
        .mime_type
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    let Some(mime_type) = mime_type else {
        return Err(invalid("mimeType is required"));
    };

    let Some(file_size) = parsed.file_size.filter(|s| *s > 0) else {
        return Err(invalid("fileSize must be a positive number"));
    };

    let media_type = parsed.media_type.unwrap_or(MediaType::Image);
    let post_id = parsed
        .post_id
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned);

    Ok(NewMedia {
        file_name: file_name.to_owned(),
        mime_type: mime_type.to_owned(),
        file_size,
        media_type,
        post_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn requires_body_and_structure() {
        assert_eq!(
            message(validate_create_media_payload(None).unwrap_err()),
            "Request body is required"
        );
        assert_eq!(
            message(validate_create_media_payload(Some("{{")).unwrap_err()),
            "Invalid JSON body"
        );
    }

    #[test]
    fn field_rules_in_order() {
        assert_eq!(
            message(validate_create_media_payload(Some("{}")).unwrap_err()),
            "fileName is required"
        );
        assert_eq!(
            message(
                validate_create_media_payload(Some(r#"{"fileName":"a.png"}"#)).unwrap_err()
            ),
            "mimeType is required"
        );
        assert_eq!(
            message(
                validate_create_media_payload(Some(
                    r#"{"fileName":"a.png","mimeType":"image/png"}"#
                ))
                .unwrap_err()
            ),
            "fileSize must be a positive number"
        );
        assert_eq!(
            message(
                validate_create_media_payload(Some(
                    r#"{"fileName":"a.png","mimeType":"image/png","fileSize":0}"#
                ))
                .unwrap_err()
            ),
            "fileSize must be a positive number"
        );
        assert_eq!(
            message(
                validate_create_media_payload(Some(
                    r#"{"fileName":"a.png","mimeType":"image/png","fileSize":-5}"#
                ))
                .unwrap_err()
            ),
            "fileSize must be a positive number"
        );
    }

    #[test]
    fn type_defaults_to_image_and_post_id_is_optional() {
        let value = validate_create_media_payload(Some(
            r#"{"fileName":" a.png ","mimeType":" image/png ","fileSize":1024}"#,
        ))
        .unwrap();
        assert_eq!(value.file_name, "a.png");
        assert_eq!(value.mime_type, "image/png");
        assert_eq!(value.file_size, 1024);
        assert_eq!(value.media_type, MediaType::Image);
        assert_eq!(value.post_id, None);
    }

    #[test]
    fn explicit_type_and_post_id_are_kept() {
        let value = validate_create_media_payload(Some(
            r#"{"fileName":"c.mp4","mimeType":"video/mp4","fileSize":9,"type":"VIDEO","postId":" abc "}"#,
        ))
        .unwrap();
        assert_eq!(value.media_type, MediaType::Video);
        assert_eq!(value.post_id.as_deref(), Some("abc"));
    }

    #[test]
    fn blank_post_id_counts_as_absent() {
        let value = validate_create_media_payload(Some(
            r#"{"fileName":"a.png","mimeType":"image/png","fileSize":1,"postId":"  "}"#,
        ))
        .unwrap();
        assert_eq!(value.post_id, None);
    }
}
