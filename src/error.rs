use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level failure taxonomy. Every service operation resolves to one of
/// these; the transport status code is derived from the variant alone.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required process setting is absent. The response never names it.
    #[error("Server configuration error")]
    Configuration,

    /// Malformed or insufficient request payload.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired credential.
    #[error("{0}")]
    Authentication(String),

    /// Authenticated but not permitted.
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (duplicate email or id).
    #[error("{0}")]
    Conflict(String),

    /// Unhandled storage/crypto failure. Carries only the public message;
    /// the underlying error is logged where it was caught.
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_taxonomy() {
        let cases = [
            (ApiError::Configuration, StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Authentication("nope".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Authorization("denied".into()),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                ApiError::Unexpected("oops".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status(), expected);
        }
    }

    #[test]
    fn configuration_error_never_names_the_setting() {
        assert_eq!(ApiError::Configuration.to_string(), "Server configuration error");
    }

    #[test]
    fn response_body_wraps_message() {
        let response = ApiError::Validation("Email is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
