use tracing::{error, info, warn};

use crate::auth::dto::{AuthResponse, PublicUser, RegisteredUser};
use crate::auth::jwt::TokenCodec;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::UserItem;
use crate::auth::validate::{validate_login_payload, validate_register_payload};
use crate::db::StoreError;
use crate::error::ApiError;
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "A user with this email already exists";

/// One message for unknown email and wrong password alike, so responses
/// cannot be used to probe which addresses have accounts.
const BAD_CREDENTIALS: &str = "Invalid email or password";

pub async fn register(state: &AppState, body: Option<&str>) -> Result<RegisteredUser, ApiError> {
    let payload = validate_register_payload(body)?;

    let existing = state
        .accounts
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!(error = %e, "account lookup failed");
            ApiError::Unexpected("An unexpected error occurred while registering the user".into())
        })?;
    if existing.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict(DUPLICATE_EMAIL.into()));
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Unexpected("An unexpected error occurred while registering the user".into())
    })?;

    let user = UserItem::new(payload.email, password_hash, payload.name);

    match state.accounts.insert(&user).await {
        Ok(()) => {}
        // The storage guard lost a race with a concurrent registration.
        Err(StoreError::Conflict) => return Err(ApiError::Conflict(DUPLICATE_EMAIL.into())),
        Err(e) => {
            error!(error = %e, "insert user failed");
            return Err(ApiError::Unexpected(
                "An unexpected error occurred while registering the user".into(),
            ));
        }
    }

    info!(user_id = %user.user_id, email = %user.email, "user registered");
    Ok(RegisteredUser {
        user_id: user.user_id,
        email: user.email,
        name: user.name,
        role: user.role,
        created_at: user.created_at,
    })
}

pub async fn login(state: &AppState, body: Option<&str>) -> Result<AuthResponse, ApiError> {
    let payload = validate_login_payload(body)?;

    let user = state
        .accounts
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!(error = %e, "account lookup failed");
            ApiError::Unexpected("An unexpected error occurred while logging in".into())
        })?;
    let Some(user) = user else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::Authentication(BAD_CREDENTIALS.into()));
    };

    let matches = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Unexpected("An unexpected error occurred while logging in".into())
    })?;
    if !matches {
        warn!(user_id = %user.user_id, "login invalid password");
        return Err(ApiError::Authentication(BAD_CREDENTIALS.into()));
    }

    let codec = TokenCodec::from_config(&state.config)?;
    let token = codec
        .sign(user.user_id, &user.email, user.role)
        .map_err(|e| {
            error!(error = %e, "token signing failed");
            ApiError::Unexpected("An unexpected error occurred while logging in".into())
        })?;

    info!(user_id = %user.user_id, "user logged in");
    Ok(AuthResponse {
        token,
        user: PublicUser {
            user_id: user.user_id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Role;
    use crate::state::AppState;
    use std::sync::Arc;

    const REGISTER: &str = r#"{"email":"ada@example.com","password":"longenough","name":"Ada"}"#;

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let state = AppState::fake();
        let created = register(&state, Some(REGISTER)).await.unwrap();
        assert_eq!(created.email, "ada@example.com");
        assert_eq!(created.role, Role::Author);
        assert_eq!(created.name.as_deref(), Some("Ada"));

        let auth = login(
            &state,
            Some(r#"{"email":"ADA@example.com","password":"longenough"}"#),
        )
        .await
        .unwrap();
        assert_eq!(auth.user.user_id, created.user_id);
        assert!(!auth.token.is_empty());

        // The issued token authenticates.
        let codec = TokenCodec::from_config(&state.config).unwrap();
        let identity = codec.verify(&auth.token).unwrap();
        assert_eq!(identity.user_id, created.user_id);
        assert_eq!(identity.role, Role::Author);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let state = AppState::fake();
        register(&state, Some(REGISTER)).await.unwrap();
        let err = register(&state, Some(REGISTER)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(msg) if msg == DUPLICATE_EMAIL));
    }

    #[tokio::test]
    async fn racing_registrations_produce_exactly_one_success() {
        let state = AppState::fake();
        let a = tokio::spawn({
            let state = state.clone();
            async move { register(&state, Some(REGISTER)).await }
        });
        let b = tokio::spawn({
            let state = state.clone();
            async move { register(&state, Some(REGISTER)).await }
        });
        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let conflict = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(conflict, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let state = AppState::fake();
        register(&state, Some(REGISTER)).await.unwrap();

        let unknown = login(
            &state,
            Some(r#"{"email":"nobody@example.com","password":"whatever"}"#),
        )
        .await
        .unwrap_err();
        let wrong = login(
            &state,
            Some(r#"{"email":"ada@example.com","password":"not-the-one"}"#),
        )
        .await
        .unwrap_err();

        let unknown_msg = match unknown {
            ApiError::Authentication(msg) => msg,
            other => panic!("expected authentication error, got {other:?}"),
        };
        let wrong_msg = match wrong {
            ApiError::Authentication(msg) => msg,
            other => panic!("expected authentication error, got {other:?}"),
        };
        assert_eq!(unknown_msg, wrong_msg);
        assert_eq!(unknown_msg, BAD_CREDENTIALS);
    }

    #[tokio::test]
    async fn invalid_email_fails_before_any_storage_side_effect() {
        let state = AppState::fake();
        let err = register(
            &state,
            Some(r#"{"email":"not-an-email","password":"longenough"}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        // Nothing was persisted.
        assert!(state
            .accounts
            .find_by_email("not-an-email")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn login_without_signing_secret_is_a_configuration_error() {
        let state = AppState::fake();
        register(&state, Some(REGISTER)).await.unwrap();

        let mut config = (*state.config).clone();
        config.jwt_secret = None;
        let state = AppState::from_parts(
            Arc::new(config),
            state.accounts.clone(),
            state.posts.clone(),
            state.media.clone(),
            state.blobs.clone(),
        );

        let err = login(
            &state,
            Some(r#"{"email":"ada@example.com","password":"longenough"}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Configuration));
    }
}
