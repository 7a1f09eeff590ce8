use time::OffsetDateTime;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::claims::AuthenticatedUser;
use crate::db::StoreError;
use crate::error::ApiError;
use crate::posts::policy::can_modify_post;
use crate::posts::repo::{PostItem, PostPatch};
use crate::posts::validate::{validate_create_post_payload, validate_update_post_payload};
use crate::state::AppState;

const POST_NOT_FOUND: &str = "Post not found";

fn unexpected(op: &str) -> ApiError {
    ApiError::Unexpected(format!("An unexpected error occurred while {op}"))
}

pub async fn create(
    state: &AppState,
    user: &AuthenticatedUser,
    body: Option<&str>,
) -> Result<PostItem, ApiError> {
    let payload = validate_create_post_payload(body)?;

    let post = PostItem::new(user.user_id, payload.title, payload.content);
    state.posts.insert(&post).await.map_err(|e| {
        error!(error = %e, "insert post failed");
        unexpected("creating the post")
    })?;

    info!(post_id = %post.post_id, author_id = %post.author_id, "post created");
    Ok(post)
}

pub async fn fetch(state: &AppState, post_id: &str) -> Result<PostItem, ApiError> {
    let Some(post_id) = parse_id(post_id) else {
        return Err(ApiError::NotFound(POST_NOT_FOUND.into()));
    };
    state
        .posts
        .get(post_id)
        .await
        .map_err(|e| {
            error!(error = %e, "get post failed");
            unexpected("fetching the post")
        })?
        .ok_or_else(|| ApiError::NotFound(POST_NOT_FOUND.into()))
}

pub async fn list(
    state: &AppState,
    filter: Option<&str>,
    limit: Option<i32>,
) -> Result<Vec<PostItem>, ApiError> {
    state.posts.scan(filter, limit).await.map_err(|e| {
        error!(error = %e, "scan posts failed");
        unexpected("listing posts")
    })
}

pub async fn update(
    state: &AppState,
    user: &AuthenticatedUser,
    post_id: &str,
    body: Option<&str>,
) -> Result<PostItem, ApiError> {
    let payload = validate_update_post_payload(body)?;

    let post = fetch(state, post_id).await?;
    can_modify_post(user, &post)?;

    let patch = PostPatch {
        title: payload.title,
        content: payload.content,
        updated_at: OffsetDateTime::now_utc(),
    };
    match state.posts.update(post.post_id, patch).await {
        Ok(updated) => {
            info!(post_id = %updated.post_id, "post updated");
            Ok(updated)
        }
        // Deleted between the existence check and the guarded write.
        Err(StoreError::NotFound) => Err(ApiError::NotFound(POST_NOT_FOUND.into())),
        Err(e) => {
            error!(error = %e, "update post failed");
            Err(unexpected("updating the post"))
        }
    }
}

pub async fn remove(
    state: &AppState,
    user: &AuthenticatedUser,
    post_id: &str,
) -> Result<(), ApiError> {
    let post = fetch(state, post_id).await?;
    can_modify_post(user, &post)?;

    state.posts.delete(post.post_id).await.map_err(|e| {
        error!(error = %e, "delete post failed");
        unexpected("deleting the post")
    })?;

    info!(post_id = %post.post_id, "post deleted");
    Ok(())
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Role;
    use crate::posts::repo::PostStatus;
    use crate::state::AppState;

    fn author() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "author@example.com".into(),
            role: Role::Author,
        }
    }

    const CREATE: &str = r#"{"title":"Hello World","content":"This is long enough content."}"#;

    #[tokio::test]
    async fn full_post_lifecycle() {
        let state = AppState::fake();
        let alice = author();
        let bob = author();

        // Create as A: 201 semantics, generated id, PUBLISHED.
        let created = create(&state, &alice, Some(CREATE)).await.unwrap();
        assert_eq!(created.title, "Hello World");
        assert_eq!(created.content, "This is long enough content.");
        assert_eq!(created.status, PostStatus::Published);
        assert_eq!(created.author_id, alice.user_id);

        // Fetch by id: identical fields.
        let fetched = fetch(&state, &created.post_id.to_string()).await.unwrap();
        assert_eq!(fetched.post_id, created.post_id);
        assert_eq!(fetched.title, created.title);
        assert_eq!(fetched.content, created.content);

        // Update as B: forbidden.
        let err = update(
            &state,
            &bob,
            &created.post_id.to_string(),
            Some(r#"{"title":"Hijacked"}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Authorization(_)));

        // Update as A: succeeds, patches only what was supplied.
        let updated = update(
            &state,
            &alice,
            &created.post_id.to_string(),
            Some(r#"{"title":"Hello Again"}"#),
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Hello Again");
        assert_eq!(updated.content, created.content);
        assert!(updated.updated_at >= created.updated_at);

        // Delete as A, then the post is gone.
        remove(&state, &alice, &created.post_id.to_string())
            .await
            .unwrap();
        let err = fetch(&state, &created.post_id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == POST_NOT_FOUND));
    }

    #[tokio::test]
    async fn editor_may_update_any_post() {
        let state = AppState::fake();
        let created = create(&state, &author(), Some(CREATE)).await.unwrap();

        let editor = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "editor@example.com".into(),
            role: Role::Editor,
        };
        let updated = update(
            &state,
            &editor,
            &created.post_id.to_string(),
            Some(r#"{"content":"Edited by the editor."}"#),
        )
        .await
        .unwrap();
        assert_eq!(updated.content, "Edited by the editor.");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let state = AppState::fake();
        let err = fetch(&state, &Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        let err = fetch(&state, "not-a-uuid").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_without_fields_is_rejected_before_lookup() {
        let state = AppState::fake();
        let err = update(&state, &author(), "not-even-an-id", Some("{}"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(msg) if msg == "At least one of title or content must be updated"
        ));
    }

    #[tokio::test]
    async fn list_filters_on_title_and_content() {
        let state = AppState::fake();
        let alice = author();
        create(
            &state,
            &alice,
            Some(r#"{"title":"Rust tips","content":"Borrow checker wisdom here."}"#),
        )
        .await
        .unwrap();
        create(
            &state,
            &alice,
            Some(r#"{"title":"Gardening","content":"Content mentioning Rust once."}"#),
        )
        .await
        .unwrap();
        create(
            &state,
            &alice,
            Some(r#"{"title":"Cooking","content":"Nothing to see over here."}"#),
        )
        .await
        .unwrap();

        let hits = list(&state, Some("Rust"), None).await.unwrap();
        assert_eq!(hits.len(), 2);

        let all = list(&state, None, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let capped = list(&state, None, Some(2)).await.unwrap();
        assert_eq!(capped.len(), 2);
    }
}
