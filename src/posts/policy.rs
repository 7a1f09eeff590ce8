use crate::auth::claims::AuthenticatedUser;
use crate::auth::policy::is_permitted;
use crate::error::ApiError;
use crate::posts::repo::PostItem;

/// Post mutation permission: the author of the post, or an elevated role.
pub fn can_modify_post(user: &AuthenticatedUser, post: &PostItem) -> Result<(), ApiError> {
    if is_permitted(user.role, post.author_id == user.user_id) {
        Ok(())
    } else {
        Err(ApiError::Authorization(
            "You do not have permission to modify this post".into(),
        ))
    }
}
