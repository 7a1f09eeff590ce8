use crate::auth::claims::Role;

/// The single mutation-permission rule: elevated roles bypass ownership,
/// authors act only on what they own.
pub fn is_permitted(role: Role, owner_match: bool) -> bool {
    match role {
        Role::Admin | Role::Editor => true,
        Role::Author => owner_match,
    }
}

pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevated_roles_bypass_ownership() {
        assert!(is_permitted(Role::Admin, false));
        assert!(is_permitted(Role::Admin, true));
        assert!(is_permitted(Role::Editor, false));
        assert!(is_permitted(Role::Editor, true));
    }

    #[test]
    fn authors_need_ownership() {
        assert!(is_permitted(Role::Author, true));
        assert!(!is_permitted(Role::Author, false));
    }
}
