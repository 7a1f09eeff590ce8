use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role carried in the token and on the account record.
///
/// New accounts are always created as `Author`; there is no self-elevation
/// path through the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Editor,
    Author,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
            Role::Author => "AUTHOR",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "EDITOR" => Some(Role::Editor),
            "AUTHOR" => Some(Role::Author),
            _ => None,
        }
    }
}

/// JWT payload. The identity claims are `Option` so that a structurally
/// valid token with a claim missing is detected and rejected rather than
/// defaulted or crashed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<Uuid>,      // user ID
    pub email: Option<String>,  // account email
    pub role: Option<Role>,     // ADMIN | EDITOR | AUTHOR
    pub iat: usize,             // issued at (unix timestamp)
    pub exp: usize,             // expires at (unix timestamp)
}

/// Identity derived 1:1 from verified claims. Lives only for the duration of
/// one request; never persisted.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"EDITOR\"");
        assert_eq!(serde_json::to_string(&Role::Author).unwrap(), "\"AUTHOR\"");
    }

    #[test]
    fn role_parse_round_trips() {
        for role in [Role::Admin, Role::Editor, Role::Author] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("WIZARD"), None);
        assert_eq!(Role::parse("admin"), None);
    }
}
