use crate::auth::dto::{LoginBody, RegisterBody};
use crate::error::ApiError;

/// Normalized registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Normalized login payload. Password is checked for presence only; length
/// rules apply at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub email: String,
    pub password: String,
}

fn invalid(message: &str) -> ApiError {
    ApiError::Validation(message.into())
}

/// Rules, in order: body present, parseable, email present, email contains
/// `@` and `.`, password present, password at least 8 characters. First
/// failure wins. Email is lower-cased for storage and lookup.
pub fn validate_register_payload(body: Option<&str>) -> Result<Registration, ApiError> {
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Err(invalid("Request body is required"));
    };

    let parsed: RegisterBody =
        serde_json::from_str(body).map_err(|_| invalid("Invalid JSON body"))?;

    let email = parsed
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let Some(email) = email else {
        return Err(invalid("Email is required"));
    };

    if !email.contains('@') || !email.contains('.') {
        return Err(invalid("Email format is invalid"));
    }

    let password = parsed.password.filter(|p| !p.is_empty());
    let Some(password) = password else {
        return Err(invalid("Password is required"));
    };

    if password.chars().count() < 8 {
        return Err(invalid("Password must be at least 8 characters long"));
    }

    let name = parsed.name.map(|n| n.trim().to_owned());

    Ok(Registration {
        email,
        password,
        name,
    })
}

/// Rules, in order: body present, parseable, email present, password
/// present. No format or length checks at login.
pub fn validate_login_payload(body: Option<&str>) -> Result<Login, ApiError> {
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Err(invalid("Request body is required"));
    };

    let parsed: LoginBody =
        serde_json::from_str(body).map_err(|_| invalid("Invalid JSON body"))?;

    let email = parsed
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let Some(email) = email else {
        return Err(invalid("Email is required"));
    };

    let password = parsed.password.filter(|p| !p.is_empty());
    let Some(password) = password else {
        return Err(invalid("Password is required"));
    };

    Ok(Login { email, password })
}
