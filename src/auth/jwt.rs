use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::claims::{AuthenticatedUser, Claims, Role};
use crate::config::AppConfig;
use crate::error::ApiError;

/// Every issued token expires after one hour.
pub const TOKEN_TTL: Duration = Duration::hours(1);

/// Signs and verifies bearer tokens with the process-wide secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Build a codec from configuration. An absent secret is the server's
    /// fault, not the caller's.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        match config.jwt_secret.as_deref() {
            Some(secret) => Ok(Self::new(secret)),
            None => {
                warn!("JWT secret is not configured");
                Err(ApiError::Configuration)
            }
        }
    }

    pub fn sign(&self, user_id: Uuid, email: &str, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TOKEN_TTL;
        let claims = Claims {
            sub: Some(user_id),
            email: Some(email.to_owned()),
            role: Some(role),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(%user_id, "token issued");
        Ok(token)
    }

    /// Verify signature and expiry, then require the full claim set.
    ///
    /// Every cryptographic failure collapses into one generic message so the
    /// response does not reveal whether the token was forged, malformed or
    /// merely expired; the concrete cause goes to the log.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(
            |err| {
                warn!(error = %err, "token verification failed");
                ApiError::Authentication("Invalid or expired token".into())
            },
        )?;

        let claims = data.claims;
        match (claims.sub, claims.email, claims.role) {
            (Some(user_id), Some(email), Some(role)) => Ok(AuthenticatedUser {
                user_id,
                email,
                role,
            }),
            _ => Err(ApiError::Authentication(
                "Token is missing required claims".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn codec() -> TokenCodec {
        TokenCodec::new("unit-test-secret")
    }

    #[test]
    fn sign_and_verify_round_trips_identity() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let token = codec.sign(user_id, "a@b.co", Role::Author).expect("sign");
        let user = codec.verify(&token).expect("verify");
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "a@b.co");
        assert_eq!(user.role, Role::Author);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = codec().sign(Uuid::new_v4(), "a@b.co", Role::Admin).unwrap();
        let err = TokenCodec::new("other-secret").verify(&token).unwrap_err();
        assert!(
            matches!(err, ApiError::Authentication(msg) if msg == "Invalid or expired token")
        );
    }

    #[test]
    fn verify_rejects_garbage_token_with_generic_message() {
        let err = codec().verify("not.a.token").unwrap_err();
        assert!(
            matches!(err, ApiError::Authentication(msg) if msg == "Invalid or expired token")
        );
    }

    #[test]
    fn expired_token_collapses_to_generic_message() {
        // Two hours in the past clears the default 60s validation leeway.
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Some(Uuid::new_v4()),
            email: Some("a@b.co".into()),
            role: Some(Role::Author),
            iat: (now - Duration::hours(3)).unix_timestamp() as usize,
            exp: (now - Duration::hours(2)).unix_timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        let err = codec().verify(&token).unwrap_err();
        assert!(
            matches!(err, ApiError::Authentication(msg) if msg == "Invalid or expired token")
        );
    }

    #[test]
    fn token_missing_role_claim_is_rejected_as_incomplete() {
        #[derive(Serialize)]
        struct PartialClaims {
            sub: Uuid,
            email: String,
            iat: usize,
            exp: usize,
        }
        let now = OffsetDateTime::now_utc();
        let claims = PartialClaims {
            sub: Uuid::new_v4(),
            email: "a@b.co".into(),
            iat: now.unix_timestamp() as usize,
            exp: (now + Duration::hours(1)).unix_timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        let err = codec().verify(&token).unwrap_err();
        assert!(
            matches!(err, ApiError::Authentication(msg) if msg == "Token is missing required claims")
        );
    }

    #[test]
    fn from_config_without_secret_is_a_configuration_error() {
        let config = AppConfig {
            jwt_secret: None,
            users_table: "users".into(),
            posts_table: "posts".into(),
            media_table: "media".into(),
            media_bucket: "media-bucket".into(),
            presign_ttl_secs: 900,
        };
        let err = TokenCodec::from_config(&config).err().unwrap();
        assert!(matches!(err, ApiError::Configuration));
    }
}
