use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// Caller of an administrative endpoint: a bearer token signed with the
/// configured secret whose role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub subject: String,
}

pub fn decode_admin(token: &str, secret: &str) -> Result<AdminUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    if decoded.claims.role != ADMIN_ROLE {
        return Err(AppError::Forbidden);
    }

    Ok(AdminUser {
        subject: decoded.claims.sub,
    })
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_str = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        let secret = state
            .config
            .jwt_secret
            .as_deref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let admin = decode_admin(token, secret)?;
        tracing::debug!(subject = %admin.subject, "admin request");
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn token(role: &str, secret: &str) -> String {
        let claims = Claims {
            sub: "ops@example.com".into(),
            role: role.into(),
            exp: 4_102_444_800,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn admin_token_is_accepted() {
        let admin = decode_admin(&token("admin", "s3cret"), "s3cret").unwrap();
        assert_eq!(admin.subject, "ops@example.com");
    }

    #[test]
    fn other_roles_are_forbidden() {
        assert!(matches!(
            decode_admin(&token("guest", "s3cret"), "s3cret"),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn wrong_signature_is_unauthorized() {
        assert!(matches!(
            decode_admin(&token("admin", "other"), "s3cret"),
            Err(AppError::Unauthorized)
        ));
    }
}
