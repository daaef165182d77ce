//! Authentication: HS256 session tokens, bcrypt password hashing and the
//! `AuthUser` extractor that guards every non-public route.

pub mod handlers;
pub mod password;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// Tokens are valid for seven days.
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

/// The authenticated caller, loaded from the bearer token's subject.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

        let claims = state
            .tokens
            .verify(token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, role, avatar, created_at FROM users WHERE id = $1",
        )
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(AuthUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates the demo admin account on first start so the login page works out of the box.
pub async fn ensure_demo_user(pool: &PgPool, email: &str, password: &str) -> Result<(), AppError> {
    let email = normalize_email(email);
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(pool)
        .await?;
    if exists {
        return Ok(());
    }

    let password_hash = password::hash_password(password.to_string()).await?;
    sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, role)
        VALUES ($1, $2, 'Admin', 'User', 'admin')
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(&email)
    .bind(password_hash)
    .execute(pool)
    .await?;

    info!("Created demo admin user {email}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let service = TokenService::new(b"secret");
        let user_id = Uuid::new_v4();
        let token = service.issue(user_id).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenService::new(b"secret").issue(Uuid::new_v4()).unwrap();
        assert!(TokenService::new(b"other").verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new(b"secret");
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(&Header::default(), &claims, &service.encoding_key).unwrap();
        assert!(matches!(service.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let (mut parts, _) = axum::http::Request::builder()
            .header(AUTHORIZATION, "Bearer abc.def")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc.def"));

        parts
            .headers
            .insert(AUTHORIZATION, "Basic xyz".parse().unwrap());
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_normalize_email_matches_login_lookup() {
        assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
        assert_eq!(normalize_email("demo@example.com"), "demo@example.com");
    }
}
