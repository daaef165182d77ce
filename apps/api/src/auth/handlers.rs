use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{normalize_email, AuthUser};
use crate::errors::{ensure_one_of, require_non_empty, AppError};
use crate::extract::{Json};
use crate::models::user::{User, UserRecord, USER_ROLES};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = normalize_email(&req.email);
    if !email.contains('@') {
        return Err(AppError::Validation("email must be a valid address".to_string()));
    }
    require_non_empty("password", &req.password)?;
    require_non_empty("firstName", &req.first_name)?;
    require_non_empty("lastName", &req.last_name)?;
    let role = req.role.unwrap_or_else(|| "recruiter".to_string());
    ensure_one_of("role", &role, USER_ROLES)?;

    let existing: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(&email)
            .fetch_one(&state.db)
            .await?;
    if existing {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let password_hash = hash_password(req.password).await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, first_name, last_name, role, avatar, created_at
        "#,
    )
    .bind(&email)
    .bind(password_hash)
    .bind(req.first_name.trim())
    .bind(req.last_name.trim())
    .bind(&role)
    .fetch_one(&state.db)
    .await?;

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!("Registered user {} ({})", user.id, user.role);
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = $1")
        .bind(normalize_email(&req.email))
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(req.password, record.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = state
        .tokens
        .issue(record.id)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(AuthResponse {
        user: record.into(),
        token,
    }))
}

/// GET /api/auth/me
pub async fn handle_me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}

/// GET /api/auth/demo-credentials
pub async fn handle_demo_credentials(State(state): State<AppState>) -> Json<DemoCredentials> {
    Json(DemoCredentials {
        email: state.config.demo_email.clone(),
        password: state.config.demo_password.clone(),
    })
}
