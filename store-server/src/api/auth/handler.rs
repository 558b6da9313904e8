//! Authentication Handlers
//!
//! Registration and login. Login failures use a single unified error so the
//! response does not reveal whether the email exists.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuthenticatedUser, Credentials, User, UserCreate, UserRole};
use uuid::Uuid;

use crate::auth::password;
use crate::core::ServerState;
use crate::db::{RepoError, UserRepository};

/// Register a new user account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let email = req.email.to_lowercase();

    let existing = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if existing.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists));
    }

    let password_hash = password::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email,
        password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
        role: req.role.unwrap_or(UserRole::User),
        created_at: now,
        updated_at: now,
    };

    let created = state.users.create(user).await.map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailExists),
        other => AppError::database(other.to_string()),
    })?;

    tracing::info!(user_id = %created.id, role = %created.role, "user registered");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Login with email and password, returning a fresh access token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<Credentials>,
) -> Result<Json<AuthenticatedUser>, AppError> {
    let email = req.email.to_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let user = match user {
        Some(user) => user,
        None => {
            tracing::warn!(email = %email, "login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = password::verify_password(&user.password_hash, &req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        tracing::warn!(user_id = %user.id, "login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let access_token = state
        .jwt
        .issue(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthenticatedUser { user, access_token }))
}
