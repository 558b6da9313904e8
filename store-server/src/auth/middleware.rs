//! Authentication Middleware
//!
//! Axum middleware for token authentication and role-based gates.
//!
//! `require_auth` turns a bearer credential into a [`CurrentUser`] request
//! extension or terminates the request. The role gates compare exactly: an
//! admin does not pass a user-only gate, and a user does not pass an
//! admin-only gate. Each route declares at most one required role.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserRole};
use uuid::Uuid;

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::db::UserRepository;

/// Authenticated principal attached to the request by `require_auth`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Require authentication middleware
///
/// Extracts the bearer credential from the Authorization header, verifies it,
/// and resolves the token subject to a stored user. On success the principal
/// is attached to the request extensions for downstream handlers.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight carries no credentials
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Malformed authorization header"))?,
        None => {
            tracing::warn!(target: "security", event = "auth_missing", uri = %req.uri());
            return Err(AppError::not_authenticated());
        }
    };

    let claims = state.jwt.verify(token).map_err(|e| {
        tracing::warn!(target: "security", event = "auth_failed", error = %e, uri = %req.uri());
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AppError::invalid_token("Invalid token subject"))?;

    // A valid token can outlive its account
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let current = CurrentUser::from(&user);
    tracing::debug!(user_id = %current.id, role = %current.role, "user authenticated");

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Require the `user` role (exact match)
pub async fn require_user(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(req, next, UserRole::User).await
}

/// Require the `admin` role (exact match)
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(req, next, UserRole::Admin).await
}

async fn require_role(
    req: Request,
    next: Next,
    required: UserRole,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;

    if user.role != required {
        tracing::warn!(
            target: "security",
            event = "role_denied",
            user_id = %user.id,
            user_role = %user.role,
            required_role = %required,
        );
        return Err(AppError::permission_denied(format!(
            "{} role required",
            required
        )));
    }

    Ok(next.run(req).await)
}
