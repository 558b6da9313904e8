//! Principal Extractor
//!
//! Lets protected handlers take the authenticated [`CurrentUser`] as an
//! argument. The principal is resolved by the `require_auth` middleware;
//! reaching a handler without it means the route was wired without the
//! middleware and the request is rejected.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::CurrentUser;
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}
