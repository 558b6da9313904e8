//! API Route Modules
//!
//! # Structure
//!
//! - [`auth`] - registration and login (public)
//! - [`products`] - product catalog (reads authenticated, mutations admin)
//! - [`orders`] - order lifecycle (user routes plus the admin status route)

pub mod auth;
pub mod orders;
pub mod products;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(products::router(state.clone()))
        .merge(orders::router(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
