//! Product API module

mod handler;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::{require_admin, require_auth};
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes(state))
}

fn product_routes(state: ServerState) -> Router<ServerState> {
    // Reads need authentication only; mutations are admin-gated
    let reads = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let mutations = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin));

    reads
        .merge(mutations)
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
