//! Order API module

mod handler;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::{require_admin, require_auth, require_user};
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes(state))
}

fn order_routes(state: ServerState) -> Router<ServerState> {
    // Each route declares exactly one required role; the comparison is exact,
    // so the admin status route is invisible to users and vice versa
    let user_routes = Router::new()
        .route("/", post(handler::place).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", put(handler::cancel))
        .route_layer(middleware::from_fn(require_user));

    let admin_routes = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .route_layer(middleware::from_fn(require_admin));

    user_routes
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
