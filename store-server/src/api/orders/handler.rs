//! Order API Handlers
//!
//! Thin wrappers over the [`OrderManager`](crate::orders::OrderManager);
//! the manager owns every lifecycle rule.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::error::{ApiResponse, AppError};
use shared::models::{Order, OrderCreate, OrderStatusUpdate, OrdersPage, PageQuery};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// Place a new order (user)
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<OrderCreate>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.orders.place(&user, &req.data, req.currency).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List the requesting user's orders (user)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<OrdersPage>, AppError> {
    let (orders, paging_info) = state.orders.list_for_user(&user, &query).await?;
    Ok(Json(OrdersPage {
        orders,
        paging_info,
    }))
}

/// Get a single order (user)
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state.orders.get(id).await?;
    Ok(Json(order))
}

/// Cancel a pending order owned by the requesting user (user)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.orders.cancel(id, &user).await?;
    Ok(Json(ApiResponse::ok()))
}

/// Update an order's status (admin)
pub async fn update_status(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<OrderStatusUpdate>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.orders.update_status(id, req.status).await?;
    Ok(Json(ApiResponse::ok()))
}
