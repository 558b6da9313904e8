//! Product API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::product::to_slug;
use shared::models::{PageQuery, Product, ProductCreate, ProductStatus, ProductUpdate, ProductsPage};
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::query::QueryPlan;
use crate::db::{ProductRepository, RepoError};

/// Create a new product (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let slug = to_slug(&req.name);

    let existing = state
        .products
        .find_by_slug(&slug)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if existing.is_some() {
        return Err(AppError::new(ErrorCode::ProductNameExists));
    }

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        slug,
        name: req.name,
        description: req.description,
        price: req.price,
        currency: req.currency,
        discount: req.discount,
        status: ProductStatus::InStock,
        available_quantity: req.quantity,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    let created = state.products.create(product).await.map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::ProductNameExists),
        other => AppError::database(other.to_string()),
    })?;

    tracing::info!(product_id = %created.id, slug = %created.slug, "product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get product by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products
        .find_by_id(id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", id))
        })?;
    Ok(Json(product))
}

/// Partially update a product (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductUpdate>,
) -> Result<Json<Product>, AppError> {
    // A rename must not collide with another product's slug
    if let Some(ref name) = req.name {
        let slug = to_slug(name);
        let existing = state
            .products
            .find_by_slug(&slug)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        if existing.is_some_and(|p| p.id != id) {
            return Err(AppError::new(ErrorCode::ProductNameExists));
        }
    }

    let updated = state.products.update(id, req).await.map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ProductNotFound, msg),
        other => AppError::database(other.to_string()),
    })?;

    tracing::info!(product_id = %updated.id, "product updated");
    Ok(Json(updated))
}

/// Delete a product (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.products.delete(id).await.map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ProductNotFound, msg),
        other => AppError::database(other.to_string()),
    })?;

    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(ApiResponse::ok()))
}

/// List products (filtered, sorted, paginated)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductsPage>, AppError> {
    let plan = QueryPlan::from_query(&query);
    let (products, total) = state
        .products
        .find_page(&plan)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let paging_info = plan.page_info(total, products.len() as i64);
    Ok(Json(ProductsPage {
        products,
        paging_info,
    }))
}
