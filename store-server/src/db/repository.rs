//! Repository capability interfaces
//!
//! The storage engine is an external collaborator: the rest of the server
//! reaches it only through these traits. An embedded in-memory implementation
//! lives in [`crate::db::memory`]; a relational backend plugs in the same way.

use super::query::QueryPlan;
use async_trait::async_trait;
use shared::models::{Order, OrderHistoryEntry, OrderStatus, Product, ProductUpdate, User};
use thiserror::Error;
use uuid::Uuid;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Stale write: {0}")]
    Stale(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// User lookup and creation
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user; fails with `Duplicate` if the email is taken
    async fn create(&self, user: User) -> RepoResult<User>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

/// Product catalog storage
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new product; fails with `Duplicate` if the slug is taken
    async fn create(&self, product: Product) -> RepoResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Product>>;

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Product>>;

    /// Apply a partial update; a new name re-derives the slug
    async fn update(&self, id: Uuid, changes: ProductUpdate) -> RepoResult<Product>;

    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Filtered, sorted page of products plus the total match count
    async fn find_page(&self, plan: &QueryPlan) -> RepoResult<(Vec<Product>, i64)>;
}

/// Order storage
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order together with its records as one all-or-nothing unit
    async fn create(&self, order: Order) -> RepoResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>>;

    /// Owner-scoped lookup: only matches when the order belongs to `user_id`
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> RepoResult<Option<Order>>;

    /// Write a status change and the grown history log
    ///
    /// `expected_version` must equal the stored version or the write fails
    /// with `Stale`; this is the lost-update guard for concurrent
    /// status-changing requests on the same order.
    async fn update_status(
        &self,
        id: Uuid,
        expected_version: u64,
        status: OrderStatus,
        history: Vec<OrderHistoryEntry>,
    ) -> RepoResult<()>;

    /// Filtered, sorted page of orders plus the total match count, optionally
    /// scoped to an owner
    async fn find_page(
        &self,
        user_id: Option<Uuid>,
        plan: &QueryPlan,
    ) -> RepoResult<(Vec<Order>, i64)>;
}
