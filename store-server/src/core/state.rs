//! Server State

use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{MemoryStore, OrderRepository, ProductRepository, UserRepository};
use crate::orders::OrderManager;

/// Shared server state
///
/// Holds `Arc`'d handles to every service so cloning per request is cheap.
/// Repositories are trait objects: the storage engine behind them is
/// swappable without touching handlers or the order manager.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub jwt: Arc<JwtService>,
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<OrderManager>,
}

impl ServerState {
    /// Assemble state around a concrete set of repositories
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        order_store: Arc<dyn OrderRepository>,
    ) -> Self {
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        let orders = Arc::new(OrderManager::new(order_store, products.clone()));
        Self {
            config,
            jwt,
            users,
            products,
            orders,
        }
    }

    /// State backed by the embedded in-memory store
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store.clone(), store)
    }
}
