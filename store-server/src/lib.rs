//! Store Server - e-commerce order/product/user backend
//!
//! # Architecture
//!
//! - **Auth** (`auth`): JWT token service, request authentication middleware,
//!   and exact-match role gates
//! - **Orders** (`orders`): order lifecycle state machine with append-only
//!   history and derived totals
//! - **Database** (`db`): repository capability interfaces, the embedded
//!   in-memory store, and the filter/pagination query engine
//! - **HTTP API** (`api`): axum routes and handlers
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # Configuration, shared state
//! ├── auth/          # JWT, middleware, role gates, password hashing
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Repository traits, query engine, in-memory store
//! ├── orders/        # Order lifecycle manager
//! └── utils/         # Logging setup
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, ServerState};
pub use orders::OrderManager;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
