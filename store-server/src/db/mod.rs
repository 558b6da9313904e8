//! Database Layer
//!
//! Storage is an external collaborator reached only through the repository
//! capability interfaces in [`repository`]. The [`memory`] module provides the
//! embedded implementation used by the default binary and the tests; the
//! [`query`] module builds the normalized plans that list operations hand to
//! whichever implementation is installed.

pub mod memory;
pub mod query;
pub mod repository;

// Re-exports
pub use memory::MemoryStore;
pub use query::{QueryPlan, SortDirection};
pub use repository::{OrderRepository, ProductRepository, RepoError, RepoResult, UserRepository};
