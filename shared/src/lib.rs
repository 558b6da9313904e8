//! Shared domain types for the storefront backend
//!
//! This crate holds everything the server and its clients agree on:
//!
//! - **Error codes** (`error`): unified error codes, categories, HTTP mapping,
//!   and the `ApiResponse` envelope
//! - **Models** (`models`): users, products, orders, and paging DTOs

pub mod error;
pub mod models;

// Re-export common types
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
