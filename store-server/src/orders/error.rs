//! Order manager errors

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;
use uuid::Uuid;

use crate::db::RepoError;

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Translate domain errors into coded API errors at the manager boundary;
/// storage detail never leaks past here.
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
            }
            OrderError::ProductNotFound(id) => AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", id),
            ),
            OrderError::InvalidTransition { from, to } => {
                if from.is_terminal() {
                    AppError::with_message(
                        ErrorCode::OrderAlreadyCancelled,
                        format!("cancelled order cannot be moved to {}", to),
                    )
                } else {
                    AppError::with_message(
                        ErrorCode::OrderNotCancellable,
                        format!("order in status {} cannot be cancelled", from),
                    )
                }
            }
            OrderError::Storage(e) => match e {
                RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
                RepoError::Duplicate(msg) => AppError::conflict(msg),
                RepoError::Stale(msg) => {
                    tracing::warn!(error = %msg, "concurrent order modification");
                    AppError::with_message(ErrorCode::OrderModified, msg)
                }
                RepoError::Database(msg) => {
                    tracing::error!(error = %msg, "storage error");
                    AppError::database(msg)
                }
                RepoError::Validation(msg) => AppError::invalid_request(msg),
            },
        }
    }
}
