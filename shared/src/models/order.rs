//! Order Model
//!
//! An order owns its records (line-item snapshots) and an append-only history
//! log. The total amount is never persisted: it is derived from the records on
//! every read, so out-of-band corrections to a record can never diverge from
//! the reported total.

use super::paging::PageInfo;
use super::product::Currency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat fee charged per order, in minor units (1,000 per order)
pub const ORDER_FEE: i64 = 100_000;

/// Order lifecycle status
///
/// `Cancelled` is terminal: no operation transitions out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only history entry; entries are insertion-ordered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub note: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Line-item snapshot belonging to exactly one order
///
/// `amount` is the unit price captured at placement time; later product price
/// changes do not touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub order_id: Uuid,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tracking_code: String,
    pub status: OrderStatus,
    pub currency: Currency,
    pub fee: i64,
    pub history: Vec<OrderHistoryEntry>,
    #[serde(rename = "order_records")]
    pub records: Vec<OrderRecord>,
    /// Storage-owned modification counter, checked on status writes
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Derived, never persisted; see [`Order::compute_total`]
    #[serde(default)]
    pub total_amount: i64,
}

impl Order {
    /// Sum of `amount * quantity` over the order's records
    pub fn compute_total(&self) -> i64 {
        self.records
            .iter()
            .map(|record| record.amount * record.quantity)
            .sum()
    }

    /// Refresh the derived total from the current records
    pub fn with_total(mut self) -> Self {
        self.total_amount = self.compute_total();
        self
    }
}

/// One requested line item in a place-order call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Place-order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub data: Vec<LineItem>,
    pub currency: Currency,
}

/// Admin status-update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Order list page with pagination info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub paging_info: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: i64, quantity: i64) -> OrderRecord {
        OrderRecord {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity,
            order_id: Uuid::nil(),
            amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_compute_total() {
        let order = Order {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tracking_code: "REF123".into(),
            status: OrderStatus::Pending,
            currency: Currency::Ngn,
            fee: ORDER_FEE,
            history: vec![],
            records: vec![record(4_500, 2), record(1_000, 3)],
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            total_amount: 0,
        };

        assert_eq!(order.compute_total(), 4_500 * 2 + 1_000 * 3);
        assert_eq!(order.with_total().total_amount, 12_000);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        let status: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_terminal_status() {
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
    }
}
