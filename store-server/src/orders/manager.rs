//! OrderManager - order lifecycle state machine
//!
//! Owns order placement, cancellation, and status transitions, including the
//! append-only history log and the derived total.
//!
//! # State machine
//!
//! ```text
//! pending ──cancel()──────────────▶ cancelled (terminal)
//! pending / processing / shipped / delivered
//!         ──update_status(any)────▶ any non-terminal target, or cancelled
//! cancelled ──────────────────────▶ (no transitions out)
//! ```
//!
//! `cancel` is owner-scoped and PENDING-only. The admin `update_status` path
//! refuses to touch a cancelled order but may move any other order anywhere,
//! including into `cancelled`.
//!
//! Totals are never persisted: every order leaving this module has
//! `total_amount` recomputed from its records.

use std::sync::Arc;

use chrono::Utc;
use shared::models::{
    Currency, LineItem, Order, OrderHistoryEntry, OrderRecord, OrderStatus, PageInfo, PageQuery,
    ORDER_FEE,
};
use uuid::Uuid;

use super::error::{OrderError, OrderResult};
use super::tracking::generate_tracking_code;
use crate::auth::CurrentUser;
use crate::db::query::QueryPlan;
use crate::db::{OrderRepository, ProductRepository};

/// Order lifecycle manager
pub struct OrderManager {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
}

impl OrderManager {
    pub fn new(orders: Arc<dyn OrderRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { orders, products }
    }

    /// Place a new order for the given line items
    ///
    /// Every product is resolved up front and its current `price - discount`
    /// captured as the record's unit amount; one unresolvable product aborts
    /// the whole placement before anything is written. Records and order
    /// persist as a single all-or-nothing unit.
    pub async fn place(
        &self,
        user: &CurrentUser,
        items: &[LineItem],
        currency: Currency,
    ) -> OrderResult<Order> {
        let order_id = Uuid::new_v4();
        let now = Utc::now();

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .products
                .find_by_id(item.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(item.product_id))?;

            records.push(OrderRecord {
                id: Uuid::new_v4(),
                product_id: product.id,
                quantity: item.quantity,
                order_id,
                amount: product.unit_amount(),
                created_at: now,
            });
        }

        let order = Order {
            id: order_id,
            user_id: user.id,
            tracking_code: generate_tracking_code(),
            status: OrderStatus::Pending,
            currency,
            fee: ORDER_FEE,
            history: vec![OrderHistoryEntry {
                note: "order placed".to_string(),
                status: OrderStatus::Pending,
                created_at: now,
            }],
            records,
            version: 0,
            created_at: now,
            updated_at: now,
            total_amount: 0,
        };

        let created = self.orders.create(order).await?;
        tracing::info!(
            order_id = %created.id,
            user_id = %user.id,
            tracking_code = %created.tracking_code,
            "order placed"
        );
        Ok(created.with_total())
    }

    /// Cancel a pending order owned by the requesting user
    ///
    /// Only the owner sees the order at all, and only a PENDING order may be
    /// cancelled.
    pub async fn cancel(&self, order_id: Uuid, user: &CurrentUser) -> OrderResult<()> {
        let mut order = self
            .orders
            .find_for_user(order_id, user.id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        order.history.push(OrderHistoryEntry {
            note: "order cancelled".to_string(),
            status: OrderStatus::Cancelled,
            created_at: Utc::now(),
        });
        self.orders
            .update_status(order_id, order.version, OrderStatus::Cancelled, order.history)
            .await?;

        tracing::info!(order_id = %order_id, user_id = %user.id, "order cancelled");
        Ok(())
    }

    /// Update an order's status (admin path, no owner restriction)
    ///
    /// Cancellation is terminal; any other current status may move to any
    /// target, including into `cancelled` itself.
    pub async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> OrderResult<()> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        if order.status.is_terminal() {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }

        order.history.push(OrderHistoryEntry {
            note: format!("order {}", status),
            status,
            created_at: Utc::now(),
        });
        self.orders
            .update_status(order_id, order.version, status, order.history)
            .await?;

        tracing::info!(order_id = %order_id, status = %status, "order status updated");
        Ok(())
    }

    /// Fetch a single order with its total recomputed
    pub async fn get(&self, order_id: Uuid) -> OrderResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        Ok(order.with_total())
    }

    /// List the requesting user's orders through the query engine
    pub async fn list_for_user(
        &self,
        user: &CurrentUser,
        query: &PageQuery,
    ) -> OrderResult<(Vec<Order>, PageInfo)> {
        let plan = QueryPlan::from_query(query);
        let (orders, total) = self.orders.find_page(Some(user.id), &plan).await?;
        let orders: Vec<Order> = orders.into_iter().map(Order::with_total).collect();
        let info = plan.page_info(total, orders.len() as i64);
        Ok((orders, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, RepoError};
    use shared::models::{Product, ProductStatus, UserRole};

    struct Fixture {
        manager: OrderManager,
        store: Arc<MemoryStore>,
        shoe: Product,
        hat: Product,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let shoe = seed_product(&store, "Blue Shoe", 5_000, 500).await;
        let hat = seed_product(&store, "Green Hat", 2_000, 0).await;
        let manager = OrderManager::new(store.clone(), store.clone());
        Fixture {
            manager,
            store,
            shoe,
            hat,
        }
    }

    async fn seed_product(store: &MemoryStore, name: &str, price: i64, discount: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            slug: shared::models::product::to_slug(name),
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            currency: Currency::Ngn,
            discount,
            status: ProductStatus::InStock,
            available_quantity: 100,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        ProductRepository::create(store, product).await.unwrap()
    }

    fn buyer() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "buyer@example.com".into(),
            role: UserRole::User,
        }
    }

    fn line(product: &Product, quantity: i64) -> LineItem {
        LineItem {
            product_id: product.id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_place_snapshots_amounts_and_computes_total() {
        let fx = fixture().await;
        let user = buyer();

        let order = fx
            .manager
            .place(&user, &[line(&fx.shoe, 2), line(&fx.hat, 3)], Currency::Ngn)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, user.id);
        assert_eq!(order.fee, ORDER_FEE);
        assert_eq!(order.tracking_code.len(), 12);
        assert_eq!(order.records.len(), 2);
        // 5000 - 500 discount, snapshotted per unit
        assert_eq!(order.records[0].amount, 4_500);
        assert_eq!(order.total_amount, 4_500 * 2 + 2_000 * 3);

        assert_eq!(order.history.len(), 1);
        assert_eq!(order.history[0].note, "order placed");
        assert_eq!(order.history[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_place_unknown_product_creates_nothing() {
        let fx = fixture().await;
        let user = buyer();
        let ghost = Uuid::new_v4();

        let err = fx
            .manager
            .place(
                &user,
                &[
                    line(&fx.shoe, 1),
                    LineItem {
                        product_id: ghost,
                        quantity: 1,
                    },
                ],
                Currency::Ngn,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(id) if id == ghost));

        let plan = QueryPlan::from_query(&PageQuery::default());
        let (orders, total) = OrderRepository::find_page(fx.store.as_ref(), None, &plan)
            .await
            .unwrap();
        assert!(orders.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_total_is_recomputed_on_read() {
        let fx = fixture().await;
        let user = buyer();

        let placed = fx
            .manager
            .place(&user, &[line(&fx.shoe, 2)], Currency::Ngn)
            .await
            .unwrap();

        let fetched = fx.manager.get(placed.id).await.unwrap();
        assert_eq!(fetched.total_amount, 9_000);
        assert_eq!(fetched.total_amount, fetched.compute_total());
    }

    #[tokio::test]
    async fn test_cancel_pending_appends_history() {
        let fx = fixture().await;
        let user = buyer();
        let order = fx
            .manager
            .place(&user, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();

        fx.manager.cancel(order.id, &user).await.unwrap();

        let cancelled = fx.manager.get(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.history.len(), 2);
        let last = cancelled.history.last().unwrap();
        assert_eq!(last.note, "order cancelled");
        assert_eq!(last.status, OrderStatus::Cancelled);
        assert!(last.created_at >= cancelled.history[0].created_at);
    }

    #[tokio::test]
    async fn test_cancel_requires_pending() {
        let fx = fixture().await;
        let user = buyer();
        let order = fx
            .manager
            .place(&user, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();

        fx.manager
            .update_status(order.id, OrderStatus::Shipped)
            .await
            .unwrap();

        let err = fx.manager.cancel(order.id, &user).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Shipped,
                to: OrderStatus::Cancelled,
            }
        ));
    }

    #[tokio::test]
    async fn test_cancel_is_owner_scoped() {
        let fx = fixture().await;
        let owner = buyer();
        let order = fx
            .manager
            .place(&owner, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();

        let stranger = buyer();
        let err = fx.manager.cancel(order.id, &stranger).await.unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound(_)));

        // Untouched for the real owner
        let unchanged = fx.manager.get(order.id).await.unwrap();
        assert_eq!(unchanged.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_status_walks_the_lifecycle() {
        let fx = fixture().await;
        let user = buyer();
        let order = fx
            .manager
            .place(&user, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();

        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            fx.manager.update_status(order.id, status).await.unwrap();
        }

        let delivered = fx.manager.get(order.id).await.unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        // Seed entry plus one per transition
        assert_eq!(delivered.history.len(), 4);
        for pair in delivered.history.windows(2) {
            assert!(pair[1].created_at >= pair[0].created_at);
        }
        assert_eq!(delivered.history.last().unwrap().note, "order delivered");
    }

    #[tokio::test]
    async fn test_update_status_refuses_cancelled_orders() {
        let fx = fixture().await;
        let user = buyer();
        let order = fx
            .manager
            .place(&user, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();
        fx.manager.cancel(order.id, &user).await.unwrap();

        let err = fx
            .manager
            .update_status(order.id, OrderStatus::Processing)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_admin_path_may_cancel_any_active_order() {
        let fx = fixture().await;
        let user = buyer();
        let order = fx
            .manager
            .place(&user, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();
        fx.manager
            .update_status(order.id, OrderStatus::Shipped)
            .await
            .unwrap();

        // The admin path bypasses the PENDING-only restriction
        fx.manager
            .update_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let cancelled = fx.manager.get(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.history.last().unwrap().note, "order cancelled");
    }

    #[tokio::test]
    async fn test_concurrent_status_writes_conflict() {
        let fx = fixture().await;
        let user = buyer();
        let order = fx
            .manager
            .place(&user, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();

        // A competing writer advances the order under our feet
        fx.store
            .update_status(order.id, 0, OrderStatus::Processing, order.history.clone())
            .await
            .unwrap();

        let err = fx
            .store
            .update_status(order.id, 0, OrderStatus::Shipped, order.history.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Stale(_)));
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_filtered() {
        let fx = fixture().await;
        let alice = buyer();
        let bob = buyer();

        let first = fx
            .manager
            .place(&alice, &[line(&fx.shoe, 1)], Currency::Ngn)
            .await
            .unwrap();
        fx.manager
            .place(&alice, &[line(&fx.hat, 1)], Currency::Ngn)
            .await
            .unwrap();
        fx.manager
            .place(&bob, &[line(&fx.hat, 2)], Currency::Ngn)
            .await
            .unwrap();

        fx.manager.cancel(first.id, &alice).await.unwrap();

        let (orders, info) = fx
            .manager
            .list_for_user(&alice, &PageQuery::default())
            .await
            .unwrap();
        assert_eq!(info.total_count, 2);
        assert!(orders.iter().all(|o| o.user_id == alice.id));
        assert!(orders.iter().all(|o| o.total_amount == o.compute_total()));

        let (pending, info) = fx
            .manager
            .list_for_user(
                &alice,
                &PageQuery {
                    filter: "status|eq|pending".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(info.total_count, 1);
        assert_eq!(pending[0].status, OrderStatus::Pending);
        assert!(!info.has_next_page);
    }
}
