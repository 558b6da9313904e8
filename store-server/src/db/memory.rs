//! Embedded in-memory store
//!
//! Implements the repository capability interfaces over process-local maps.
//! Backs the default binary and the test suite; a relational engine replaces
//! it behind the same traits without touching the rest of the server.
//!
//! Query-plan predicates are evaluated against string projections of entity
//! fields. `gt`/`lt` compare numerically when both sides parse as integers,
//! lexically otherwise (timestamps project as RFC 3339, which sorts
//! lexically).

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use shared::models::product::to_slug;
use shared::models::{Order, OrderHistoryEntry, OrderStatus, Product, ProductUpdate, User};
use uuid::Uuid;

use super::query::{FilterOp, FilterValue, Predicate, QueryPlan, SortDirection};
use super::repository::{
    OrderRepository, ProductRepository, RepoError, RepoResult, UserRepository,
};

/// In-memory storage for users, products, and orders
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    products: RwLock<HashMap<Uuid, Product>>,
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Predicate evaluation
// =============================================================================

fn ordering(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

fn matches(predicate: &Predicate, actual: &str) -> bool {
    match (&predicate.op, &predicate.value) {
        (FilterOp::Eq, FilterValue::Scalar(value)) => actual == value,
        (FilterOp::Ne, FilterValue::Scalar(value)) => actual != value,
        (FilterOp::Gt, FilterValue::Scalar(value)) => {
            ordering(actual, value) == Ordering::Greater
        }
        (FilterOp::Lt, FilterValue::Scalar(value)) => ordering(actual, value) == Ordering::Less,
        (FilterOp::Like, FilterValue::Scalar(pattern)) => {
            actual.contains(pattern.trim_matches('%'))
        }
        (FilterOp::In, FilterValue::List(values)) => values.iter().any(|v| v == actual),
        // Parser never pairs a list with a scalar operator or vice versa
        _ => false,
    }
}

/// Filter, sort, and slice a snapshot of entities per the plan
///
/// Returns the page plus the total match count (computed before the slice).
fn apply_plan<T>(
    items: Vec<T>,
    plan: &QueryPlan,
    project: impl Fn(&T, &str) -> Option<String>,
) -> (Vec<T>, i64) {
    let mut matched: Vec<T> = items
        .into_iter()
        .filter(|item| {
            plan.predicates.iter().all(|predicate| {
                project(item, &predicate.field)
                    .map(|actual| matches(predicate, &actual))
                    .unwrap_or(false)
            })
        })
        .collect();

    matched.sort_by(|a, b| {
        let av = project(a, &plan.sort).unwrap_or_default();
        let bv = project(b, &plan.sort).unwrap_or_default();
        match plan.direction {
            SortDirection::Asc => ordering(&av, &bv),
            SortDirection::Desc => ordering(&av, &bv).reverse(),
        }
    });

    let total = matched.len() as i64;
    let page: Vec<T> = matched
        .into_iter()
        .skip(plan.offset.max(0) as usize)
        .take(plan.limit.max(0) as usize)
        .collect();
    (page, total)
}

fn product_field(product: &Product, field: &str) -> Option<String> {
    match field {
        "id" => Some(product.id.to_string()),
        "slug" => Some(product.slug.clone()),
        "name" => Some(product.name.clone()),
        "description" => Some(product.description.clone()),
        "price" => Some(product.price.to_string()),
        "discount" => Some(product.discount.to_string()),
        "currency" => Some(product.currency.as_str().to_string()),
        "status" => Some(product.status.as_str().to_string()),
        "available_quantity" => Some(product.available_quantity.to_string()),
        "created_at" => Some(product.created_at.to_rfc3339()),
        "updated_at" => Some(product.updated_at.to_rfc3339()),
        _ => None,
    }
}

fn order_field(order: &Order, field: &str) -> Option<String> {
    match field {
        "id" => Some(order.id.to_string()),
        "user_id" => Some(order.user_id.to_string()),
        "tracking_code" => Some(order.tracking_code.clone()),
        "status" => Some(order.status.as_str().to_string()),
        "currency" => Some(order.currency.as_str().to_string()),
        "fee" => Some(order.fee.to_string()),
        "created_at" => Some(order.created_at.to_rfc3339()),
        "updated_at" => Some(order.updated_at.to_rfc3339()),
        _ => None,
    }
}

// =============================================================================
// Repository implementations
// =============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, mut user: User) -> RepoResult<User> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate(format!(
                "user with email '{}' already exists",
                user.email
            )));
        }
        let now = Utc::now();
        user.created_at = now;
        user.updated_at = now;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, mut product: Product) -> RepoResult<Product> {
        let mut products = self.products.write();
        if products.values().any(|p| p.slug == product.slug) {
            return Err(RepoError::Duplicate(format!(
                "product with slug '{}' already exists",
                product.slug
            )));
        }
        let now = Utc::now();
        product.created_at = now;
        product.updated_at = now;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Product>> {
        Ok(self.products.read().get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn update(&self, id: Uuid, changes: ProductUpdate) -> RepoResult<Product> {
        let mut products = self.products.write();
        let product = products
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(name) = changes.name {
            product.slug = to_slug(&name);
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(quantity) = changes.quantity {
            product.available_quantity = quantity;
        }
        if let Some(status) = changes.status {
            product.status = status;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(discount) = changes.discount {
            product.discount = discount;
        }
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.products
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    async fn find_page(&self, plan: &QueryPlan) -> RepoResult<(Vec<Product>, i64)> {
        let products: Vec<Product> = self.products.read().values().cloned().collect();
        Ok(apply_plan(products, plan, product_field))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, mut order: Order) -> RepoResult<Order> {
        let mut orders = self.orders.write();
        if orders.contains_key(&order.id) {
            return Err(RepoError::Duplicate(format!(
                "order {} already exists",
                order.id
            )));
        }
        let now = Utc::now();
        order.created_at = now;
        order.updated_at = now;
        order.version = 0;
        // Derived value, not stored
        order.total_amount = 0;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>> {
        Ok(self.orders.read().get(&id).cloned())
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> RepoResult<Option<Order>> {
        Ok(self
            .orders
            .read()
            .get(&id)
            .filter(|order| order.user_id == user_id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected_version: u64,
        status: OrderStatus,
        history: Vec<OrderHistoryEntry>,
    ) -> RepoResult<()> {
        let mut orders = self.orders.write();
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if order.version != expected_version {
            return Err(RepoError::Stale(format!(
                "order {} version {} does not match expected {}",
                id, order.version, expected_version
            )));
        }

        order.status = status;
        order.history = history;
        order.version += 1;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn find_page(
        &self,
        user_id: Option<Uuid>,
        plan: &QueryPlan,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let orders: Vec<Order> = self
            .orders
            .read()
            .values()
            .filter(|order| user_id.is_none_or(|owner| order.user_id == owner))
            .cloned()
            .collect();
        Ok(apply_plan(orders, plan, order_field))
    }
}
