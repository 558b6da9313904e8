//! Product Model

use super::paging::PageInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product stock status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    InStock,
    NotInStock,
    SoldOut,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::InStock => "in-stock",
            ProductStatus::NotInStock => "not-in-stock",
            ProductStatus::SoldOut => "sold-out",
        }
    }
}

/// Supported settlement currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ngn,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Ngn => "NGN",
        }
    }
}

/// Product entity
///
/// Prices are integer minor units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub currency: Currency,
    pub discount: i64,
    pub status: ProductStatus,
    pub available_quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Effective unit amount charged for this product right now
    pub fn unit_amount(&self) -> i64 {
        self.price - self.discount
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub price: i64,
    #[serde(default)]
    pub discount: i64,
    pub currency: Currency,
}

/// Update product payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
}

/// Product list page with pagination info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsPage {
    pub products: Vec<Product>,
    pub paging_info: PageInfo,
}

/// Derive a URL-safe slug from a product name
///
/// Lowercases, keeps alphanumerics, and collapses every other run of
/// characters into a single dash.
pub fn to_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::InStock).unwrap(),
            "\"in-stock\""
        );
        assert_eq!(
            serde_json::to_string(&ProductStatus::NotInStock).unwrap(),
            "\"not-in-stock\""
        );
        assert_eq!(
            serde_json::to_string(&ProductStatus::SoldOut).unwrap(),
            "\"sold-out\""
        );
    }

    #[test]
    fn test_currency_serialization() {
        assert_eq!(serde_json::to_string(&Currency::Ngn).unwrap(), "\"NGN\"");
    }

    #[test]
    fn test_to_slug() {
        assert_eq!(to_slug("Blue Shoe"), "blue-shoe");
        assert_eq!(to_slug("  Running -- Shoe 2 "), "running-shoe-2");
        assert_eq!(to_slug("Café"), "caf");
    }

    #[test]
    fn test_unit_amount() {
        let product = Product {
            id: Uuid::new_v4(),
            slug: "blue-shoe".into(),
            name: "Blue Shoe".into(),
            description: "A blue shoe".into(),
            price: 5_000,
            currency: Currency::Ngn,
            discount: 500,
            status: ProductStatus::InStock,
            available_quantity: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        assert_eq!(product.unit_amount(), 4_500);
    }
}
