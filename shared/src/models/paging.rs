//! Paging and filter query DTOs

use serde::{Deserialize, Serialize};

/// Paging, sorting, and filter parameters accepted by every list endpoint
///
/// Zero/empty values mean "use the default". The `filter` string holds
/// space-separated `field|operator|value` entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub limit: i64,
    pub sort: String,
    pub direction: String,
    pub filter: String,
    pub page: i64,
}

/// Pagination metadata returned with every list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_count: i64,
    pub page: i64,
    pub has_next_page: bool,
    pub count: i64,
}
