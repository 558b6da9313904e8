//! Query Plan Construction
//!
//! Parses the compact textual filter language and paging parameters shared by
//! every list endpoint into a normalized [`QueryPlan`].
//!
//! The filter wire format is a sequence of entries separated by single spaces,
//! each entry being `field|operator|value`. A malformed entry invalidates the
//! ENTIRE filter string, not just the bad entry; so does an operator outside
//! the closed [`FilterOp`] set. Discarded filters are logged at `warn` and the
//! request proceeds unfiltered.

use shared::models::{PageInfo, PageQuery};
use thiserror::Error;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// Sort direction, defaulting to newest-first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn parse(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Closed set of filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `eq` - equals
    Eq,
    /// `ne` - not equals
    Ne,
    /// `gt` - greater than
    Gt,
    /// `lt` - less than
    Lt,
    /// `like` - substring match, value wrapped as `%value%`
    Like,
    /// `in` - membership, value split on commas
    In,
}

impl FilterOp {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "eq" => Some(FilterOp::Eq),
            "ne" => Some(FilterOp::Ne),
            "gt" => Some(FilterOp::Gt),
            "lt" => Some(FilterOp::Lt),
            "like" => Some(FilterOp::Like),
            "in" => Some(FilterOp::In),
            _ => None,
        }
    }
}

/// Filter comparison value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Scalar(String),
    List(Vec<String>),
}

/// One parsed `field|operator|value` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

/// Filter string parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("malformed filter entry: {0}")]
    MalformedEntry(String),

    #[error("unknown filter operator: {0}")]
    UnknownOperator(String),
}

/// Parse a filter string into an ordered predicate list
///
/// Any failing entry fails the whole parse.
pub fn parse_filter(filter: &str) -> Result<Vec<Predicate>, FilterError> {
    if filter.is_empty() {
        return Ok(Vec::new());
    }

    let mut predicates = Vec::new();
    for entry in filter.split(' ') {
        let segments: Vec<&str> = entry.split('|').collect();
        if segments.len() != 3 {
            return Err(FilterError::MalformedEntry(entry.to_string()));
        }

        let op = FilterOp::parse(segments[1])
            .ok_or_else(|| FilterError::UnknownOperator(segments[1].to_string()))?;

        let value = match op {
            FilterOp::Like => FilterValue::Scalar(format!("%{}%", segments[2])),
            FilterOp::In => {
                FilterValue::List(segments[2].split(',').map(str::to_string).collect())
            }
            _ => FilterValue::Scalar(segments[2].to_string()),
        };

        predicates.push(Predicate {
            field: segments[0].to_string(),
            op,
            value,
        });
    }

    Ok(predicates)
}

/// Normalized query plan: predicates plus paging and sorting
///
/// Transient; constructed per request and handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub limit: i64,
    pub offset: i64,
    pub page: i64,
    pub sort: String,
    pub direction: SortDirection,
}

impl QueryPlan {
    /// Build a plan from request parameters, applying defaults for zero/empty
    /// values
    pub fn from_query(query: &PageQuery) -> Self {
        let page = if query.page == 0 {
            DEFAULT_PAGE
        } else {
            query.page
        };
        let limit = if query.limit == 0 {
            DEFAULT_LIMIT
        } else {
            query.limit
        };
        let sort = if query.sort.is_empty() {
            DEFAULT_SORT_FIELD.to_string()
        } else {
            query.sort.clone()
        };
        let direction = if query.direction.is_empty() {
            SortDirection::Desc
        } else {
            SortDirection::parse(&query.direction)
        };
        let offset = if page > 1 { limit * (page - 1) } else { 0 };

        let predicates = match parse_filter(&query.filter) {
            Ok(predicates) => predicates,
            Err(err) => {
                tracing::warn!(filter = %query.filter, error = %err, "discarding unparseable filter");
                Vec::new()
            }
        };

        Self {
            predicates,
            limit,
            offset,
            page,
            sort,
            direction,
        }
    }

    /// Page metadata for a result set
    ///
    /// `total_count` is the match count before offset/limit; `count` the
    /// number of items actually returned on this page.
    pub fn page_info(&self, total_count: i64, count: i64) -> PageInfo {
        let has_next_page = (self.page * self.limit) - total_count < 0 && self.limit > 0;
        PageInfo {
            total_count,
            page: self.page,
            has_next_page,
            count,
        }
    }
}
