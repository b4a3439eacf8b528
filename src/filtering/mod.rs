//! # Query Parameter Interpretation
//!
//! Everything that turns raw query text into typed request-shaping values.
//! Nothing in here builds SQL; [`paginate`] only drives a
//! [`QueryTarget`](crate::QueryTarget).
//!
//! ## Query Parameter Examples
//!
//! ```text
//! // Equality (typed by the field's declaration)
//! GET /movements?filter[jumlah]=12
//!
//! // Membership (IN query)
//! GET /movements?filter[gudang_id]=uuid1,uuid2
//!
//! // Substring search on the configured search field
//! GET /movements?search=baut
//!
//! // Ordering, overriding the configured default
//! GET /movements?order=jumlah desc
//!
//! // Relation loading, replacing the configured defaults
//! GET /movements?preload=Gudang,Barang
//!
//! // One row per group, newest group first (when enabled)
//! GET /movements?groupby=gudang_id
//!
//! // Pagination
//! GET /movements?page=2&pageSize=25
//! ```

pub mod conditions;
pub mod field_types;
pub mod group;
pub mod pagination;
pub mod search;
pub mod sort;

// Re-export commonly used items
pub use conditions::{FilterCondition, FilterKind, FilterValue, ParsedFilters, parse_filters};
pub use field_types::{FieldType, FieldTypeRegistry};
pub use group::GroupBy;
pub use pagination::{PageWindow, PaginationMeta, paginate};
pub use search::{LIKE_ESCAPE, SearchTarget, contains_pattern};
pub use sort::{OrderBy, SortDirection, SortKey, parse_order, resolve_order};
