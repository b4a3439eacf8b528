//! The seam between query interpretation and query execution.
//!
//! [`read_paginated`](crate::read_paginated) never builds SQL itself. It
//! drives a [`QueryTarget`], an immutable builder where every clause method
//! consumes the builder and returns the extended one. The Sea-ORM
//! implementation lives in [`crate::database`]; tests use an in-memory fake.

use async_trait::async_trait;
use sea_orm::DbErr;

use crate::filtering::{FilterValue, GroupBy, OrderBy, SearchTarget};

#[async_trait]
pub trait QueryTarget: Clone + Send + Sync + Sized {
    /// Element type a fetch materializes into
    type Row: Send;

    /// `field = value`
    #[must_use]
    fn filter_eq(self, field: &str, value: FilterValue) -> Self;

    /// `field IN (values...)`
    #[must_use]
    fn filter_in(self, field: &str, values: Vec<FilterValue>) -> Self;

    /// Case-insensitive substring match. `pattern` is already escaped with
    /// [`LIKE_ESCAPE`](crate::filtering::LIKE_ESCAPE) and wrapped as
    /// `%needle%` (see [`contains_pattern`](crate::filtering::contains_pattern)),
    /// but not case-folded; implementations fold both sides themselves.
    #[must_use]
    fn filter_contains(self, target: &SearchTarget, pattern: &str) -> Self;

    /// Request eager loading of a named relation.
    #[must_use]
    fn preload(self, relation: &str) -> Self;

    /// Replace the selection with the group fields plus the
    /// `MAX(latest) AS latest` aggregate.
    #[must_use]
    fn select_grouped(self, group: &GroupBy) -> Self;

    /// `GROUP BY fields...`
    #[must_use]
    fn group_by(self, fields: &[String]) -> Self;

    /// Append one ORDER BY term.
    #[must_use]
    fn order_by(self, order: &OrderBy) -> Self;

    /// Count the rows the query matches, ignoring pagination.
    async fn count(&self) -> Result<u64, DbErr>;

    /// Execute with `LIMIT limit OFFSET offset` and materialize the rows.
    async fn fetch(self, limit: u64, offset: u64) -> Result<Vec<Self::Row>, DbErr>;
}
