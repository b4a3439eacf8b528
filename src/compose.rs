//! Applying parsed request directives to a [`QueryTarget`].
//!
//! Every step takes the builder by value and hands back the extended one, so
//! the caller's original query handle is never modified.

use crate::filtering::{
    FilterCondition, FilterKind, GroupBy, OrderBy, SearchTarget, contains_pattern, resolve_order,
};
use crate::params::QueryParams;
use crate::query::QueryTarget;

/// Add every validated filter condition.
pub fn apply_filters<Q: QueryTarget>(query: Q, conditions: Vec<FilterCondition>) -> Q {
    conditions.into_iter().fold(query, |query, condition| {
        tracing::debug!(field = %condition.field, kind = ?condition.kind, values = condition.values.len(), "Applying filter");
        match condition.kind {
            FilterKind::Equals => match condition.values.into_iter().next() {
                Some(value) => query.filter_eq(&condition.field, value),
                None => query,
            },
            FilterKind::In => query.filter_in(&condition.field, condition.values),
        }
    })
}

/// Relation names from a comma-separated `preload` value, blanks removed.
fn split_relations(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|relation| !relation.is_empty())
        .collect()
}

/// A non-empty `preload` parameter replaces `defaults` entirely.
pub fn apply_preload<Q: QueryTarget>(query: Q, params: &QueryParams, defaults: &[String]) -> Q {
    match params.get_non_empty("preload") {
        Some(raw) => split_relations(raw)
            .into_iter()
            .fold(query, |query, relation| query.preload(relation)),
        None => defaults
            .iter()
            .fold(query, |query, relation| query.preload(relation)),
    }
}

/// Substring search, only when a target is configured and `search` is non-empty.
pub fn apply_search<Q: QueryTarget>(
    query: Q,
    params: &QueryParams,
    target: Option<&SearchTarget>,
) -> Q {
    match (target, params.get_non_empty("search")) {
        (Some(target), Some(needle)) => {
            tracing::debug!(?target, needle, "Applying search");
            query.filter_contains(target, &contains_pattern(needle))
        }
        _ => query,
    }
}

/// The group requested by `groupby`, if grouping is allowed at all.
#[must_use]
pub fn requested_group(params: &QueryParams, allowed: bool) -> Option<GroupBy> {
    if !allowed {
        return None;
    }
    params.get_non_empty("groupby").and_then(GroupBy::parse)
}

/// Select the group fields and their latest `created_at`, group, and order by
/// that aggregate descending.
pub fn apply_group_by<Q: QueryTarget>(query: Q, group: &GroupBy) -> Q {
    tracing::debug!(fields = ?group.fields, "Applying group by");
    query
        .select_grouped(group)
        .group_by(&group.fields)
        .order_by(&group.order())
}

/// `order` parameter, else the configured default, else `created_at desc`.
pub fn apply_order<Q: QueryTarget>(
    query: Q,
    params: &QueryParams,
    configured: Option<&[OrderBy]>,
) -> Q {
    resolve_order(params.get_non_empty("order"), configured)
        .iter()
        .fold(query, Q::order_by)
}
