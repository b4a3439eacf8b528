use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::compose::{apply_filters, apply_group_by, apply_order, apply_preload, apply_search, requested_group};
use crate::config::ReadOptions;
use crate::errors::ReadError;
use crate::filtering::{PaginationMeta, paginate, parse_filters};
use crate::params::QueryParams;
use crate::query::QueryTarget;

/// Metadata sent alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub pagination: PaginationMeta,
}

/// One page of rows, serialized as `{"data": [...], "meta": {"pagination": {...}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: Meta,
}

impl<T> Paginated<T> {
    /// Convert every row, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Interpret `params` against `options` and read one page through `query`.
///
/// The pipeline is fixed: filters, preload, search, group-by, order-by,
/// then count and fetch. `query` may already carry caller-side joins or
/// conditions; it is consumed and never handed back half-built.
///
/// Filter validation fails closed. If any `filter[...]` value does not fit
/// its declared type, nothing is queried and [`ReadError::InvalidFilter`] is
/// returned, even when other filters were valid.
///
/// # Errors
///
/// - [`ReadError::InvalidFilter`] on any rejected filter value
/// - [`ReadError::Database`] with the untouched error of the count or fetch
pub async fn read_paginated<Q, T>(
    params: &QueryParams,
    query: Q,
    options: &ReadOptions,
) -> Result<Paginated<T>, ReadError>
where
    Q: QueryTarget,
    T: From<Q::Row>,
{
    let resolved = options.resolve();
    let window = resolved.window.from_params(params);

    let conditions = parse_filters(params, &resolved.registry).into_conditions()?;

    let query = apply_filters(query, conditions);
    let query = apply_preload(query, params, &resolved.preload);
    let query = apply_search(query, params, resolved.search.as_ref());
    let query = match requested_group(params, resolved.allow_group_by) {
        Some(group) => apply_group_by(query, &group),
        None => apply_order(query, params, resolved.default_order.as_deref()),
    };

    let (rows, pagination) = paginate(query, window).await?;

    Ok(Paginated {
        data: rows.into_iter().map(T::from).collect(),
        meta: Meta { pagination },
    })
}
