//! Caller configuration for [`read_paginated`](crate::read_paginated).
//!
//! [`ReadOptions`] is what the caller writes (in code or in its config file);
//! [`ResolvedOptions`] is the owned per-call snapshot the pipeline runs on.
//!
//! ```rust,ignore
//! let options = ReadOptions::new()
//!     .with_search_field("barang.nama")
//!     .with_order_by("created_at desc")
//!     .with_preload(["Gudang"])
//!     .with_field_type("barang_id", FieldType::Uuid)
//!     .with_page_size(25)
//!     .with_group_by(true);
//! ```

use serde::Deserialize;
use std::collections::HashMap;

use crate::filtering::{
    FieldType, FieldTypeRegistry, OrderBy, PageWindow, SearchTarget, parse_order,
};

/// Options controlling one kind of paginated read.
///
/// Deserializes from snake_case keys, e.g.
///
/// ```json
/// {"search_field": "nama", "field_types": {"jumlah": "int"}, "allow_group_by": true}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Column matched by `search`; `relation.column` targets a joined relation
    pub search_field: Option<String>,
    /// Order used when the request has no `order`, e.g. `"nama asc"`
    pub order_by: Option<String>,
    /// Relations loaded when the request has no `preload`
    pub preload: Vec<String>,
    /// Per-field type declarations layered over the built-in ones
    pub field_types: HashMap<String, FieldType>,
    /// Page when the request has none; 0 means 1
    pub default_page: u64,
    /// Page size when the request has none; 0 means 10
    pub default_page_size: u64,
    /// Whether `groupby` is honored
    pub allow_group_by: bool,
}

impl ReadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    #[must_use]
    pub fn with_preload<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload = relations.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_field_type(mut self, field: impl Into<String>, field_type: FieldType) -> Self {
        self.field_types.insert(field.into(), field_type);
        self
    }

    #[must_use]
    pub fn with_default_page(mut self, page: u64) -> Self {
        self.default_page = page;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.default_page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_group_by(mut self, allow: bool) -> Self {
        self.allow_group_by = allow;
        self
    }

    /// Merge with the built-in defaults into an independent snapshot.
    ///
    /// `self` is left untouched, so one `ReadOptions` can be shared by any
    /// number of concurrent reads.
    #[must_use]
    pub fn resolve(&self) -> ResolvedOptions {
        let default_order = self.order_by.as_deref().and_then(|expression| {
            let parsed = parse_order(expression);
            if parsed.is_none() {
                tracing::warn!(order = expression, "Ignoring malformed configured order");
            }
            parsed
        });

        ResolvedOptions {
            registry: FieldTypeRegistry::with_overrides(&self.field_types),
            search: self.search_field.as_deref().and_then(SearchTarget::parse),
            default_order,
            preload: self.preload.clone(),
            window: PageWindow::new(self.default_page, self.default_page_size),
            allow_group_by: self.allow_group_by,
        }
    }
}

/// Per-call view of [`ReadOptions`] merged with the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub registry: FieldTypeRegistry,
    pub search: Option<SearchTarget>,
    pub default_order: Option<Vec<OrderBy>>,
    pub preload: Vec<String>,
    /// Default window, before request parameters are applied
    pub window: PageWindow,
    pub allow_group_by: bool,
}
