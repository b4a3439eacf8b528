//! Declared value types for filterable fields.
//!
//! Every `filter[<field>]` value is coerced according to the type declared for
//! `<field>`. Types come from a small set of built-in defaults, overridden per
//! field by the caller's [`ReadOptions`](crate::config::ReadOptions).

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::conditions::FilterValue;

/// Built-in field declarations, applied underneath caller overrides.
const DEFAULT_FIELD_TYPES: &[(&str, FieldType)] = &[
    ("id", FieldType::Uuid),
    ("status", FieldType::String),
    ("jumlah", FieldType::Integer),
    ("gudang_id", FieldType::Uuid),
];

/// The value type a filterable field is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum FieldType {
    /// Signed 64-bit integer
    #[serde(rename = "int", alias = "integer")]
    Integer,
    /// UUID in any form accepted by [`Uuid::parse_str`]
    #[serde(rename = "uuid")]
    Uuid,
    /// Free text, passed through untouched
    #[default]
    #[serde(rename = "string")]
    String,
}

impl FieldType {
    /// Coerce one raw value. `None` means the value does not fit the type.
    #[must_use]
    pub fn coerce(self, raw: &str) -> Option<FilterValue> {
        match self {
            Self::Integer => raw.parse::<i64>().ok().map(FilterValue::Integer),
            Self::Uuid => Uuid::parse_str(raw).ok().map(FilterValue::Uuid),
            Self::String => Some(FilterValue::String(raw.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "int",
            Self::Uuid => "uuid",
            Self::String => "string",
        })
    }
}

/// Field name to [`FieldType`] lookup.
///
/// Built once per read from the defaults plus the caller's overrides and never
/// mutated afterwards, so concurrent reads with different options cannot see
/// each other's declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTypeRegistry {
    types: HashMap<String, FieldType>,
}

impl FieldTypeRegistry {
    /// Registry holding only the built-in declarations.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            types: DEFAULT_FIELD_TYPES
                .iter()
                .map(|(name, ty)| ((*name).to_string(), *ty))
                .collect(),
        }
    }

    /// Built-in declarations with `overrides` taking precedence per field.
    #[must_use]
    pub fn with_overrides(overrides: &HashMap<String, FieldType>) -> Self {
        let mut registry = Self::builtin();
        registry
            .types
            .extend(overrides.iter().map(|(name, ty)| (name.clone(), *ty)));
        registry
    }

    /// Declared type of `field`; undeclared fields are strings.
    #[must_use]
    pub fn resolve(&self, field: &str) -> FieldType {
        self.types.get(field).copied().unwrap_or_default()
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
