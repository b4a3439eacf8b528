use sea_orm::Value;
use std::fmt;
use uuid::Uuid;

use super::field_types::FieldTypeRegistry;
use crate::errors::{ReadError, RejectedFilter};
use crate::params::QueryParams;

const FILTER_PREFIX: &str = "filter[";
const FILTER_SUFFIX: &str = "]";
const MAX_FIELD_NAME_LENGTH: usize = 100;

/// Basic field name validation.
///
/// Accepts `column` or `relation.column` built from ASCII letters, digits and
/// underscores.
pub(crate) fn is_valid_field_name(field_name: &str) -> bool {
    let valid_segment = |segment: &str| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    field_name.len() <= MAX_FIELD_NAME_LENGTH
        && match field_name.split_once('.') {
            Some((relation, column)) => valid_segment(relation) && valid_segment(column),
            None => valid_segment(field_name),
        }
}

/// A coerced filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Integer(i64),
    Uuid(Uuid),
    String(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<FilterValue> for Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Integer(v) => v.into(),
            FilterValue::Uuid(v) => v.into(),
            FilterValue::String(v) => v.into(),
        }
    }
}

/// How a condition compares its field against its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// `field = value`
    Equals,
    /// `field IN (values...)`
    In,
}

/// A validated `filter[<field>]` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub field: String,
    pub kind: FilterKind,
    /// Never empty; exactly one value for [`FilterKind::Equals`]
    pub values: Vec<FilterValue>,
}

impl FilterCondition {
    /// Build a condition from the surviving values of one field, or `None` if
    /// nothing survived.
    fn from_values(field: &str, values: Vec<FilterValue>) -> Option<Self> {
        let kind = match values.len() {
            0 => return None,
            1 => FilterKind::Equals,
            _ => FilterKind::In,
        };
        Some(Self {
            field: field.to_string(),
            kind,
            values,
        })
    }
}

/// Outcome of scanning the query for `filter[...]` parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedFilters {
    /// Conditions in order of first appearance of their key
    pub conditions: Vec<FilterCondition>,
    /// Every value (or field name) that failed validation
    pub rejected: Vec<RejectedFilter>,
}

impl ParsedFilters {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Fail closed: any rejected value discards every condition.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::InvalidFilter`] if any value was rejected.
    pub fn into_conditions(self) -> Result<Vec<FilterCondition>, ReadError> {
        if self.rejected.is_empty() {
            Ok(self.conditions)
        } else {
            Err(ReadError::InvalidFilter {
                rejected: self.rejected,
            })
        }
    }
}

/// Extract the field name from a `filter[<field>]` key.
fn filter_field(key: &str) -> Option<&str> {
    key.strip_prefix(FILTER_PREFIX)?.strip_suffix(FILTER_SUFFIX)
}

/// Split a raw value into parts. Comma lists are trimmed per part; a single
/// value is kept verbatim.
fn split_values(raw: &str) -> Vec<&str> {
    if raw.contains(',') {
        raw.split(',').map(str::trim).collect()
    } else {
        vec![raw]
    }
}

/// Parse every `filter[<field>]=<value>` parameter against `registry`.
///
/// Only the first value of a repeated key is considered. Invalid parts are
/// dropped from their condition and recorded in
/// [`ParsedFilters::rejected`]; valid parts of the same field are kept.
#[must_use]
pub fn parse_filters(params: &QueryParams, registry: &FieldTypeRegistry) -> ParsedFilters {
    let mut parsed = ParsedFilters::default();

    for (key, raw) in params.first_values() {
        let Some(field) = filter_field(key) else {
            continue;
        };
        if field.is_empty() {
            continue;
        }
        if !is_valid_field_name(field) {
            tracing::warn!(field, "Rejected filter with invalid field name");
            parsed.rejected.push(RejectedFilter::field_name(field, raw));
            continue;
        }

        let field_type = registry.resolve(field);
        let mut values = Vec::new();
        for part in split_values(raw) {
            match field_type.coerce(part) {
                Some(value) => values.push(value),
                None => {
                    tracing::warn!(field, value = part, expected = %field_type, "Rejected filter value");
                    parsed
                        .rejected
                        .push(RejectedFilter::value(field, part, field_type));
                }
            }
        }

        if let Some(condition) = FilterCondition::from_values(field, values) {
            parsed.conditions.push(condition);
        }
    }

    parsed
}
