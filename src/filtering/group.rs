use super::conditions::is_valid_field_name;
use super::sort::{DEFAULT_SORT_COLUMN, OrderBy, SortDirection};

/// A `groupby` request: one row per distinct combination of `fields`, each
/// carrying the latest `created_at` of its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    pub fields: Vec<String>,
    /// Column aggregated with `MAX` and selected back under its own name
    pub latest: String,
}

impl GroupBy {
    /// Parse a comma-separated `groupby` value. Blank and unsafe field names
    /// are dropped; `None` if nothing is left.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let fields: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .filter(|field| {
                let valid = is_valid_field_name(field);
                if !valid {
                    tracing::warn!(field, "Ignoring invalid groupby field");
                }
                valid
            })
            .map(ToString::to_string)
            .collect();

        (!fields.is_empty()).then(|| Self {
            fields,
            latest: DEFAULT_SORT_COLUMN.to_string(),
        })
    }

    /// Group mode orders by the aggregate, newest group first.
    #[must_use]
    pub fn order(&self) -> OrderBy {
        OrderBy::max_of(&self.latest, SortDirection::Desc)
    }
}
