use super::conditions::is_valid_field_name;

/// Column every read falls back to ordering by.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for sea_orm::Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// What an ORDER BY term sorts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// A (possibly `relation.`-qualified) column
    Column(String),
    /// `MAX(column)`, used in group-by mode
    Max(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl OrderBy {
    #[must_use]
    pub fn column(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: SortKey::Column(column.into()),
            direction,
        }
    }

    #[must_use]
    pub fn max_of(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: SortKey::Max(column.into()),
            direction,
        }
    }
}

/// Convert sort order string to a direction; `None` if it is neither.
fn parse_direction(direction: &str) -> Option<SortDirection> {
    if direction.eq_ignore_ascii_case("asc") {
        Some(SortDirection::Asc)
    } else if direction.eq_ignore_ascii_case("desc") {
        Some(SortDirection::Desc)
    } else {
        None
    }
}

/// Parse one `<column> [asc|desc]` term.
fn parse_term(term: &str) -> Option<OrderBy> {
    let mut words = term.split_whitespace();
    let column = words.next()?;
    let direction = match words.next() {
        Some(word) => parse_direction(word)?,
        None => SortDirection::Asc,
    };
    if words.next().is_some() || !is_valid_field_name(column) {
        return None;
    }
    Some(OrderBy::column(column, direction))
}

/// Parse an order expression such as `"name asc"` or `"status, created_at desc"`.
///
/// Returns `None` when any term is malformed, so that the caller can fall
/// back to its next default rather than apply half an ordering.
#[must_use]
pub fn parse_order(expression: &str) -> Option<Vec<OrderBy>> {
    let terms = expression
        .split(',')
        .map(parse_term)
        .collect::<Option<Vec<_>>>()?;
    (!terms.is_empty()).then_some(terms)
}

/// `created_at desc`
#[must_use]
pub fn default_order() -> Vec<OrderBy> {
    vec![OrderBy::column(DEFAULT_SORT_COLUMN, SortDirection::Desc)]
}

/// Pick the ordering for a read: the `order` parameter, then the configured
/// default, then [`default_order`]. Malformed candidates are skipped.
#[must_use]
pub fn resolve_order(requested: Option<&str>, configured: Option<&[OrderBy]>) -> Vec<OrderBy> {
    if let Some(expression) = requested {
        match parse_order(expression) {
            Some(order) => return order,
            None => tracing::warn!(order = expression, "Ignoring malformed order parameter"),
        }
    }
    match configured {
        Some(order) if !order.is_empty() => order.to_vec(),
        _ => default_order(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("ASC"), Some(SortDirection::Asc));
        assert_eq!(parse_direction("asc"), Some(SortDirection::Asc));
        assert_eq!(parse_direction("Desc"), Some(SortDirection::Desc));
        assert_eq!(parse_direction("sideways"), None);
    }

    #[test]
    fn test_parse_single_term() {
        assert_eq!(
            parse_order("name desc"),
            Some(vec![OrderBy::column("name", SortDirection::Desc)])
        );
        assert_eq!(
            parse_order("  name  "),
            Some(vec![OrderBy::column("name", SortDirection::Asc)])
        );
    }

    #[test]
    fn test_parse_multiple_terms() {
        assert_eq!(
            parse_order("status ASC, gudang.nama desc"),
            Some(vec![
                OrderBy::column("status", SortDirection::Asc),
                OrderBy::column("gudang.nama", SortDirection::Desc),
            ])
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_order(""), None);
        assert_eq!(parse_order("name sideways"), None);
        assert_eq!(parse_order("name desc nulls"), None);
        assert_eq!(parse_order("name; DROP TABLE x"), None);
        assert_eq!(parse_order("name,"), None);
    }

    #[test]
    fn test_requested_order_wins() {
        let configured = vec![OrderBy::column("status", SortDirection::Asc)];
        assert_eq!(
            resolve_order(Some("jumlah desc"), Some(&configured)),
            vec![OrderBy::column("jumlah", SortDirection::Desc)]
        );
    }

    #[test]
    fn test_configured_order_is_fallback() {
        let configured = vec![OrderBy::column("status", SortDirection::Asc)];
        assert_eq!(resolve_order(None, Some(&configured)), configured);
        assert_eq!(resolve_order(Some("bad order here"), Some(&configured)), configured);
    }

    #[test]
    fn test_default_is_created_at_desc() {
        let expected = vec![OrderBy::column("created_at", SortDirection::Desc)];
        assert_eq!(resolve_order(None, None), expected);
        assert_eq!(resolve_order(None, Some(&[])), expected);
    }

    #[test]
    fn test_direction_into_sea_orm_order() {
        assert_eq!(sea_orm::Order::from(SortDirection::Asc), sea_orm::Order::Asc);
        assert_eq!(sea_orm::Order::from(SortDirection::Desc), sea_orm::Order::Desc);
    }
}
