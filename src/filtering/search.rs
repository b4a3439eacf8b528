/// Search values are cut at this many bytes before escaping.
const MAX_SEARCH_LENGTH: usize = 10_000;

/// Escape character of every search pattern (`LIKE .. ESCAPE '\'`).
pub const LIKE_ESCAPE: char = '\\';

/// `%`, `_` and the escape character itself match literally afterwards.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Column a `search` parameter is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// A column of the queried table
    Column(String),
    /// `relation.column`; the caller is responsible for joining `relation`
    Qualified { relation: String, column: String },
}

impl SearchTarget {
    /// Interpret a configured search field. `None` if it is empty.
    ///
    /// Exactly one dot selects a relation column; anything else is used as a
    /// plain column name.
    #[must_use]
    pub fn parse(field: &str) -> Option<Self> {
        if field.is_empty() {
            return None;
        }
        let mut parts = field.split('.');
        Some(match (parts.next(), parts.next(), parts.next()) {
            (Some(relation), Some(column), None) => Self::Qualified {
                relation: relation.to_string(),
                column: column.to_string(),
            },
            _ => Self::Column(field.to_string()),
        })
    }
}

/// Build the `%needle%` pattern for a search value.
///
/// The value is cut at 10 000 bytes (on a char boundary) and then has its
/// LIKE wildcards escaped with [`LIKE_ESCAPE`], so the pattern itself can be
/// longer than the cut. Case is left alone; both sides are folded in SQL.
#[must_use]
pub fn contains_pattern(needle: &str) -> String {
    let mut end = needle.len().min(MAX_SEARCH_LENGTH);
    while !needle.is_char_boundary(end) {
        end -= 1;
    }
    format!("%{}%", escape_like(&needle[..end]))
}
