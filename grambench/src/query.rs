//! Per-backend query-string construction.
//!
//! Both builders are pure: identical inputs always yield identical output
//! sequences, one command per search word, input order preserved.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The logical operation issued against both backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Fetch matching primary keys, sorted and paginated.
    Search,
    /// Count matching documents.
    Count,
}

impl FromStr for QueryKind {
    type Err = ParseQueryKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(Self::Search),
            "count" => Ok(Self::Count),
            other => Err(ParseQueryKindError(other.to_string())),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Count => write!(f, "count"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown query type `{0}` (expected `search` or `count`)")]
pub struct ParseQueryKindError(String);

/// Build MygramDB protocol commands, one per word.
pub fn mygramdb_queries(
    table: &str,
    words: &[String],
    kind: QueryKind,
    limit: u32,
    offset: u32,
) -> Vec<String> {
    words
        .iter()
        .map(|word| match kind {
            QueryKind::Search if offset > 0 => {
                format!("SEARCH {table} {word} SORT id ASC LIMIT {offset},{limit}")
            }
            QueryKind::Search => format!("SEARCH {table} {word} SORT id ASC LIMIT {limit}"),
            QueryKind::Count => format!("COUNT {table} {word}"),
        })
        .collect()
}

/// Build MySQL FULLTEXT statements, one per word.
pub fn mysql_queries(
    table: &str,
    column: &str,
    words: &[String],
    kind: QueryKind,
    limit: u32,
    offset: u32,
) -> Vec<String> {
    words
        .iter()
        .map(|word| {
            let match_clause = format!("MATCH({column}) AGAINST('{word}' IN BOOLEAN MODE)");
            match kind {
                QueryKind::Search => format!(
                    "SELECT id FROM {table} WHERE enabled=1 AND {match_clause} \
                     ORDER BY id LIMIT {offset},{limit}"
                ),
                QueryKind::Count => {
                    format!("SELECT COUNT(*) FROM {table} WHERE enabled=1 AND {match_clause}")
                }
            }
        })
        .collect()
}
