//! Option entries that shape a statement: joins, unions, conditions, ordering
//! and pagination.

use crate::condition::{Conditions, Predicate};
use crate::error::{BuildError, BuildResult};
use std::fmt;

/// One entry of the ordered option sequence.
///
/// Entries are applied in the order given. A JOIN switches the table that
/// later entries qualify against, and everything after a UNION describes the
/// right-hand SELECT of that union.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOption {
    Conditions(Conditions),
    Join(Join),
    Union(Union),
}

impl From<Conditions> for QueryOption {
    fn from(c: Conditions) -> Self {
        QueryOption::Conditions(c)
    }
}

impl From<Join> for QueryOption {
    fn from(j: Join) -> Self {
        QueryOption::Join(j)
    }
}

impl From<Union> for QueryOption {
    fn from(u: Union) -> Self {
        QueryOption::Union(u)
    }
}

// ==================== JOIN ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinSide {
    Left,
    Right,
    Outer,
    Inner,
    FullOuter,
}

impl JoinSide {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinSide::Left => "LEFT",
            JoinSide::Right => "RIGHT",
            JoinSide::Outer => "OUTER",
            JoinSide::Inner => "INNER",
            JoinSide::FullOuter => "FULL OUTER",
        }
    }

    /// Parse a side keyword case-insensitively. Returns `None` for anything
    /// outside `LEFT, RIGHT, OUTER, INNER, FULL OUTER`.
    pub fn parse(side: &str) -> Option<Self> {
        let normalized = side
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "LEFT" => Some(JoinSide::Left),
            "RIGHT" => Some(JoinSide::Right),
            "OUTER" => Some(JoinSide::Outer),
            "INNER" => Some(JoinSide::Inner),
            "FULL OUTER" => Some(JoinSide::FullOuter),
            _ => None,
        }
    }
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SideSpec {
    Known(JoinSide),
    Unrecognized(String),
}

/// A JOIN against another table.
///
/// # Example
/// ```
/// use sqlweave::{Join, JoinSide, Operator, Predicate};
///
/// let join = Join::new("orders")
///     .alias("o")
///     .side(JoinSide::Left)
///     .on("o.user_id", Predicate::column(Operator::Eq, "u.id"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub(crate) table: String,
    pub(crate) alias: Option<String>,
    pub(crate) side: Option<SideSpec>,
    pub(crate) conditions: Conditions,
}

impl Join {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            side: None,
            conditions: Conditions::new(),
        }
    }

    /// Use an explicit alias instead of a generated one.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn side(mut self, side: JoinSide) -> Self {
        self.side = Some(SideSpec::Known(side));
        self
    }

    /// Set the side from a keyword. Unrecognized keywords degrade to a plain
    /// `JOIN` unless the builder is configured with `strict_join_side`.
    pub fn side_name(mut self, side: &str) -> Self {
        self.side = Some(match JoinSide::parse(side) {
            Some(known) => SideSpec::Known(known),
            None => SideSpec::Unrecognized(side.to_string()),
        });
        self
    }

    /// Add an ON predicate. Bare columns qualify against the joined table.
    pub fn on(mut self, column: impl Into<String>, predicate: Predicate) -> Self {
        self.conditions.push(column, predicate);
        self
    }

    /// Replace all ON predicates.
    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }
}

// ==================== UNION ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnionKind {
    All,
    Distinct,
}

impl UnionKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            UnionKind::All => "ALL",
            UnionKind::Distinct => "DISTINCT",
        }
    }

    /// Parse `ALL` / `DISTINCT`; an empty string means a plain `UNION`.
    pub fn parse(kind: &str) -> BuildResult<Option<Self>> {
        match kind.trim().to_ascii_uppercase().as_str() {
            "" => Ok(None),
            "ALL" => Ok(Some(UnionKind::All)),
            "DISTINCT" => Ok(Some(UnionKind::Distinct)),
            other => Err(BuildError::config(format!("Unknown UNION type '{other}'"))),
        }
    }
}

/// A UNION with another SELECT.
///
/// The right-hand SELECT reads from `table`. Its columns are the union's own
/// list, or the left-hand columns, qualified with `columns_alias` (falling back
/// to the union alias). Options that follow the union entry apply to the
/// right-hand SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub(crate) kind: Option<UnionKind>,
    pub(crate) table: String,
    pub(crate) alias: Option<String>,
    pub(crate) columns: Option<Vec<String>>,
    pub(crate) columns_alias: Option<String>,
}

impl Union {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            kind: None,
            table: table.into(),
            alias: None,
            columns: None,
            columns_alias: None,
        }
    }

    /// `UNION ALL`
    pub fn all(mut self) -> Self {
        self.kind = Some(UnionKind::All);
        self
    }

    /// `UNION DISTINCT`
    pub fn distinct(mut self) -> Self {
        self.kind = Some(UnionKind::Distinct);
        self
    }

    pub fn kind(mut self, kind: Option<UnionKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Select these columns on the right-hand side instead of the left-hand ones.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Qualify right-hand columns with this alias (typically a joined table's).
    pub fn columns_alias(mut self, alias: impl Into<String>) -> Self {
        self.columns_alias = Some(alias.into());
        self
    }
}

// ==================== ORDER BY / LIMIT ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(direction: &str) -> BuildResult<Self> {
        match direction.trim().to_ascii_uppercase().as_str() {
            "" | "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(BuildError::config(format!(
                "Unknown sort direction '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

/// LIMIT with an optional OFFSET. A zero offset is not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub limit: u64,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            offset: None,
        }
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render as ` LIMIT n[ OFFSET m]`.
    pub(crate) fn to_sql(self) -> String {
        match self.offset {
            Some(offset) if offset > 0 => format!(" LIMIT {} OFFSET {offset}", self.limit),
            _ => format!(" LIMIT {}", self.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_side_parses_known_keywords() {
        assert_eq!(JoinSide::parse("left"), Some(JoinSide::Left));
        assert_eq!(JoinSide::parse("Full  Outer"), Some(JoinSide::FullOuter));
        assert_eq!(JoinSide::parse("BOGUS"), None);
    }

    #[test]
    fn side_name_keeps_unrecognized_input() {
        let join = Join::new("orders").side_name("BOGUS");
        assert_eq!(join.side, Some(SideSpec::Unrecognized("BOGUS".to_string())));

        let join = Join::new("orders").side_name("inner");
        assert_eq!(join.side, Some(SideSpec::Known(JoinSide::Inner)));
    }

    #[test]
    fn union_kind_parse() {
        assert_eq!(UnionKind::parse("all").unwrap(), Some(UnionKind::All));
        assert_eq!(UnionKind::parse("").unwrap(), None);
        assert!(UnionKind::parse("SOME").unwrap_err().is_config());
    }

    #[test]
    fn sort_direction_parse() {
        assert_eq!(SortDirection::parse("desc").unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::parse("").unwrap(), SortDirection::Asc);
        assert!(SortDirection::parse("sideways").is_err());
    }

    #[test]
    fn limit_skips_zero_offset() {
        assert_eq!(Limit::new(10).to_sql(), " LIMIT 10");
        assert_eq!(Limit::new(10).offset(0).to_sql(), " LIMIT 10");
        assert_eq!(Limit::new(10).offset(20).to_sql(), " LIMIT 10 OFFSET 20");
    }
}
