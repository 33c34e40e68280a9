//! Recursive CTE (`WITH RECURSIVE`) statements.
//!
//! The CTE body is an ordinary [`SelectQuery`]: its anchor SELECT, then a
//! [`Union`](crate::Union) whose following options describe the recursive
//! member, typically joining back onto the CTE name.
//!
//! # Example
//! ```
//! use sqlweave::{Conditions, Join, JoinSide, Operator, Predicate, SelectQuery, Union};
//!
//! let tree = SelectQuery::new("categories")
//!     .columns(["id", "parent_id"])
//!     .conditions(Conditions::new().and("id", Predicate::eq(1)))
//!     .union(Union::new("categories").all().alias("c1"))
//!     .join(
//!         Join::new("tree")
//!             .alias("t")
//!             .side(JoinSide::Inner)
//!             .on("t.id", Predicate::column(Operator::Eq, "c1.parent_id")),
//!     )
//!     .recursive("tree")
//!     .build()?;
//!
//! assert_eq!(
//!     tree.query(),
//!     "WITH RECURSIVE tree (id,parent_id)\n  AS (SELECT c0.id,c0.parent_id FROM categories AS c0\n WHERE c0.id = :AAA0\nUNION ALL SELECT c1.id,c1.parent_id FROM categories AS c1\nINNER JOIN tree AS t ON t.id = c1.parent_id)\nSELECT * FROM tree;"
//! );
//! # Ok::<(), sqlweave::BuildError>(())
//! ```

use crate::bind::BindMap;
use crate::error::{BuildError, BuildResult};
use crate::ident::{self, Ident};
use crate::options::{Limit, OrderBy, QueryOption};
use crate::statement::{BuiltStatement, SelectQuery, StatementBuilder};
use crate::trace::StatementKind;
use std::fmt;

/// Declarative description of a recursive statement.
///
/// ORDER BY and LIMIT set here apply to the outer `SELECT * FROM <name>`; the
/// wrapped [`SelectQuery`] must not carry its own.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct RecursiveQuery {
    pub(crate) select: SelectQuery,
    pub(crate) name: String,
    pub(crate) order_by: Option<OrderBy>,
    pub(crate) limit: Option<Limit>,
}

impl RecursiveQuery {
    pub fn new(select: SelectQuery, name: impl Into<String>) -> Self {
        Self {
            select,
            name: name.into(),
            order_by: None,
            limit: None,
        }
    }

    /// Order the CTE result. The column is used as-is (no alias).
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> BuildResult<RecursiveStatementBuilder> {
        RecursiveStatementBuilder::from_query(self)
    }
}

/// A finished `WITH RECURSIVE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursiveStatementBuilder {
    name: String,
    base: StatementBuilder,
    query: String,
    binds: BindMap,
}

impl RecursiveStatementBuilder {
    /// Assemble from positional inputs. `options` describe the CTE body, the
    /// `recursion_*` arguments the outer SELECT.
    pub fn new<I, S>(
        table: impl Into<String>,
        columns: I,
        recursion_name: impl Into<String>,
        options: Vec<QueryOption>,
        recursion_order_by: Option<OrderBy>,
        recursion_limit: Option<Limit>,
    ) -> BuildResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let select = SelectQuery::new(table).columns(columns).options(options);
        let mut query = RecursiveQuery::new(select, recursion_name);
        query.order_by = recursion_order_by;
        query.limit = recursion_limit;
        Self::from_query(query)
    }

    pub fn from_query(query: RecursiveQuery) -> BuildResult<Self> {
        let RecursiveQuery {
            select,
            name,
            order_by,
            limit,
        } = query;

        if name.trim().is_empty() {
            return Err(BuildError::config("Recursion name should be specified"));
        }
        let name = ident::alias_name(&name)?;
        if select.order_by.is_some() || select.limit.is_some() {
            return Err(BuildError::config(
                "ORDER BY / LIMIT of a recursive statement belong on the RecursiveQuery",
            ));
        }

        let trace = select.config.trace.clone();
        let base = StatementBuilder::fragment(select)?;

        let mut sql = format!("WITH RECURSIVE {name}");
        if let Some(columns) = cte_columns(base.columns())? {
            sql.push_str(&format!(" ({columns})"));
        }
        sql.push_str(&format!("\n  AS ({})\nSELECT * FROM {name}", base.query()));

        if let Some(order) = &order_by {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                Ident::parse_column(&order.column)?.to_sql(),
                order.direction.as_sql()
            ));
        }
        if let Some(limit) = limit {
            sql.push_str(&limit.to_sql());
        }
        sql.push(';');

        let binds = base.binds().clone();
        if let Some(trace) = &trace {
            trace.emit(StatementKind::Recursive, &name, &sql, binds.len());
        }

        Ok(Self {
            name,
            base,
            query: sql,
            binds,
        })
    }

    /// The CTE name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The assembled CTE body, without a terminating `;`.
    pub fn base(&self) -> &StatementBuilder {
        &self.base
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn binds(&self) -> &BindMap {
        &self.binds
    }

    pub fn into_parts(self) -> (String, BindMap) {
        (self.query, self.binds)
    }
}

/// Bare column names for the CTE column list. `None` when there are no
/// columns or one of them is a wildcard.
fn cte_columns(columns: &[String]) -> BuildResult<Option<String>> {
    let bare = columns
        .iter()
        .map(|column| ident::bare_column(column))
        .collect::<BuildResult<Vec<_>>>()?;
    if bare.is_empty() || bare.iter().any(|column| column == "*") {
        return Ok(None);
    }
    Ok(Some(bare.join(",")))
}

impl BuiltStatement for RecursiveStatementBuilder {
    fn sql(&self) -> &str {
        &self.query
    }

    fn bind_map(&self) -> &BindMap {
        &self.binds
    }
}

impl fmt::Display for RecursiveStatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}
