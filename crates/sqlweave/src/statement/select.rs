//! Declarative description of a SELECT statement.

use super::builder::StatementBuilder;
use crate::condition::Conditions;
use crate::config::BuilderConfig;
use crate::cte::RecursiveQuery;
use crate::error::BuildResult;
use crate::options::{Join, Limit, OrderBy, QueryOption, Union};

/// Everything a [`StatementBuilder`] needs, collected fluently.
///
/// Nothing is validated until [`SelectQuery::build`].
///
/// # Example
/// ```
/// use sqlweave::{Conditions, Limit, OrderBy, Predicate, SelectQuery};
///
/// let stmt = SelectQuery::new("users")
///     .columns(["id", "name"])
///     .conditions(Conditions::new().and("status", Predicate::eq("active")))
///     .order_by(OrderBy::desc("id"))
///     .limit(Limit::new(10))
///     .build()?;
///
/// assert_eq!(
///     stmt.query(),
///     "SELECT u0.id,u0.name FROM users AS u0\n WHERE u0.status = :AAA0 ORDER BY u0.id DESC LIMIT 10;"
/// );
/// # Ok::<(), sqlweave::BuildError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SelectQuery {
    pub(crate) table: String,
    pub(crate) alias: Option<String>,
    pub(crate) columns: Vec<String>,
    pub(crate) options: Vec<QueryOption>,
    pub(crate) order_by: Option<OrderBy>,
    pub(crate) limit: Option<Limit>,
    pub(crate) config: BuilderConfig,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            columns: Vec::new(),
            options: Vec::new(),
            order_by: None,
            limit: None,
            config: BuilderConfig::default(),
        }
    }

    /// Use an explicit alias for the main table instead of a generated one.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set SELECT columns. An empty list selects `alias.*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one option entry.
    pub fn option(mut self, option: impl Into<QueryOption>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Append several option entries, keeping their order.
    pub fn options(mut self, options: impl IntoIterator<Item = QueryOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn conditions(self, conditions: Conditions) -> Self {
        self.option(conditions)
    }

    pub fn join(self, join: Join) -> Self {
        self.option(join)
    }

    pub fn union(self, union: Union) -> Self {
        self.option(union)
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Wrap this SELECT as the body of `WITH RECURSIVE <name>`.
    pub fn recursive(self, name: impl Into<String>) -> RecursiveQuery {
        RecursiveQuery::new(self, name)
    }

    /// Assemble the statement.
    pub fn build(self) -> BuildResult<StatementBuilder> {
        StatementBuilder::from_query(self)
    }
}
