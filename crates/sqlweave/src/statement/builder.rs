use super::context::{AliasGenerator, AssemblyContext};
use super::select::SelectQuery;
use super::traits::BuiltStatement;
use crate::bind::{BindMap, Binds};
use crate::config::BuilderConfig;
use crate::error::{BuildError, BuildResult};
use crate::ident::{self, Ident};
use crate::options::{Join, Limit, OrderBy, QueryOption, SideSpec, Union};
use crate::trace::StatementKind;
use std::fmt;

/// A finished, parameterized SELECT statement.
///
/// Built eagerly: the constructor validates every input and assembles the SQL
/// text and bind map before returning.
///
/// # Example
/// ```
/// use sqlweave::{Conditions, Predicate, StatementBuilder, Value};
///
/// let stmt = StatementBuilder::new(
///     "users",
///     ["id", "name"],
///     vec![Conditions::new().and("id", Predicate::eq(5)).into()],
///     None,
///     None,
/// )?;
///
/// assert_eq!(stmt.query(), "SELECT u0.id,u0.name FROM users AS u0\n WHERE u0.id = :AAA0;");
/// assert_eq!(stmt.binds().get("AAA0"), Some(&Value::Int(5)));
/// # Ok::<(), sqlweave::BuildError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StatementBuilder {
    table: String,
    alias: String,
    columns: Vec<String>,
    query: String,
    binds: BindMap,
}

impl StatementBuilder {
    /// Assemble a statement from positional inputs.
    ///
    /// `options` is applied in order; entries after a [`Union`] describe the
    /// right-hand SELECT of that union.
    pub fn new<I, S>(
        table: impl Into<String>,
        columns: I,
        options: Vec<QueryOption>,
        order_by: Option<OrderBy>,
        limit: Option<Limit>,
    ) -> BuildResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(
            table,
            columns,
            options,
            order_by,
            limit,
            BuilderConfig::default(),
        )
    }

    /// Like [`StatementBuilder::new`] with explicit settings.
    pub fn with_config<I, S>(
        table: impl Into<String>,
        columns: I,
        options: Vec<QueryOption>,
        order_by: Option<OrderBy>,
        limit: Option<Limit>,
        config: BuilderConfig,
    ) -> BuildResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut query = SelectQuery::new(table)
            .columns(columns)
            .options(options)
            .config(config);
        query.order_by = order_by;
        query.limit = limit;
        Self::from_query(query)
    }

    /// Assemble a complete, `;`-terminated statement.
    pub fn from_query(query: SelectQuery) -> BuildResult<Self> {
        Self::assemble(query, true)
    }

    /// Assemble without the trailing `;` and without tracing, for embedding in
    /// a larger statement.
    pub(crate) fn fragment(query: SelectQuery) -> BuildResult<Self> {
        Self::assemble(query, false)
    }

    fn assemble(query: SelectQuery, terminate: bool) -> BuildResult<Self> {
        let SelectQuery {
            table,
            alias,
            columns,
            options,
            order_by,
            limit,
            config,
        } = query;

        if table.trim().is_empty() {
            return Err(BuildError::config("Table should be specified"));
        }
        let table_ident = Ident::parse(&table)?;

        let mut assembler = Assembler::new(&config, &options);
        let alias = match alias {
            Some(alias) => {
                let alias = ident::alias_name(&alias)?;
                assembler.aliases.reserve(&alias);
                alias
            }
            None => assembler.aliases.allocate(&table_ident),
        };

        let ctx = AssemblyContext::new(table_ident.to_sql(), alias, columns);
        let mut sql = assembler.select(&ctx, &options)?;

        if let Some(order) = &order_by {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                ident::qualify(&order.column, &ctx.alias)?,
                order.direction.as_sql()
            ));
        }
        if let Some(limit) = limit {
            sql.push_str(&limit.to_sql());
        }
        if terminate {
            sql.push(';');
            if let Some(trace) = &config.trace {
                trace.emit(StatementKind::Select, &ctx.table, &sql, assembler.binds.len());
            }
        }
        let binds = assembler.binds.into_map();

        let AssemblyContext {
            table,
            alias,
            columns,
        } = ctx;
        Ok(Self {
            table,
            alias,
            columns,
            query: sql,
            binds,
        })
    }

    /// Canonical name of the main table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Alias of the main table (explicit or generated).
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The SELECT columns as given by the caller.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn binds(&self) -> &BindMap {
        &self.binds
    }

    /// Consume the statement, returning the SQL text and its binds.
    pub fn into_parts(self) -> (String, BindMap) {
        (self.query, self.binds)
    }
}

impl BuiltStatement for StatementBuilder {
    fn sql(&self) -> &str {
        &self.query
    }

    fn bind_map(&self) -> &BindMap {
        &self.binds
    }
}

impl fmt::Display for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// Prefix every column with `alias.`.
///
/// ```
/// assert_eq!(sqlweave::columns_alias(&["id", "name"], "t"), ["t.id", "t.name"]);
/// ```
pub fn columns_alias<S: AsRef<str>>(columns: &[S], alias: &str) -> Vec<String> {
    columns
        .iter()
        .map(|column| format!("{alias}.{}", column.as_ref()))
        .collect()
}

/// Per-statement state: alias counter and placeholder allocator.
struct Assembler<'a> {
    config: &'a BuilderConfig,
    aliases: AliasGenerator,
    binds: Binds,
}

impl<'a> Assembler<'a> {
    fn new(config: &'a BuilderConfig, options: &[QueryOption]) -> Self {
        Self {
            config,
            aliases: AliasGenerator::new(options),
            binds: Binds::new(),
        }
    }

    /// One SELECT: head, joins, WHERE, then an optional UNION tail built from
    /// the remaining options.
    fn select(&mut self, ctx: &AssemblyContext, options: &[QueryOption]) -> BuildResult<String> {
        let mut sql = ctx.select_head()?;
        let mut current = ctx.clone();
        let mut filters = Vec::new();
        let mut tail = String::new();

        for (i, option) in options.iter().enumerate() {
            match option {
                QueryOption::Join(join) => {
                    let (fragment, next) = self.join(&current, join)?;
                    sql.push_str(&fragment);
                    current = next;
                }
                QueryOption::Conditions(conditions) => {
                    if !conditions.is_empty() {
                        filters.push(conditions.compile(&current.alias, &mut self.binds)?);
                    }
                }
                QueryOption::Union(union) => {
                    let (keyword, next) = self.union(&current, union)?;
                    let rhs = self.select(&next, &options[i + 1..])?;
                    tail = format!("\n{keyword} {rhs}");
                    break;
                }
            }
        }

        if !filters.is_empty() {
            sql.push_str("\n WHERE ");
            sql.push_str(&filters.join(" AND "));
        }
        sql.push_str(&tail);
        Ok(sql)
    }

    fn join(
        &mut self,
        ctx: &AssemblyContext,
        join: &Join,
    ) -> BuildResult<(String, AssemblyContext)> {
        if join.table.trim().is_empty() {
            return Err(BuildError::config("JOIN table should be specified"));
        }
        let table = Ident::parse(&join.table)?;
        let alias = match &join.alias {
            Some(alias) => ident::alias_name(alias)?,
            None => self.aliases.allocate(&table),
        };

        let side = match &join.side {
            Some(SideSpec::Known(side)) => Some(*side),
            Some(SideSpec::Unrecognized(name)) if self.config.strict_join_side => {
                return Err(BuildError::config(format!("Unknown JOIN side '{name}'")));
            }
            Some(SideSpec::Unrecognized(name)) => {
                tracing::debug!(
                    target: "sqlweave",
                    side = %name,
                    table = %join.table,
                    "unrecognized join side dropped"
                );
                None
            }
            None => None,
        };

        let next = ctx.joined(table.to_sql(), alias);
        let mut sql = String::from("\n");
        if let Some(side) = side {
            sql.push_str(side.as_sql());
            sql.push(' ');
        }
        sql.push_str(&format!("JOIN {} AS {}", next.table, next.alias));
        if !join.conditions.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&join.conditions.compile(&next.alias, &mut self.binds)?);
        }
        Ok((sql, next))
    }

    /// Resolve the UNION keyword and the context of its right-hand SELECT.
    fn union(
        &mut self,
        ctx: &AssemblyContext,
        union: &Union,
    ) -> BuildResult<(String, AssemblyContext)> {
        if union.table.trim().is_empty() {
            return Err(BuildError::config("UNION table should be specified"));
        }
        let table = Ident::parse(&union.table)?;
        let alias = match &union.alias {
            Some(alias) => ident::alias_name(alias)?,
            None => self.aliases.allocate(&table),
        };
        let qualifier = match &union.columns_alias {
            Some(columns_alias) => ident::alias_name(columns_alias)?,
            None => alias.clone(),
        };

        let mut columns = match &union.columns {
            Some(columns) => columns
                .iter()
                .map(|column| ident::qualify(column, &qualifier))
                .collect::<BuildResult<Vec<_>>>()?,
            None => {
                let bare = ctx
                    .columns
                    .iter()
                    .map(|column| ident::bare_column(column))
                    .collect::<BuildResult<Vec<_>>>()?;
                columns_alias(&bare, &qualifier)
            }
        };
        if columns.is_empty() {
            columns.push(format!("{qualifier}.*"));
        }

        let keyword = match union.kind {
            Some(kind) => format!("UNION {}", kind.as_sql()),
            None => "UNION".to_string(),
        };
        Ok((keyword, AssemblyContext::new(table.to_sql(), alias, columns)))
    }
}
