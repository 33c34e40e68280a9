//! Declarative conditions and their compilation into `WHERE` / `ON` fragments.
//!
//! A [`Conditions`] value is an ordered `column -> Predicate` map. Compiling it
//! yields one boolean expression joined by `AND`, with every literal moved out
//! into the bind map.
//!
//! # Example
//! ```
//! use sqlweave::{Conditions, Predicate};
//!
//! let filter = Conditions::new()
//!     .and("status", Predicate::in_list(["active", "trial"]))
//!     .and("created_at", Predicate::between("2018-12-01", "2018-12-06"))
//!     .and("deleted_at", Predicate::is_null());
//! assert_eq!(filter.len(), 3);
//! ```

use crate::bind::Binds;
use crate::error::{BuildError, BuildResult};
use crate::ident;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// The fixed operator vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `<>`
    Ne,
    /// `IN (list)`
    In,
    /// `NOT IN (list)`
    NotIn,
    /// `BETWEEN a AND b`
    Between,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Ne,
        Operator::In,
        Operator::NotIn,
        Operator::Between,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// The SQL token for this operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Ne => "<>",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Parse an operator token, ignoring case and surrounding whitespace.
    pub fn parse(token: &str) -> BuildResult<Self> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|op| op.as_sql() == normalized)
            .ok_or_else(|| BuildError::unknown_operator(token))
    }
}

impl FromStr for Operator {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// The right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Scalar(Value),
    List(Vec<Value>),
}

impl Operand {
    fn describe(&self) -> String {
        match self {
            Operand::None => "no operand".to_string(),
            Operand::Scalar(_) => "a single value".to_string(),
            Operand::List(vals) => format!("a list of {} values", vals.len()),
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Scalar(v)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(v: Vec<Value>) -> Self {
        Operand::List(v)
    }
}

/// One `operator + operand` test applied to a column.
///
/// With `process` off the operand is written into the SQL verbatim instead of
/// being bound; this is how column-to-column comparisons such as join keys are
/// expressed.
///
/// # Safety
/// Unprocessed operands bypass binding. Never feed user input into them.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub operator: Operator,
    pub operand: Operand,
    pub process: bool,
}

impl Predicate {
    /// Create a processed predicate from any operator/operand pair.
    ///
    /// Operand shape is checked when the statement is built, not here.
    pub fn new(operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            operator,
            operand: operand.into(),
            process: true,
        }
    }

    /// Create a predicate from an operator token such as `"NOT IN"`.
    pub fn parse(token: &str, operand: impl Into<Operand>) -> BuildResult<Self> {
        Ok(Self::new(Operator::parse(token)?, operand))
    }

    fn scalar(operator: Operator, value: impl Into<Value>) -> Self {
        Self::new(operator, Operand::Scalar(value.into()))
    }

    fn list<I, T>(operator: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::new(
            operator,
            Operand::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// column = value
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::Eq, value)
    }

    /// column <> value
    pub fn ne(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::Ne, value)
    }

    /// column > value
    pub fn gt(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::Gt, value)
    }

    /// column >= value
    pub fn gte(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::Gte, value)
    }

    /// column < value
    pub fn lt(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::Lt, value)
    }

    /// column <= value
    pub fn lte(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::Lte, value)
    }

    /// column IN (values...)
    pub fn in_list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::list(Operator::In, values)
    }

    /// column NOT IN (values...)
    pub fn not_in<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::list(Operator::NotIn, values)
    }

    /// column BETWEEN from AND to
    pub fn between(from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self::new(Operator::Between, Operand::List(vec![from.into(), to.into()]))
    }

    /// column IS NULL
    pub fn is_null() -> Self {
        Self::new(Operator::IsNull, Operand::None)
    }

    /// column IS NOT NULL
    pub fn is_not_null() -> Self {
        Self::new(Operator::IsNotNull, Operand::None)
    }

    /// Compare against another column, written verbatim: `t2.parent_id = t1.id`.
    pub fn column(operator: Operator, other: impl Into<String>) -> Self {
        Self {
            operator,
            operand: Operand::Scalar(Value::Text(other.into())),
            process: false,
        }
    }

    /// Toggle binding of the operand.
    pub fn process(mut self, process: bool) -> Self {
        self.process = process;
        self
    }

    /// Compile against an already-qualified column.
    fn compile(&self, column: &str, binds: &mut Binds) -> BuildResult<String> {
        let op = self.operator.as_sql();

        if !self.process {
            return Ok(match &self.operand {
                Operand::None => format!("{column} {op}"),
                Operand::Scalar(v) => format!("{column} {op} {v}"),
                Operand::List(vals) => {
                    let raw: Vec<String> = vals.iter().map(ToString::to_string).collect();
                    format!("{column} {op} ({})", raw.join(","))
                }
            });
        }

        match self.operator {
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte => match &self.operand {
                Operand::Scalar(v) => Ok(format!("{column} {op} {}", binds.bind(v))),
                other => Err(BuildError::invalid_operand(
                    op,
                    format!("expected a single value, got {}", other.describe()),
                )),
            },
            Operator::In | Operator::NotIn => match &self.operand {
                Operand::List(vals) if vals.is_empty() => {
                    Err(BuildError::invalid_operand(op, "list must not be empty"))
                }
                Operand::List(vals) => {
                    let placeholders = binds.bind_all(vals);
                    Ok(format!("{column} {op} ({})", placeholders.join(",")))
                }
                other => Err(BuildError::invalid_operand(
                    op,
                    format!("expected a list of values, got {}", other.describe()),
                )),
            },
            Operator::Between => match &self.operand {
                Operand::List(vals) if vals.len() == 2 => {
                    let placeholders = binds.bind_all(vals);
                    Ok(format!(
                        "{column} {op} {} AND {}",
                        placeholders[0], placeholders[1]
                    ))
                }
                other => Err(BuildError::invalid_operand(
                    op,
                    format!("expected a list of exactly two values, got {}", other.describe()),
                )),
            },
            Operator::IsNull | Operator::IsNotNull => Ok(format!("{column} {op}")),
        }
    }
}

/// An ordered `column -> Predicate` map, joined with `AND` when compiled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions(Vec<(String, Predicate)>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate for `column` (consuming builder).
    pub fn and(mut self, column: impl Into<String>, predicate: Predicate) -> Self {
        self.0.push((column.into(), predicate));
        self
    }

    /// Add a predicate for `column`.
    pub fn push(&mut self, column: impl Into<String>, predicate: Predicate) -> &mut Self {
        self.0.push((column.into(), predicate));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.0.iter().map(|(c, p)| (c.as_str(), p))
    }

    /// Compile into one `AND`-joined expression. Bare columns are qualified
    /// with `alias`.
    pub(crate) fn compile(&self, alias: &str, binds: &mut Binds) -> BuildResult<String> {
        let mut parts = Vec::with_capacity(self.0.len());
        for (column, predicate) in &self.0 {
            let column = ident::qualify(column, alias)?;
            parts.push(predicate.compile(&column, binds)?);
        }
        Ok(parts.join(" AND "))
    }
}

impl<C: Into<String>> FromIterator<(C, Predicate)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (C, Predicate)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(c, p)| (c.into(), p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::BindMap;

    fn compile(conditions: &Conditions) -> BuildResult<(String, BindMap)> {
        let mut binds = Binds::new();
        let sql = conditions.compile("u0", &mut binds)?;
        Ok((sql, binds.into_map()))
    }

    #[test]
    fn parse_accepts_vocabulary_case_insensitively() {
        assert_eq!(Operator::parse("=").unwrap(), Operator::Eq);
        assert_eq!(Operator::parse("<>").unwrap(), Operator::Ne);
        assert_eq!(Operator::parse("not in").unwrap(), Operator::NotIn);
        assert_eq!(Operator::parse(" is  NOT null ").unwrap(), Operator::IsNotNull);
        assert_eq!("between".parse::<Operator>().unwrap(), Operator::Between);
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        for token in ["~=", "!=", "LIKE", ""] {
            let err = Operator::parse(token).unwrap_err();
            assert!(err.is_unknown_operator(), "{token}");
        }
    }

    #[test]
    fn comparison_binds_one_value() {
        let (sql, binds) = compile(&Conditions::new().and("id", Predicate::gte(5))).unwrap();
        assert_eq!(sql, "u0.id >= :AAA0");
        assert_eq!(binds.get("AAA0"), Some(&Value::Int(5)));
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn in_binds_every_element() {
        let (sql, binds) =
            compile(&Conditions::new().and("id", Predicate::in_list([1, 2, 3]))).unwrap();
        assert_eq!(sql, "u0.id IN (:AAA0,:AAA1,:AAA2)");
        assert_eq!(binds.len(), 3);
        assert_eq!(binds.get("AAA2"), Some(&Value::Int(3)));
    }

    #[test]
    fn not_in_renders_operator() {
        let (sql, _) =
            compile(&Conditions::new().and("role", Predicate::not_in(["a", "b"]))).unwrap();
        assert_eq!(sql, "u0.role NOT IN (:AAA0,:AAA1)");
    }

    #[test]
    fn between_binds_two_values() {
        let (sql, binds) = compile(
            &Conditions::new().and("created_at", Predicate::between("2018-12-01", "2018-12-06")),
        )
        .unwrap();
        assert_eq!(sql, "u0.created_at BETWEEN :AAA0 AND :AAA1");
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn between_rejects_more_than_two_values() {
        let three = Predicate::new(
            Operator::Between,
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        );
        let err = compile(&Conditions::new().and("n", three)).unwrap_err();
        assert!(err.is_invalid_operand());
    }

    #[test]
    fn between_rejects_short_or_scalar_operand() {
        let one = Predicate::new(Operator::Between, vec![Value::Int(1)]);
        assert!(compile(&Conditions::new().and("n", one)).unwrap_err().is_invalid_operand());

        let scalar = Predicate::new(Operator::Between, Value::Int(1));
        assert!(compile(&Conditions::new().and("n", scalar)).unwrap_err().is_invalid_operand());
    }

    #[test]
    fn in_rejects_scalar_and_empty_list() {
        let scalar = Predicate::new(Operator::In, Value::Int(1));
        let err = compile(&Conditions::new().and("id", scalar)).unwrap_err();
        assert!(err.is_invalid_operand());

        let empty = Predicate::in_list(Vec::<i32>::new());
        let err = compile(&Conditions::new().and("id", empty)).unwrap_err();
        assert!(err.is_invalid_operand());
    }

    #[test]
    fn comparison_rejects_list() {
        let list = Predicate::new(Operator::Eq, vec![Value::Int(1)]);
        let err = compile(&Conditions::new().and("id", list)).unwrap_err();
        assert!(err.is_invalid_operand());
        assert_eq!(
            err.to_string(),
            "Invalid operand for =: expected a single value, got a list of 1 values"
        );
    }

    #[test]
    fn null_checks_consume_nothing() {
        let (sql, binds) = compile(
            &Conditions::new()
                .and("deleted_at", Predicate::is_null())
                .and("email", Predicate::is_not_null()),
        )
        .unwrap();
        assert_eq!(sql, "u0.deleted_at IS NULL AND u0.email IS NOT NULL");
        assert!(binds.is_empty());
    }

    #[test]
    fn unprocessed_operand_is_verbatim() {
        let (sql, binds) = compile(
            &Conditions::new().and("t2.parent_id", Predicate::column(Operator::Eq, "t1.id")),
        )
        .unwrap();
        assert_eq!(sql, "t2.parent_id = t1.id");
        assert!(binds.is_empty());
    }

    #[test]
    fn unprocessed_bare_column_is_still_qualified() {
        let (sql, _) = compile(
            &Conditions::new().and("parent_id", Predicate::column(Operator::Eq, "t1.id")),
        )
        .unwrap();
        assert_eq!(sql, "u0.parent_id = t1.id");
    }

    #[test]
    fn entries_join_with_and_and_keep_order() {
        let (sql, binds) = compile(
            &Conditions::new()
                .and("status", Predicate::eq("active"))
                .and("age", Predicate::gt(18))
                .and("role", Predicate::in_list(["a", "b"])),
        )
        .unwrap();
        assert_eq!(
            sql,
            "u0.status = :AAA0 AND u0.age > :AAB0 AND u0.role IN (:AAC0,:AAC1)"
        );
        assert_eq!(binds.len(), 4);
    }

    #[test]
    fn invalid_column_is_config_error() {
        let err = compile(&Conditions::new().and("id; --", Predicate::eq(1))).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn predicate_parse_reports_unknown_operator() {
        let err = Predicate::parse("~=", Value::Int(1)).unwrap_err();
        assert!(err.is_unknown_operator());
    }
}
