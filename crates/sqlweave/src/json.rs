//! Decoding statement descriptions from JSON.
//!
//! ```json
//! {
//!   "table": "users",
//!   "columns": ["id", "name"],
//!   "options": [
//!     {"CONDITIONS": {"status": {"=": "active"}, "age": {"BETWEEN": [18, 65]}}},
//!     {"JOIN": {"table": "orders", "alias": "o", "side": "LEFT",
//!               "conditions": {"user_id": {"=": "u0.id", "process": false}}}},
//!     {"UNION": {"type": "ALL", "table": "archived_users", "alias": "a"}}
//!   ],
//!   "order_by": {"column": "id", "direction": "DESC"},
//!   "limit": {"limit": 10, "offset": 20}
//! }
//! ```
//!
//! Option tags are matched case-insensitively; unknown tags are skipped. A
//! predicate is either `{"<OP>": operand, "process": bool}` or `["<OP>",
//! operand]`. Array operands become lists, `null` means no operand.

use crate::condition::{Conditions, Operand, Predicate};
use crate::cte::{RecursiveQuery, RecursiveStatementBuilder};
use crate::error::{BuildError, BuildResult};
use crate::options::{Join, Limit, OrderBy, QueryOption, SortDirection, Union, UnionKind};
use crate::statement::{SelectQuery, StatementBuilder};
use crate::value::Value;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Deserialize)]
struct RawStatement {
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    columns: Option<Vec<String>>,
    #[serde(default)]
    options: Vec<JsonValue>,
    #[serde(default, alias = "orderBy")]
    order_by: Option<RawOrderBy>,
    #[serde(default)]
    limit: Option<RawLimit>,
    #[serde(default, alias = "recursionName")]
    recursion_name: Option<String>,
    #[serde(default, alias = "recursionOrderBy")]
    recursion_order_by: Option<RawOrderBy>,
    #[serde(default, alias = "recursionLimit")]
    recursion_limit: Option<RawLimit>,
}

#[derive(Debug, Deserialize)]
struct RawOrderBy {
    column: String,
    #[serde(default)]
    direction: String,
}

impl RawOrderBy {
    fn decode(self) -> BuildResult<OrderBy> {
        Ok(OrderBy::new(self.column, SortDirection::parse(&self.direction)?))
    }
}

#[derive(Debug, Deserialize)]
struct RawLimit {
    limit: u64,
    #[serde(default)]
    offset: Option<u64>,
}

impl From<RawLimit> for Limit {
    fn from(raw: RawLimit) -> Self {
        Limit {
            limit: raw.limit,
            offset: raw.offset,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawJoin {
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    conditions: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct RawUnion {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    columns: Option<Vec<String>>,
    #[serde(default, alias = "columnsAlias")]
    columns_alias: Option<String>,
}

/// Empty strings count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawStatement {
    fn parse(value: &JsonValue) -> BuildResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    fn select(&mut self) -> BuildResult<SelectQuery> {
        let mut query = SelectQuery::new(self.table.take().unwrap_or_default())
            .columns(self.columns.take().unwrap_or_default())
            .options(decode_options(&self.options)?);
        if let Some(order_by) = self.order_by.take() {
            query = query.order_by(order_by.decode()?);
        }
        if let Some(limit) = self.limit.take() {
            query = query.limit(limit.into());
        }
        Ok(query)
    }
}

fn decode_options(entries: &[JsonValue]) -> BuildResult<Vec<QueryOption>> {
    let mut options = Vec::with_capacity(entries.len());
    for entry in entries {
        let JsonValue::Object(map) = entry else {
            return Err(BuildError::config(format!(
                "Option entries must be objects, got {entry}"
            )));
        };
        for (tag, body) in map {
            match tag.to_ascii_uppercase().as_str() {
                "CONDITIONS" => options.push(decode_conditions(body)?.into()),
                "JOIN" => options.push(decode_join(body)?.into()),
                "UNION" => options.push(decode_union(body)?.into()),
                _ => tracing::debug!(target: "sqlweave", tag = %tag, "ignoring unknown option"),
            }
        }
    }
    Ok(options)
}

fn decode_conditions(body: &JsonValue) -> BuildResult<Conditions> {
    match body {
        JsonValue::Null => Ok(Conditions::new()),
        JsonValue::Object(map) => {
            let mut conditions = Conditions::new();
            for (column, predicate) in map {
                conditions.push(column.as_str(), decode_predicate(column, predicate)?);
            }
            Ok(conditions)
        }
        other => Err(BuildError::config(format!(
            "CONDITIONS must be an object, got {other}"
        ))),
    }
}

fn decode_predicate(column: &str, body: &JsonValue) -> BuildResult<Predicate> {
    match body {
        JsonValue::Object(map) => decode_predicate_object(column, map),
        JsonValue::Array(items) => match items.as_slice() {
            [JsonValue::String(op)] => Predicate::parse(op, Operand::None),
            [JsonValue::String(op), operand] => Predicate::parse(op, decode_operand(operand)),
            _ => Err(BuildError::config(format!(
                "Predicate for '{column}' must be [operator, operand]"
            ))),
        },
        other => Err(BuildError::config(format!(
            "Predicate for '{column}' must be an object, got {other}"
        ))),
    }
}

fn decode_predicate_object(column: &str, map: &Map<String, JsonValue>) -> BuildResult<Predicate> {
    let process = match map.get("process") {
        None => true,
        Some(JsonValue::Bool(process)) => *process,
        Some(other) => {
            return Err(BuildError::config(format!(
                "'process' for '{column}' must be a boolean, got {other}"
            )));
        }
    };
    let mut operators = map.iter().filter(|(key, _)| key.as_str() != "process");
    let (op, operand) = operators
        .next()
        .ok_or_else(|| BuildError::config(format!("Predicate for '{column}' has no operator")))?;
    if operators.next().is_some() {
        return Err(BuildError::config(format!(
            "Predicate for '{column}' has more than one operator"
        )));
    }
    Ok(Predicate::parse(op, decode_operand(operand))?.process(process))
}

fn decode_operand(value: &JsonValue) -> Operand {
    match value {
        JsonValue::Null => Operand::None,
        JsonValue::Array(items) => {
            Operand::List(items.iter().cloned().map(Value::from_json).collect())
        }
        other => Operand::Scalar(Value::from_json(other.clone())),
    }
}

fn decode_join(body: &JsonValue) -> BuildResult<Join> {
    let raw: RawJoin = serde_json::from_value(body.clone())?;
    let mut join = Join::new(raw.table.unwrap_or_default());
    if let Some(alias) = non_empty(raw.alias) {
        join = join.alias(alias);
    }
    if let Some(side) = non_empty(raw.side) {
        join = join.side_name(&side);
    }
    if let Some(conditions) = &raw.conditions {
        join = join.conditions(decode_conditions(conditions)?);
    }
    Ok(join)
}

fn decode_union(body: &JsonValue) -> BuildResult<Union> {
    match body {
        JsonValue::Null => return Err(BuildError::config("UNION description is missing")),
        JsonValue::Object(map) if map.is_empty() => {
            return Err(BuildError::config("UNION description is empty"));
        }
        _ => {}
    }
    let raw: RawUnion = serde_json::from_value(body.clone())?;
    let kind = match non_empty(raw.kind) {
        Some(kind) => UnionKind::parse(&kind)?,
        None => None,
    };
    let mut union = Union::new(raw.table.unwrap_or_default()).kind(kind);
    if let Some(alias) = non_empty(raw.alias) {
        union = union.alias(alias);
    }
    if let Some(columns) = raw.columns {
        union = union.columns(columns);
    }
    if let Some(columns_alias) = non_empty(raw.columns_alias) {
        union = union.columns_alias(columns_alias);
    }
    Ok(union)
}

impl SelectQuery {
    /// Decode a description from JSON. Settings stay at their defaults.
    pub fn from_json(value: &JsonValue) -> BuildResult<Self> {
        RawStatement::parse(value)?.select()
    }
}

impl RecursiveQuery {
    /// Decode a description from JSON, including the `recursion_*` keys.
    pub fn from_json(value: &JsonValue) -> BuildResult<Self> {
        let mut raw = RawStatement::parse(value)?;
        let select = raw.select()?;
        let mut query = RecursiveQuery::new(select, raw.recursion_name.take().unwrap_or_default());
        if let Some(order_by) = raw.recursion_order_by.take() {
            query = query.order_by(order_by.decode()?);
        }
        if let Some(limit) = raw.recursion_limit.take() {
            query = query.limit(limit.into());
        }
        Ok(query)
    }
}

impl StatementBuilder {
    pub fn from_json(value: &JsonValue) -> BuildResult<Self> {
        SelectQuery::from_json(value)?.build()
    }

    pub fn from_json_str(json: &str) -> BuildResult<Self> {
        Self::from_json(&serde_json::from_str(json)?)
    }
}

impl RecursiveStatementBuilder {
    pub fn from_json(value: &JsonValue) -> BuildResult<Self> {
        RecursiveQuery::from_json(value)?.build()
    }

    pub fn from_json_str(json: &str) -> BuildResult<Self> {
        Self::from_json(&serde_json::from_str(json)?)
    }
}
