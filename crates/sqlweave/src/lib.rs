//! # sqlweave
//!
//! Parameterized SELECT statements from declarative descriptions.
//!
//! ## Features
//!
//! - **Values never touch the SQL text**: every literal becomes a `:TAG<n>`
//!   placeholder with an entry in the returned bind map
//! - **Automatic aliases**: each table gets a short alias and bare columns are
//!   qualified with the alias of the table they belong to
//! - **Ordered options**: conditions, joins and unions are applied in the order
//!   given; a union starts a new SELECT built from the options after it
//! - **Recursive CTEs**: wrap any statement in `WITH RECURSIVE`
//! - **Validated identifiers**: table, alias and column names are checked
//!   before they are written
//!
//! ## Example
//!
//! ```
//! use sqlweave::prelude::*;
//!
//! let stmt = SelectQuery::new("users")
//!     .columns(["id", "name"])
//!     .join(
//!         Join::new("orders")
//!             .alias("o")
//!             .side(JoinSide::Left)
//!             .on("user_id", Predicate::column(Operator::Eq, "u0.id")),
//!     )
//!     .conditions(Conditions::new().and("status", Predicate::eq("paid")))
//!     .build()?;
//!
//! assert_eq!(
//!     stmt.query(),
//!     "SELECT u0.id,u0.name FROM users AS u0\nLEFT JOIN orders AS o ON o.user_id = u0.id\n WHERE o.status = :AAA0;"
//! );
//! assert_eq!(stmt.binds()["AAA0"], Value::from("paid"));
//! # Ok::<(), sqlweave::BuildError>(())
//! ```
//!
//! The crate only produces SQL text and binds; executing them is up to the
//! caller.

pub mod bind;
pub mod condition;
pub mod config;
pub mod cte;
pub mod error;
pub mod ident;
mod json;
pub mod options;
pub mod prelude;
pub mod statement;
pub mod trace;
pub mod value;

pub use bind::BindMap;
pub use condition::{Conditions, Operand, Operator, Predicate};
pub use config::BuilderConfig;
pub use cte::{RecursiveQuery, RecursiveStatementBuilder};
pub use error::{BuildError, BuildResult};
pub use ident::{Ident, IdentPart};
pub use options::{Join, JoinSide, Limit, OrderBy, QueryOption, SortDirection, Union, UnionKind};
pub use statement::{BuiltStatement, SelectQuery, StatementBuilder, columns_alias};
pub use trace::{SqlTrace, StatementKind};
pub use value::Value;
