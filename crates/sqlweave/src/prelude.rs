//! Convenient imports for typical `sqlweave` usage.
//!
//! ```
//! use sqlweave::prelude::*;
//! ```

pub use crate::{BuildError, BuildResult, BuiltStatement, Conditions, Operator, Predicate, Value};
pub use crate::{Join, JoinSide, Limit, OrderBy, QueryOption, Union};
pub use crate::{RecursiveQuery, RecursiveStatementBuilder, SelectQuery, StatementBuilder};
