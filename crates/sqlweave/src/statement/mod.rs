//! SELECT statement assembly.
//!
//! A statement is described by a table, its columns and an ordered list of
//! [`QueryOption`](crate::QueryOption)s, then assembled in one pass:
//!
//! - every table gets an alias (explicit, or first letter + counter),
//! - bare columns are qualified with the alias of the table they belong to,
//! - values are replaced by `:TAG<n>` placeholders collected in a bind map.
//!
//! A JOIN switches the "current" table, so later conditions and the join's own
//! ON clause resolve against the joined alias. A UNION closes the current
//! SELECT; the options after it describe the right-hand SELECT.

mod builder;
mod context;
mod select;
mod traits;

pub use builder::{StatementBuilder, columns_alias};
pub use select::SelectQuery;
pub use traits::BuiltStatement;
