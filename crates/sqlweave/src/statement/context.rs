//! Assembly state threaded through the SELECT / JOIN / UNION steps.

use crate::error::BuildResult;
use crate::ident::{self, Ident, IdentPart};
use crate::options::QueryOption;
use std::collections::HashSet;

/// The table currently being assembled against.
///
/// JOIN and UNION never mutate a context; they derive the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssemblyContext {
    pub(crate) table: String,
    pub(crate) alias: String,
    pub(crate) columns: Vec<String>,
}

impl AssemblyContext {
    pub(crate) fn new(table: String, alias: String, columns: Vec<String>) -> Self {
        Self {
            table,
            alias,
            columns,
        }
    }

    /// Context for a joined table; columns carry over unchanged.
    pub(crate) fn joined(&self, table: String, alias: String) -> Self {
        Self {
            table,
            alias,
            columns: self.columns.clone(),
        }
    }

    /// Comma-separated column list qualified with this context's alias.
    pub(crate) fn select_list(&self) -> BuildResult<String> {
        if self.columns.is_empty() {
            return Ok(format!("{}.*", self.alias));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| ident::qualify(c, &self.alias))
            .collect::<BuildResult<Vec<_>>>()?;
        Ok(columns.join(","))
    }

    /// `SELECT <columns> FROM <table> AS <alias>`
    pub(crate) fn select_head(&self) -> BuildResult<String> {
        Ok(format!(
            "SELECT {} FROM {} AS {}",
            self.select_list()?,
            self.table,
            self.alias
        ))
    }
}

/// Hands out table aliases for one statement: first letter of the table name
/// plus a counter (`users` -> `u0`, `orders` -> `o1`).
///
/// Explicit aliases found in the options are reserved up front so a generated
/// alias never shadows one the caller chose. Unquoted aliases are compared
/// case-insensitively, as SQL folds them.
#[derive(Debug, Default)]
pub(crate) struct AliasGenerator {
    next: usize,
    taken: HashSet<String>,
}

impl AliasGenerator {
    pub(crate) fn new(options: &[QueryOption]) -> Self {
        let taken = options
            .iter()
            .filter_map(|option| match option {
                QueryOption::Join(join) => join.alias.as_deref(),
                QueryOption::Union(union) => union.alias.as_deref(),
                QueryOption::Conditions(_) => None,
            })
            .map(alias_key)
            .collect();
        Self { next: 0, taken }
    }

    pub(crate) fn reserve(&mut self, alias: &str) {
        self.taken.insert(alias_key(alias));
    }

    pub(crate) fn allocate(&mut self, table: &Ident) -> String {
        let initial = table.initial();
        loop {
            let candidate = format!("{initial}{}", self.next);
            self.next += 1;
            if self.taken.insert(alias_key(&candidate)) {
                return candidate;
            }
        }
    }
}

/// Comparison key for an alias: unquoted names fold to lowercase, quoted
/// names keep their exact spelling.
fn alias_key(alias: &str) -> String {
    match Ident::parse(alias).map(|ident| ident.parts) {
        Ok(parts) => match parts.as_slice() {
            [IdentPart::Quoted(name)] => name.clone(),
            [IdentPart::Unquoted(name)] => name.to_ascii_lowercase(),
            _ => alias.to_ascii_lowercase(),
        },
        Err(_) => alias.to_ascii_lowercase(),
    }
}
