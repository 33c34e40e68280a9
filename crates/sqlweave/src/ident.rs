//! SQL identifier handling.
//!
//! Table names, aliases, and columns flow into the generated SQL text verbatim
//! (identifiers cannot be bound), so each one is parsed into an [`Ident`] first.
//!
//! - Unquoted parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts allow any characters except NUL and escape `"` as `""`
//! - Column references may end in `*` (`t2.*`)
//!
//! # Example
//! ```
//! use sqlweave::Ident;
//!
//! let col = Ident::parse_column("u0.name")?;
//! assert!(col.is_qualified());
//! assert_eq!(col.bare(), "name");
//! # Ok::<(), sqlweave::BuildError>(())
//! ```

use crate::error::{BuildError, BuildResult};

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Unquoted identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
    /// Trailing `*` of a column reference.
    Wildcard,
}

impl IdentPart {
    fn write_sql(&self, out: &mut String) {
        match self {
            IdentPart::Unquoted(s) => out.push_str(s),
            IdentPart::Quoted(s) => {
                out.push('"');
                for ch in s.chars() {
                    if ch == '"' {
                        out.push('"');
                        out.push('"');
                    } else {
                        out.push(ch);
                    }
                }
                out.push('"');
            }
            IdentPart::Wildcard => out.push('*'),
        }
    }
}

/// A SQL identifier (table, alias, or column reference).
///
/// Supports dotted notation (e.g., `alias.column`) and quoted identifiers
/// (e.g., `"CamelCase"."User"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse a table or alias identifier, supporting dotted and quoted forms.
    ///
    /// - Dotted: `schema.table`
    /// - Quoted: `"CamelCase"."UserTable"`
    /// - Mixed: `public."UserTable"`
    pub fn parse(s: &str) -> BuildResult<Self> {
        Self::parse_inner(s, false)
    }

    /// Parse a column reference. Same rules as [`Ident::parse`], except the
    /// last part may be `*`.
    pub fn parse_column(s: &str) -> BuildResult<Self> {
        Self::parse_inner(s, true)
    }

    fn parse_inner(s: &str, allow_wildcard: bool) -> BuildResult<Self> {
        if s.is_empty() {
            return Err(BuildError::config("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(BuildError::config("Identifier cannot contain NUL character"));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if parts.last() == Some(&IdentPart::Wildcard) {
                return Err(BuildError::config(format!(
                    "'*' must be the last part of '{s}'"
                )));
            }

            // Consume '.' between parts (but require there is a next part).
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(BuildError::config(format!(
                                "Trailing '.' in identifier '{s}'"
                            )));
                        }
                    }
                    Some(c) => {
                        return Err(BuildError::config(format!(
                            "Expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&'*') {
                if !allow_wildcard {
                    return Err(BuildError::config(format!(
                        "Wildcard not allowed in identifier '{s}'"
                    )));
                }
                chars.next();
                parts.push(IdentPart::Wildcard);
                continue;
            }

            // Quoted identifier part.
            if chars.peek() == Some(&'"') {
                chars.next(); // opening quote
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('"') => {
                            // Escaped quote: ""
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                name.push('"');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(BuildError::config(format!(
                                "Unclosed quoted identifier in '{s}'"
                            )));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(BuildError::config("Empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            // Unquoted identifier part.
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                if name.is_empty() {
                    // First char: letter or underscore.
                    if c == '_' || c.is_ascii_alphabetic() {
                        name.push(c);
                        chars.next();
                    } else {
                        return Err(BuildError::config(format!(
                            "Invalid identifier start character '{c}' in '{s}'"
                        )));
                    }
                } else if c == '_' || c == '$' || c.is_ascii_alphanumeric() {
                    name.push(c);
                    chars.next();
                } else {
                    return Err(BuildError::config(format!(
                        "Invalid character '{c}' in identifier '{s}'"
                    )));
                }
            }
            if name.is_empty() {
                return Err(BuildError::config(format!("Empty identifier segment in '{s}'")));
            }
            parts.push(IdentPart::Unquoted(name));
        }

        if parts.is_empty() {
            return Err(BuildError::config("Empty identifier"));
        }

        Ok(Self { parts })
    }

    /// Whether the identifier already names its owner (`alias.column`).
    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    /// The last part only, with any qualification removed.
    pub fn bare(&self) -> String {
        let mut out = String::new();
        if let Some(last) = self.parts.last() {
            last.write_sql(&mut out);
        }
        out
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            part.write_sql(out);
        }
    }

    /// First ASCII letter of the last part, lowercased; used to derive aliases.
    pub(crate) fn initial(&self) -> char {
        let name = match self.parts.last() {
            Some(IdentPart::Unquoted(s)) | Some(IdentPart::Quoted(s)) => s.as_str(),
            _ => "",
        };
        name.chars()
            .find(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .unwrap_or('t')
    }
}

/// Validate an alias (or CTE name): a single identifier part.
pub(crate) fn alias_name(name: &str) -> BuildResult<String> {
    let ident = Ident::parse(name)?;
    if ident.is_qualified() {
        return Err(BuildError::config(format!(
            "Alias '{name}' must be a single identifier"
        )));
    }
    Ok(ident.to_sql())
}

/// Qualify a column with `alias` unless it already carries a qualifier.
pub(crate) fn qualify(column: &str, alias: &str) -> BuildResult<String> {
    let ident = Ident::parse_column(column)?;
    if ident.is_qualified() {
        return Ok(ident.to_sql());
    }
    Ok(format!("{alias}.{}", ident.to_sql()))
}

/// Strip any qualifier from a column reference.
pub(crate) fn bare_column(column: &str) -> BuildResult<String> {
    Ok(Ident::parse_column(column)?.bare())
}
