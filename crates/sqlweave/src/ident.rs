//! Safe SQL identifier handling.
//!
//! An [`Ident`] is a table or column name that is always rendered through the
//! dialect's quoting rule, never pasted into SQL text.
//!
//! - [`Ident::new`] treats `.` as a qualifier separator (`public.users` →
//!   `"public"."users"`); a `*` part is written unquoted.
//! - [`Ident::quoted`] keeps the whole name as one part, dots included.
//!
//! Embedded quote characters are doubled, so a name can never close its own
//! quoting context.
//!
//! # Example
//! ```ignore
//! use sqlweave::{Ident, Postgres};
//!
//! let t = Ident::new("public.users");
//! t.validate()?;
//! let parts = Ident::parse_sql(r#""public"."users""#, &Postgres)?;
//! assert_eq!(parts, ["public", "users"]);
//! # Ok::<(), sqlweave::BuildError>(())
//! ```

use crate::dialect::Dialect;
use crate::error::{BuildError, BuildResult};

/// A SQL identifier (column, table, or schema name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    name: String,
    qualified: bool,
}

impl Ident {
    /// Create a possibly qualified identifier (`schema.table`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified: true,
        }
    }

    /// Create a single-part identifier; dots are part of the name.
    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Iterate over the identifier parts as they will be quoted.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        let split = if self.qualified { '.' } else { '\0' };
        self.name.split(split)
    }

    /// Check that the identifier can be rendered.
    ///
    /// Rejects empty names, empty qualified parts (`a..b`, `a.`) and NUL.
    pub fn validate(&self) -> BuildResult<()> {
        if self.name.is_empty() {
            return Err(BuildError::invalid_ident(&self.name, "identifier cannot be empty"));
        }
        if self.name.contains('\0') {
            return Err(BuildError::invalid_ident(
                &self.name,
                "identifier cannot contain NUL character",
            ));
        }
        if self.parts().any(str::is_empty) {
            return Err(BuildError::invalid_ident(
                &self.name,
                "empty identifier segment",
            ));
        }
        Ok(())
    }

    pub(crate) fn write_sql(&self, dialect: &dyn Dialect, out: &mut String) {
        for (i, part) in self.parts().enumerate() {
            if i > 0 {
                out.push('.');
            }
            if self.qualified && part == "*" {
                out.push('*');
            } else {
                dialect.append_ident(out, part);
            }
        }
    }

    /// Render the identifier as SQL for `dialect`.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        self.write_sql(dialect, &mut out);
        out
    }

    /// Parse a rendered identifier back into its parts.
    ///
    /// This is the inverse of [`Ident::to_sql`]:
    /// - Quoted parts use the dialect's quote character, doubled to escape.
    /// - Unquoted parts must match `[A-Za-z_][A-Za-z0-9_$]*` or be `*`.
    pub fn parse_sql(s: &str, dialect: &dyn Dialect) -> BuildResult<Vec<String>> {
        let quote = dialect.ident_quote();
        if s.is_empty() {
            return Err(BuildError::invalid_ident(s, "identifier cannot be empty"));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            // Consume '.' between parts (but require there is a next part).
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(BuildError::invalid_ident(s, "trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(BuildError::invalid_ident(
                            s,
                            format!("expected '.' between identifier parts, got '{c}'"),
                        ));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&quote) {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => {
                            if chars.peek() == Some(&quote) {
                                chars.next();
                                name.push(quote);
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(BuildError::invalid_ident(s, "unclosed quoted identifier"));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(BuildError::invalid_ident(s, "empty quoted identifier"));
                }
                parts.push(name);
                continue;
            }

            if chars.peek() == Some(&'*') {
                chars.next();
                parts.push("*".to_string());
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                let valid = if name.is_empty() {
                    c == '_' || c.is_ascii_alphabetic()
                } else {
                    c == '_' || c == '$' || c.is_ascii_alphanumeric()
                };
                if !valid {
                    return Err(BuildError::invalid_ident(
                        s,
                        format!("invalid character in identifier: '{c}'"),
                    ));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(BuildError::invalid_ident(s, "empty identifier segment"));
            }
            parts.push(name);
        }

        Ok(parts)
    }
}

/// Convert an input into an [`Ident`].
///
/// This is mainly for ergonomics in builder APIs.
pub trait IntoIdent {
    fn into_ident(self) -> Ident;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> Ident {
        self
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> Ident {
        self.clone()
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for &String {
    fn into_ident(self) -> Ident {
        Ident::new(self.as_str())
    }
}
