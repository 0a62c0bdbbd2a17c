//! SQL fragments: quoted identifiers and parameterized expressions.
//!
//! A [`Fragment`] is the unit every statement is assembled from. Identifiers
//! always go through the dialect's quoting rule; expressions are caller-trusted
//! SQL text whose `?` placeholders are filled from typed [`Arg`]s.
//!
//! # Example
//! ```ignore
//! use sqlweave::{Fragment, Formatter, Postgres, ident};
//!
//! let col = Fragment::expr("? INT DEFAULT ?", (ident("age"), 18))?;
//! let (sql, args) = Formatter::new(Postgres).format(&col)?;
//! assert_eq!(sql, r#""age" INT DEFAULT $1"#);
//! ```

mod list;
mod template;

#[cfg(test)]
mod tests;

pub use list::FragmentList;

use crate::bufpool::SqlBuf;
use crate::error::{BuildError, BuildResult};
use crate::formatter::{Formatter, QueryAppender};
use crate::ident::{Ident, IntoIdent};
use crate::value::Value;
use template::Token;
use uuid::Uuid;

/// One argument of an expression template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Bound as a parameter (or inlined as a literal).
    Value(Value),
    /// Rendered as a quoted identifier.
    Ident(Ident),
    /// Caller-trusted SQL text, written verbatim.
    Safe(String),
}

/// SQL text that is written as-is; see [`safe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Safe(String);

impl Safe {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mark `sql` as trusted text for a placeholder.
///
/// Never pass user input here; it is not escaped.
pub fn safe(sql: impl Into<String>) -> Safe {
    Safe(sql.into())
}

/// Shorthand for an identifier argument.
pub fn ident(name: impl IntoIdent) -> Ident {
    name.into_ident()
}

/// Convert a single value into an [`Arg`].
pub trait IntoArg {
    fn into_arg(self) -> Arg;
}

impl IntoArg for Arg {
    fn into_arg(self) -> Arg {
        self
    }
}

impl IntoArg for Value {
    fn into_arg(self) -> Arg {
        Arg::Value(self)
    }
}

impl IntoArg for Ident {
    fn into_arg(self) -> Arg {
        Arg::Ident(self)
    }
}

impl IntoArg for &Ident {
    fn into_arg(self) -> Arg {
        Arg::Ident(self.clone())
    }
}

impl IntoArg for Safe {
    fn into_arg(self) -> Arg {
        Arg::Safe(self.0)
    }
}

impl<T: Into<Value>> IntoArg for Option<T> {
    fn into_arg(self) -> Arg {
        Arg::Value(self.into())
    }
}

macro_rules! impl_into_arg_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoArg for $ty {
                #[inline]
                fn into_arg(self) -> Arg {
                    Arg::Value(self.into())
                }
            }
        )+
    };
}

impl_into_arg_value!(
    bool,
    i8,
    u8,
    i16,
    u16,
    i32,
    u32,
    i64,
    f32,
    f64,
    String,
    &str,
    &String,
    Vec<u8>,
    &[u8],
    Uuid,
    chrono::DateTime<chrono::Utc>,
    serde_json::Value,
);

/// Convert an argument list into `Vec<Arg>`.
///
/// Implemented for `()`, tuples up to eight elements, arrays and vectors.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl<T: IntoArg> IntoArgs for Vec<T> {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(IntoArg::into_arg).collect()
    }
}

impl<T: IntoArg, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(IntoArg::into_arg).collect()
    }
}

macro_rules! impl_into_args_tuple {
    ($($name:ident),+) => {
        impl<$($name: IntoArg),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Arg> {
                let ($($name,)+) = self;
                vec![$($name.into_arg()),+]
            }
        }
    };
}

impl_into_args_tuple!(A);
impl_into_args_tuple!(A, B);
impl_into_args_tuple!(A, B, C);
impl_into_args_tuple!(A, B, C, D);
impl_into_args_tuple!(A, B, C, D, E);
impl_into_args_tuple!(A, B, C, D, E, F);
impl_into_args_tuple!(A, B, C, D, E, F, G);
impl_into_args_tuple!(A, B, C, D, E, F, G, H);

/// A scanned expression template together with its arguments.
#[derive(Debug, Clone)]
pub struct SafeQuery {
    template: String,
    tokens: Vec<Token>,
    required: usize,
    args: Vec<Arg>,
}

impl SafeQuery {
    /// Scan `template` and validate identifier arguments.
    pub fn new(template: impl Into<String>, args: impl IntoArgs) -> BuildResult<Self> {
        let template = template.into();
        let scanned = template::scan(&template)?;
        let args = args.into_args();
        for arg in &args {
            if let Arg::Ident(ident) = arg {
                ident.validate()?;
            }
        }
        Ok(Self {
            template,
            tokens: scanned.tokens,
            required: scanned.required,
            args,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Number of arguments the template consumes.
    pub fn required_args(&self) -> usize {
        self.required
    }

    fn render(&self, fmter: &Formatter, out: &mut SqlBuf) -> BuildResult<()> {
        if self.required != self.args.len() {
            return Err(BuildError::malformed(
                &self.template,
                format!(
                    "expected {} arguments, got {}",
                    self.required,
                    self.args.len()
                ),
            ));
        }

        for token in &self.tokens {
            match token {
                Token::Text(range) => out.push_str(&self.template[range.clone()]),
                Token::Arg(index) => match self.args.get(*index) {
                    Some(arg) => fmter.append_arg(out, arg),
                    None => {
                        return Err(BuildError::malformed(
                            &self.template,
                            format!("argument index {index} out of range"),
                        ));
                    }
                },
                Token::Named(range) => {
                    let name = &self.template[range.clone()];
                    if !fmter.append_named_arg(out, name)? {
                        return Err(BuildError::malformed(
                            &self.template,
                            format!("unknown named argument '{name}'"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl QueryAppender for SafeQuery {
    fn append_query(&self, fmter: &Formatter, out: &mut SqlBuf) -> BuildResult<()> {
        let mark = out.mark();
        self.render(fmter, out).inspect_err(|_| out.rollback(mark))
    }
}

/// A piece of SQL: a quoted identifier or a parameterized expression.
#[derive(Debug, Clone)]
pub enum Fragment {
    Ident(Ident),
    Expr(SafeQuery),
}

impl Fragment {
    /// An identifier fragment; rejects names that cannot be quoted.
    pub fn ident(name: impl IntoIdent) -> BuildResult<Self> {
        let ident = name.into_ident();
        ident.validate()?;
        Ok(Self::Ident(ident))
    }

    /// An expression fragment; rejects unparsable templates.
    pub fn expr(template: impl Into<String>, args: impl IntoArgs) -> BuildResult<Self> {
        SafeQuery::new(template, args).map(Self::Expr)
    }

    pub fn is_ident(&self) -> bool {
        matches!(self, Self::Ident(_))
    }
}

impl From<SafeQuery> for Fragment {
    fn from(query: SafeQuery) -> Self {
        Self::Expr(query)
    }
}

impl QueryAppender for Fragment {
    fn append_query(&self, fmter: &Formatter, out: &mut SqlBuf) -> BuildResult<()> {
        match self {
            // The variant is public, so `Fragment::ident` may have been bypassed.
            Self::Ident(ident) => {
                ident.validate()?;
                fmter.append_ident(out, ident);
                Ok(())
            }
            Self::Expr(query) => query.append_query(fmter, out),
        }
    }
}
