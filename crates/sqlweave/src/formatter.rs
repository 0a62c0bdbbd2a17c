//! Dialect-aware rendering of identifiers and arguments.

use crate::bufpool::{self, SqlBuf};
use crate::dialect::Dialect;
use crate::error::BuildResult;
use crate::fragment::{Arg, IntoArg};
use crate::ident::Ident;
use crate::model::ModelTable;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How [`Value`] arguments reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgMode {
    /// Write a dialect placeholder and collect the value into [`SqlBuf::args`].
    #[default]
    Bind,
    /// Write the value as an escaped dialect literal.
    ///
    /// Postgres text cannot hold NUL, so NUL characters in inlined strings
    /// are dropped; use `Bind` when the value must reach the server intact.
    Inline,
}

/// Anything that can render itself into a [`SqlBuf`].
pub trait QueryAppender {
    /// Append SQL (and bound arguments) to `out`.
    ///
    /// On error, implementations leave `out` exactly as they found it.
    fn append_query(&self, fmter: &Formatter, out: &mut SqlBuf) -> BuildResult<()>;
}

/// Renders fragments for one dialect.
///
/// A formatter holds no per-call state; cloning is cheap and the `with_*`
/// methods return a new formatter instead of mutating a shared one.
#[derive(Clone)]
pub struct Formatter {
    dialect: Arc<dyn Dialect>,
    mode: ArgMode,
    named: Option<Arc<HashMap<String, Arg>>>,
    model: Option<Arc<ModelTable>>,
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("dialect", &self.dialect.name())
            .field("mode", &self.mode)
            .field("named", &self.named.as_ref().map_or(0, |n| n.len()))
            .field("model", &self.model)
            .finish()
    }
}

impl Formatter {
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::from_arc(Arc::new(dialect))
    }

    pub fn from_arc(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            mode: ArgMode::Bind,
            named: None,
            model: None,
        }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        &*self.dialect
    }

    pub fn arg_mode(&self) -> ArgMode {
        self.mode
    }

    pub fn with_arg_mode(mut self, mode: ArgMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `with_arg_mode(ArgMode::Inline)`.
    pub fn inline(self) -> Self {
        self.with_arg_mode(ArgMode::Inline)
    }

    /// Bind `?name` placeholders to `arg`.
    pub fn with_named_arg(mut self, name: impl Into<String>, arg: impl IntoArg) -> Self {
        let named = self.named.get_or_insert_with(Default::default);
        Arc::make_mut(named).insert(name.into(), arg.into_arg());
        self
    }

    /// Expose `?TableName` / `?TableAlias` for a statement's model.
    pub(crate) fn with_model(&self, model: &Arc<ModelTable>) -> Self {
        Self {
            model: Some(Arc::clone(model)),
            ..self.clone()
        }
    }

    pub fn append_ident(&self, out: &mut SqlBuf, ident: &Ident) {
        ident.write_sql(&*self.dialect, &mut out.sql);
    }

    pub fn append_value(&self, out: &mut SqlBuf, value: &Value) {
        match self.mode {
            ArgMode::Bind => {
                out.args.push(value.clone());
                self.dialect.append_placeholder(&mut out.sql, out.args.len());
            }
            ArgMode::Inline => {
                let start = out.sql.len();
                self.dialect.append_literal(&mut out.sql, value);
                // `-` followed by a negative literal would open a `--` comment.
                if out.sql[start..].starts_with('-') && out.sql[..start].ends_with('-') {
                    out.sql.insert(start, ' ');
                }
            }
        }
    }

    pub fn append_arg(&self, out: &mut SqlBuf, arg: &Arg) {
        match arg {
            Arg::Value(value) => self.append_value(out, value),
            Arg::Ident(ident) => self.append_ident(out, ident),
            Arg::Safe(sql) => out.sql.push_str(sql),
        }
    }

    /// Render the named argument `name`; `Ok(false)` when nothing is bound to it.
    pub(crate) fn append_named_arg(&self, out: &mut SqlBuf, name: &str) -> BuildResult<bool> {
        if let Some(model) = &self.model {
            match name {
                "TableName" => {
                    self.append_ident(out, &model.table);
                    return Ok(true);
                }
                "TableAlias" => {
                    self.append_ident(out, model.alias.as_ref().unwrap_or(&model.table));
                    return Ok(true);
                }
                _ => {}
            }
        }

        match self.named.as_ref().and_then(|named| named.get(name)) {
            Some(arg) => {
                if let Arg::Ident(ident) = arg {
                    ident.validate()?;
                }
                self.append_arg(out, arg);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Render `query` into a fresh pooled buffer and return the owned SQL text
    /// and arguments.
    pub fn format(&self, query: &impl QueryAppender) -> BuildResult<(String, Vec<Value>)> {
        let mut buf = bufpool::acquire();
        query.append_query(self, &mut buf)?;
        Ok((buf.sql().to_string(), buf.args().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Postgres};
    use crate::fragment::{Fragment, safe};

    #[test]
    fn binds_values_with_increasing_placeholders() {
        let fmter = Formatter::new(Postgres);
        let mut out = SqlBuf::new();
        fmter.append_value(&mut out, &Value::I32(1));
        out.push_str(", ");
        fmter.append_value(&mut out, &Value::from("x"));
        assert_eq!(out.sql(), "$1, $2");
        assert_eq!(out.args(), &[Value::I32(1), Value::from("x")]);
    }

    #[test]
    fn inline_mode_writes_literals() {
        let fmter = Formatter::new(MySql).inline();
        let mut out = SqlBuf::new();
        fmter.append_value(&mut out, &Value::from("o'neil"));
        assert_eq!(out.sql(), "'o''neil'");
        assert!(out.args().is_empty());
    }

    #[test]
    fn inline_negative_after_minus_is_not_a_comment() {
        let fmter = Formatter::new(Postgres).inline();
        let mut out = SqlBuf::new();
        out.push_str("DEFAULT -");
        fmter.append_value(&mut out, &Value::I32(-5));
        assert_eq!(out.sql(), "DEFAULT - -5");

        let mut out = SqlBuf::new();
        out.push_str("DEFAULT -");
        fmter.append_value(&mut out, &Value::I32(5));
        assert_eq!(out.sql(), "DEFAULT -5");
    }

    #[test]
    fn nul_survives_only_when_bound() {
        let value = Value::from("a\0b");

        let mut out = SqlBuf::new();
        Formatter::new(Postgres).append_value(&mut out, &value);
        assert_eq!(out.sql(), "$1");
        assert_eq!(out.args(), &[Value::from("a\0b")]);

        let mut out = SqlBuf::new();
        Formatter::new(Postgres).inline().append_value(&mut out, &value);
        assert_eq!(out.sql(), "'ab'");
    }

    #[test]
    fn ident_and_safe_args_are_never_bound() {
        let fmter = Formatter::new(Postgres);
        let mut out = SqlBuf::new();
        fmter.append_arg(&mut out, &Ident::new("age").into_arg());
        out.push_str(" ");
        fmter.append_arg(&mut out, &safe("INT").into_arg());
        assert_eq!(out.sql(), r#""age" INT"#);
        assert!(out.args().is_empty());
    }

    #[test]
    fn named_args_resolve_from_formatter() {
        let fmter = Formatter::new(Postgres)
            .with_named_arg("col", Ident::new("age"))
            .with_named_arg("default", 18);
        let fragment = Fragment::expr("?col INT DEFAULT ?default", ()).unwrap();
        let (sql, args) = fmter.format(&fragment).unwrap();
        assert_eq!(sql, r#""age" INT DEFAULT $1"#);
        assert_eq!(args, [Value::I32(18)]);
    }

    #[test]
    fn named_args_do_not_leak_between_clones() {
        let base = Formatter::new(Postgres);
        let with_arg = base.clone().with_named_arg("x", 1);
        let fragment = Fragment::expr("?x", ()).unwrap();
        assert!(with_arg.format(&fragment).is_ok());
        assert!(base.format(&fragment).is_err());
    }
}
