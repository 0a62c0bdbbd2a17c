use crate::config::DbConfig;
use crate::dialect::Dialect;
use crate::formatter::Formatter;
use crate::fragment::IntoArg;
use crate::query::AddColumnQuery;

/// Entry point: an executor paired with a dialect-aware formatter.
///
/// `C` is usually a [`tokio_postgres::Client`], a pooled connection or a test
/// double; see [`Executor`](crate::Executor).
#[derive(Debug, Clone)]
pub struct Db<C> {
    conn: C,
    fmter: Formatter,
    config: DbConfig,
}

impl<C> Db<C> {
    pub fn new(conn: C, dialect: impl Dialect + 'static) -> Self {
        Self {
            conn,
            fmter: Formatter::new(dialect),
            config: DbConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DbConfig) -> Self {
        self.fmter = self.fmter.with_arg_mode(config.arg_mode);
        self.config = config;
        self
    }

    /// Bind `?name` for every statement created from this handle.
    pub fn with_named_arg(mut self, name: impl Into<String>, arg: impl IntoArg) -> Self {
        self.fmter = self.fmter.with_named_arg(name, arg);
        self
    }

    pub fn conn(&self) -> &C {
        &self.conn
    }

    pub fn formatter(&self) -> &Formatter {
        &self.fmter
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    pub fn new_add_column(&self) -> AddColumnQuery<'_, C> {
        AddColumnQuery::new(self)
    }
}
