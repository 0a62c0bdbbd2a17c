use super::{BaseQuery, BuiltQuery};
use crate::bufpool::{self, SqlBuf};
use crate::db::Db;
use crate::error::{BuildError, BuildResult, ExecError};
use crate::executor::Executor;
use crate::formatter::{Formatter, QueryAppender};
use crate::fragment::{Fragment, IntoArgs};
use crate::ident::IntoIdent;
use crate::log;
use crate::model::TableModel;

const QUERY: &str = "AddColumnQuery";

/// `ALTER TABLE <table> ADD <column>`.
///
/// Exactly one column expression is required. The target table comes from
/// [`model_table_expr`](Self::model_table_expr), else the [`model`](Self::model),
/// else the first of [`table`](Self::table) / [`table_expr`](Self::table_expr).
///
/// # Example
/// ```ignore
/// use sqlweave::{Db, Postgres};
///
/// let db = Db::new(client, Postgres);
/// db.new_add_column()
///     .table("users")
///     .column_expr("age INT", ())
///     .exec()
///     .await?;
/// ```
#[derive(Debug)]
#[must_use = "statement builders do nothing until rendered or executed"]
pub struct AddColumnQuery<'a, C> {
    base: BaseQuery<'a, C>,
    if_not_exists: bool,
}

impl<'a, C> AddColumnQuery<'a, C> {
    pub fn new(db: &'a Db<C>) -> Self {
        Self {
            base: BaseQuery::new(db),
            if_not_exists: false,
        }
    }

    /// Run on `conn` instead of the database's own executor.
    ///
    /// `conn` may be a different executor type, e.g. a transaction opened on
    /// the client the [`Db`] wraps.
    pub fn conn<'b, D>(self, conn: &'b D) -> AddColumnQuery<'b, D> {
        AddColumnQuery {
            base: self.base.with_conn(conn),
            if_not_exists: self.if_not_exists,
        }
    }

    /// Target the model's table and expose `?TableName` / `?TableAlias`.
    pub fn model<M: TableModel + ?Sized>(mut self, model: &M) -> Self {
        self.base.set_model(model);
        self
    }

    pub fn table(mut self, name: impl IntoIdent) -> Self {
        self.base.add_table(Fragment::ident(name));
        self
    }

    pub fn tables<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoIdent,
    {
        for name in names {
            self.base.add_table(Fragment::ident(name));
        }
        self
    }

    pub fn table_expr(mut self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.base.add_table(Fragment::expr(template, args));
        self
    }

    /// Replace the model's table with an expression.
    pub fn model_table_expr(mut self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.base.set_model_table(Fragment::expr(template, args));
        self
    }

    /// The column definition, e.g. `"age INT NOT NULL DEFAULT ?"`.
    pub fn column_expr(mut self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.base.add_column(Fragment::expr(template, args));
        self
    }

    /// Emit `ADD IF NOT EXISTS`.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Tag passed to [`Executor::execute_tagged`] and to the SQL log.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.base.tag = Some(tag.into());
        self
    }

    /// The deferred build error, if any.
    pub fn err(&self) -> Option<&BuildError> {
        self.base.err.as_ref()
    }

    /// Render with the database's formatter.
    pub fn build(&self) -> BuildResult<BuiltQuery> {
        let (sql, args) = self.base.fmter.format(self)?;
        Ok(BuiltQuery { sql, args })
    }

    /// Debug helper: the rendered SQL text.
    pub fn to_sql(&self) -> BuildResult<String> {
        self.build().map(|built| built.sql)
    }

    /// Render into a pooled buffer and execute.
    ///
    /// Nothing reaches the executor when rendering fails.
    pub async fn exec(self) -> Result<C::Output, ExecError<C::Error>>
    where
        C: Executor,
    {
        let mut buf = bufpool::acquire();
        if let Err(err) = self.append_query(&self.base.fmter, &mut buf) {
            tracing::debug!(target: log::TARGET, query = QUERY, error = %err, "render failed");
            return Err(err.into());
        }
        self.base.exec_buf(QUERY, &buf).await
    }

    fn render(&self, fmter: &Formatter, out: &mut SqlBuf) -> BuildResult<()> {
        out.push_str("ALTER TABLE ");
        self.base.append_first_table(QUERY, fmter, out)?;
        out.push_str(if self.if_not_exists {
            " ADD IF NOT EXISTS "
        } else {
            " ADD "
        });
        self.base.columns.append_joined(fmter, out, ", ")
    }
}

impl<C> QueryAppender for AddColumnQuery<'_, C> {
    fn append_query(&self, fmter: &Formatter, out: &mut SqlBuf) -> BuildResult<()> {
        if let Some(err) = &self.base.err {
            return Err(err.clone());
        }
        if self.base.columns.len() != 1 {
            return Err(BuildError::arity(QUERY, "requires exactly one column"));
        }
        if !self.base.has_table() {
            return Err(BuildError::missing_table(QUERY));
        }

        let fmter = self.base.formatter(fmter);
        let mark = out.mark();
        self.render(&fmter, out).inspect_err(|_| out.rollback(mark))
    }
}
