//! Statement builders.
//!
//! Every statement owns a [`BaseQuery`] holding its table list, column list,
//! optional model and the deferred build error. Builder methods never fail:
//! the first construction mistake is recorded and returned by every render.

mod add_column;


pub use add_column::AddColumnQuery;

use crate::bufpool::SqlBuf;
use crate::config::DbConfig;
use crate::db::Db;
use crate::error::{BuildError, BuildResult, ExecError};
use crate::executor::Executor;
use crate::formatter::{Formatter, QueryAppender};
use crate::fragment::{Fragment, FragmentList};
use crate::log;
use crate::model::{ModelTable, TableModel};
use crate::value::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Rendered SQL text and its bound arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

/// State shared by every statement kind.
#[derive(Debug)]
pub(crate) struct BaseQuery<'a, C> {
    pub(crate) conn: &'a C,
    pub(crate) fmter: Formatter,
    pub(crate) config: DbConfig,
    pub(crate) tables: FragmentList,
    pub(crate) columns: FragmentList,
    pub(crate) model_table: Option<Fragment>,
    pub(crate) model: Option<Arc<ModelTable>>,
    pub(crate) err: Option<BuildError>,
    pub(crate) tag: Option<String>,
}

impl<'a, C> BaseQuery<'a, C> {
    pub(crate) fn new(db: &'a Db<C>) -> Self {
        Self {
            conn: db.conn(),
            fmter: db.formatter().clone(),
            config: db.config().clone(),
            tables: FragmentList::new(),
            columns: FragmentList::new(),
            model_table: None,
            model: None,
            err: None,
            tag: None,
        }
    }

    /// Move the statement state onto another executor.
    pub(crate) fn with_conn<'b, D>(self, conn: &'b D) -> BaseQuery<'b, D> {
        BaseQuery {
            conn,
            fmter: self.fmter,
            config: self.config,
            tables: self.tables,
            columns: self.columns,
            model_table: self.model_table,
            model: self.model,
            err: self.err,
            tag: self.tag,
        }
    }

    /// Record `err` unless an earlier error is already recorded.
    pub(crate) fn set_err(&mut self, err: BuildError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    fn accept(&mut self, fragment: BuildResult<Fragment>) -> Option<Fragment> {
        match fragment {
            Ok(fragment) => Some(fragment),
            Err(err) => {
                self.set_err(err);
                None
            }
        }
    }

    pub(crate) fn add_table(&mut self, fragment: BuildResult<Fragment>) {
        if let Some(fragment) = self.accept(fragment) {
            self.tables.push(fragment);
        }
    }

    pub(crate) fn add_column(&mut self, fragment: BuildResult<Fragment>) {
        if let Some(fragment) = self.accept(fragment) {
            self.columns.push(fragment);
        }
    }

    pub(crate) fn set_model_table(&mut self, fragment: BuildResult<Fragment>) {
        if let Some(fragment) = self.accept(fragment) {
            self.model_table = Some(fragment);
        }
    }

    pub(crate) fn set_model<M: TableModel + ?Sized>(&mut self, model: &M) {
        match ModelTable::from_model(model) {
            Ok(model) => self.model = Some(Arc::new(model)),
            Err(err) => self.set_err(err),
        }
    }

    /// `fmter`, extended with the model's named arguments when there is one.
    pub(crate) fn formatter<'f>(&self, fmter: &'f Formatter) -> Cow<'f, Formatter> {
        match &self.model {
            Some(model) => Cow::Owned(fmter.with_model(model)),
            None => Cow::Borrowed(fmter),
        }
    }

    /// Render the statement's target table.
    ///
    /// The model table expression wins over the model's own table name, which
    /// wins over the first entry of the table list.
    pub(crate) fn append_first_table(
        &self,
        query: &'static str,
        fmter: &Formatter,
        out: &mut SqlBuf,
    ) -> BuildResult<()> {
        if let Some(expr) = &self.model_table {
            return expr.append_query(fmter, out);
        }
        if let Some(model) = &self.model {
            fmter.append_ident(out, &model.table);
            return Ok(());
        }
        match self.tables.first() {
            Some(table) => table.append_query(fmter, out),
            None => Err(BuildError::missing_table(query)),
        }
    }

    pub(crate) fn has_table(&self) -> bool {
        self.model_table.is_some() || self.model.is_some() || !self.tables.is_empty()
    }

    /// Hand a rendered statement to the executor.
    pub(crate) async fn exec_buf(
        &self,
        query: &'static str,
        buf: &SqlBuf,
    ) -> Result<C::Output, ExecError<C::Error>>
    where
        C: Executor,
    {
        log::log_statement(&self.config, query, self.tag.as_deref(), buf);

        let result = match &self.tag {
            Some(tag) => self.conn.execute_tagged(tag, buf.sql(), buf.args()).await,
            None => self.conn.execute(buf.sql(), buf.args()).await,
        };
        result.map_err(|err| {
            tracing::debug!(target: log::TARGET, query, error = %err, "statement failed");
            ExecError::Driver(err)
        })
    }
}
