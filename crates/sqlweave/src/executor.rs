//! Execution interface.
//!
//! Statements render themselves and hand the SQL text plus bound arguments to
//! an [`Executor`]. Connections, pooled connections and transactions all
//! implement it, so a statement can run on any of them.

use crate::value::Value;
use std::future::Future;
use tokio_postgres::types::ToSql;

/// Something that can run a rendered statement.
///
/// Implementations delegate to the driver and return its result and error
/// untouched: no retries, no timeouts, no transaction handling.
pub trait Executor: Send + Sync {
    /// Driver result on success (affected rows for `tokio-postgres`).
    type Output: Send;
    /// Driver error, passed through to the caller unmodified.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute `sql` with `args` bound in order.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;

    /// Execute with a tag for observability.
    ///
    /// The default implementation ignores `tag` and calls [`Executor::execute`].
    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        let _ = tag;
        self.execute(sql, args)
    }
}

impl<T: Executor + ?Sized> Executor for &T {
    type Output = T::Output;
    type Error = T::Error;

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        (**self).execute(sql, args)
    }

    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        (**self).execute_tagged(tag, sql, args)
    }
}

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl Executor for tokio_postgres::Client {
    type Output = u64;
    type Error = tokio_postgres::Error;

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, tokio_postgres::Error> {
        tokio_postgres::Client::execute(self, sql, &params(args)).await
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    type Output = u64;
    type Error = tokio_postgres::Error;

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, tokio_postgres::Error> {
        tokio_postgres::Transaction::execute(self, sql, &params(args)).await
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Object {
    type Output = u64;
    type Error = tokio_postgres::Error;

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, tokio_postgres::Error> {
        let client: &tokio_postgres::Client = self;
        tokio_postgres::Client::execute(client, sql, &params(args)).await
    }
}
