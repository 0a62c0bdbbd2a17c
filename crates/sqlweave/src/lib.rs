//! # sqlweave
//!
//! Injection-safe SQL statement building for Rust.
//!
//! ## Features
//!
//! - **Fragments, not strings**: identifiers are always quoted by the dialect;
//!   expressions take typed arguments through `?` placeholders
//! - **Pluggable dialects**: Postgres, MySQL and SQLite quoting and placeholders
//! - **Deferred errors**: builder chains never fail midway; the first mistake
//!   surfaces when the statement is rendered
//! - **Pooled rendering**: `exec` renders into a reused buffer
//! - **Any executor**: connections, pooled connections and transactions
//!
//! ## Example
//!
//! ```ignore
//! use sqlweave::{Db, Postgres, ident};
//!
//! let db = Db::new(client, Postgres);
//!
//! // ALTER TABLE "users" ADD age INT
//! db.new_add_column()
//!     .table("users")
//!     .column_expr("age INT", ())
//!     .exec()
//!     .await?;
//!
//! // ALTER TABLE "users" ADD "status" TEXT NOT NULL DEFAULT $1
//! db.new_add_column()
//!     .table("users")
//!     .column_expr("? TEXT NOT NULL DEFAULT ?", (ident("status"), "active"))
//!     .exec()
//!     .await?;
//! ```

pub mod bufpool;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod fragment;
pub mod ident;
pub mod model;
pub mod query;
pub mod value;

mod log;

pub use bufpool::{BufferPool, PooledBuf, SqlBuf};
pub use config::DbConfig;
pub use db::Db;
pub use dialect::{Dialect, MySql, Postgres, Sqlite};
pub use error::{BuildError, BuildResult, ExecError};
pub use executor::Executor;
pub use formatter::{ArgMode, Formatter, QueryAppender};
pub use fragment::{Arg, Fragment, FragmentList, IntoArg, IntoArgs, Safe, SafeQuery, ident, safe};
pub use ident::{Ident, IntoIdent};
pub use model::TableModel;
pub use query::{AddColumnQuery, BuiltQuery};
pub use value::Value;

#[cfg(test)]
pub(crate) mod test_support;
