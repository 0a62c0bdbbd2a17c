//! `tracing` output for executed statements.

use crate::bufpool::SqlBuf;
use crate::config::DbConfig;
use std::borrow::Cow;
use tracing::Level;

pub(crate) const TARGET: &str = "sqlweave.sql";

/// Truncate `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn truncate_sql(sql: &str, max: Option<usize>) -> Cow<'_, str> {
    match max {
        Some(max) if sql.len() > max => Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max))),
        _ => Cow::Borrowed(sql),
    }
}

/// Emit the statement about to be executed.
pub(crate) fn log_statement(config: &DbConfig, query: &'static str, tag: Option<&str>, buf: &SqlBuf) {
    if !config.log_sql {
        return;
    }

    // tracing needs the level at compile time.
    macro_rules! emit_at_level {
        ($level:expr, $($field:tt)*) => {
            match $level {
                Level::ERROR => tracing::error!($($field)*),
                Level::WARN => tracing::warn!($($field)*),
                Level::INFO => tracing::info!($($field)*),
                Level::DEBUG => tracing::debug!($($field)*),
                Level::TRACE => tracing::trace!($($field)*),
            }
        };
    }

    let sql = truncate_sql(buf.sql(), config.max_logged_sql_length);
    let tag = tag.unwrap_or("-");
    emit_at_level!(
        config.log_level,
        target: TARGET,
        query,
        tag,
        arg_count = buf.args().len(),
        sql = %sql,
    );
}
