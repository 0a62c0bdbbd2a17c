//! Pooled render buffers.
//!
//! Every `exec` borrows one [`SqlBuf`] from a process-wide [`BufferPool`] and
//! gives it back when the [`PooledBuf`] guard drops, on success and on error
//! alike. Released buffers are cleared but keep their capacity, so steady-state
//! rendering does not allocate.

use crate::value::Value;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Maximum number of idle buffers kept by the global pool.
pub const MAX_POOLED: usize = 64;

/// Buffers that grew beyond this many bytes of SQL are freed instead of pooled.
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Buffers whose argument list grew beyond this many slots are freed instead of pooled.
pub const MAX_RETAINED_ARGS: usize = 1024;

const INITIAL_CAPACITY: usize = 256;

static POOL: BufferPool = BufferPool::new(MAX_POOLED);

/// Borrow a buffer from the global pool.
pub fn acquire() -> PooledBuf<'static> {
    POOL.acquire()
}

/// The global pool, mostly useful for inspection.
pub fn global() -> &'static BufferPool {
    &POOL
}

/// Rendered SQL text plus the arguments bound while rendering it.
#[derive(Debug, Default)]
pub struct SqlBuf {
    pub(crate) sql: String,
    pub(crate) args: Vec<Value>,
}

/// Position in a [`SqlBuf`] to roll back to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    sql_len: usize,
    args_len: usize,
}

impl SqlBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sql: String::with_capacity(capacity),
            args: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty() && self.args.is_empty()
    }

    /// Append literal SQL text.
    pub fn push_str(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub fn clear(&mut self) {
        self.sql.clear();
        self.args.clear();
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            sql_len: self.sql.len(),
            args_len: self.args.len(),
        }
    }

    /// Drop everything written after `mark`.
    pub(crate) fn rollback(&mut self, mark: Mark) {
        self.sql.truncate(mark.sql_len);
        self.args.truncate(mark.args_len);
    }
}

/// A capacity-bounded free-list of [`SqlBuf`]s, safe to share between threads.
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<SqlBuf>>,
    max_pooled: usize,
}

impl BufferPool {
    pub const fn new(max_pooled: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_pooled,
        }
    }

    /// Take an empty buffer, reusing pooled capacity when available.
    pub fn acquire(&self) -> PooledBuf<'_> {
        let buf = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        PooledBuf {
            buf: buf.unwrap_or_else(|| SqlBuf::with_capacity(INITIAL_CAPACITY)),
            pool: self,
        }
    }

    /// Number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn release(&self, mut buf: SqlBuf) {
        if buf.sql.capacity() > MAX_RETAINED_CAPACITY || buf.args.capacity() > MAX_RETAINED_ARGS {
            return;
        }
        buf.clear();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_pooled {
            free.push(buf);
        }
    }
}

/// Scoped borrow of a pooled [`SqlBuf`]; returned to its pool on drop.
#[derive(Debug)]
pub struct PooledBuf<'p> {
    buf: SqlBuf,
    pool: &'p BufferPool,
}

impl Deref for PooledBuf<'_> {
    type Target = SqlBuf;

    fn deref(&self) -> &SqlBuf {
        &self.buf
    }
}

impl DerefMut for PooledBuf<'_> {
    fn deref_mut(&mut self) -> &mut SqlBuf {
        &mut self.buf
    }
}

impl Drop for PooledBuf<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_buffer_is_empty_and_reused() {
        let pool = BufferPool::new(4);
        let ptr = {
            let mut buf = pool.acquire();
            buf.push_str("SELECT 1");
            buf.args.push(Value::I32(1));
            buf.sql.as_ptr()
        };
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert_eq!(buf.sql.as_ptr(), ptr);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn pool_is_bounded() {
        let pool = BufferPool::new(2);
        let bufs: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(bufs);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn oversized_buffers_are_not_retained() {
        let pool = BufferPool::new(2);
        {
            let mut buf = pool.acquire();
            buf.push_str(&"x".repeat(MAX_RETAINED_CAPACITY + 1));
        }
        assert_eq!(pool.idle(), 0);

        {
            let mut buf = pool.acquire();
            buf.args.resize(MAX_RETAINED_ARGS + 1, Value::Null);
        }
        assert_eq!(pool.idle(), 0);

        {
            let mut buf = pool.acquire();
            buf.args.push(Value::Null);
        }
        assert_eq!(pool.idle(), 1);
        assert!(pool.acquire().args.capacity() <= MAX_RETAINED_ARGS);
    }

    #[test]
    fn released_on_early_return() {
        fn render(pool: &BufferPool, fail: bool) -> Result<String, ()> {
            let mut buf = pool.acquire();
            buf.push_str("ALTER TABLE ");
            if fail {
                return Err(());
            }
            Ok(buf.sql().to_string())
        }

        let pool = BufferPool::new(4);
        assert!(render(&pool, true).is_err());
        assert_eq!(pool.idle(), 1);
        assert_eq!(render(&pool, false).unwrap(), "ALTER TABLE ");
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn rollback_restores_mark() {
        let mut buf = SqlBuf::new();
        buf.push_str("ALTER TABLE ");
        let mark = buf.mark();
        buf.push_str("\"users\"");
        buf.args.push(Value::Null);
        buf.rollback(mark);
        assert_eq!(buf.sql(), "ALTER TABLE ");
        assert!(buf.args().is_empty());
    }
}
