//! In-memory executor for unit tests.

use crate::executor::Executor;
use crate::value::Value;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
#[error("driver refused: {0}")]
pub(crate) struct DriverFailure(pub(crate) String);

/// Records every statement and answers with a fixed row count or error.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) calls: Mutex<Vec<(Option<String>, String, Vec<Value>)>>,
    pub(crate) fail_with: Option<String>,
}

impl Recorder {
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::default(),
            fail_with: Some(message.to_string()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(Option<String>, String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, tag: Option<&str>, sql: &str, args: &[Value]) -> Result<u64, DriverFailure> {
        self.calls
            .lock()
            .unwrap()
            .push((tag.map(str::to_string), sql.to_string(), args.to_vec()));
        match &self.fail_with {
            Some(message) => Err(DriverFailure(message.clone())),
            None => Ok(1),
        }
    }
}

impl Executor for Recorder {
    type Output = u64;
    type Error = DriverFailure;

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, DriverFailure> {
        self.record(None, sql, args)
    }

    async fn execute_tagged(&self, tag: &str, sql: &str, args: &[Value]) -> Result<u64, DriverFailure> {
        self.record(Some(tag), sql, args)
    }
}
