use crate::formatter::ArgMode;
use tracing::Level;

/// Configuration for a [`Db`](crate::Db) and the statements it creates.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Whether arguments are bound or inlined as literals.
    pub arg_mode: ArgMode,
    /// Whether `exec` emits a `tracing` event with the SQL it runs.
    pub log_sql: bool,
    /// Tracing event level for executed SQL.
    pub log_level: Level,
    /// Truncate logged SQL to this many bytes. `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            arg_mode: ArgMode::Bind,
            log_sql: true,
            log_level: Level::DEBUG,
            max_logged_sql_length: Some(200),
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg_mode(mut self, mode: ArgMode) -> Self {
        self.arg_mode = mode;
        self
    }

    /// Render argument values as literals instead of placeholders.
    pub fn inline_args(self) -> Self {
        self.arg_mode(ArgMode::Inline)
    }

    /// Enable or disable SQL logging.
    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    /// Override the tracing event level.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }
}
