//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for building and rendering statements
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while building or rendering a statement.
///
/// Construction mistakes ([`BuildError::InvalidIdent`], [`BuildError::InvalidTemplate`])
/// are recorded by the fluent builders and only surface on the first render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Identifier that cannot be quoted safely
    #[error("Invalid identifier '{ident}': {reason}")]
    InvalidIdent { ident: String, reason: String },

    /// Template whose placeholder syntax cannot be parsed
    #[error("Invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Wrong number of required fragments for a statement
    #[error("{query} {message}")]
    Arity {
        query: &'static str,
        message: &'static str,
    },

    /// Placeholders and arguments do not line up
    #[error("Malformed expression '{template}': {reason}")]
    MalformedExpression { template: String, reason: String },

    /// No target table configured
    #[error("{query} does not have a table")]
    MissingTable { query: &'static str },
}

impl BuildError {
    pub fn invalid_ident(ident: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdent {
            ident: ident.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    pub fn arity(query: &'static str, message: &'static str) -> Self {
        Self::Arity { query, message }
    }

    pub fn malformed(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedExpression {
            template: template.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_table(query: &'static str) -> Self {
        Self::MissingTable { query }
    }

    /// Whether this error was captured during fluent construction.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::InvalidIdent { .. } | Self::InvalidTemplate { .. })
    }

    pub fn is_arity(&self) -> bool {
        matches!(self, Self::Arity { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedExpression { .. })
    }

    pub fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable { .. })
    }
}

/// Error returned by `exec`: either the statement failed to render, or the
/// executor failed.
///
/// The driver's error is carried as-is so callers can inspect it directly.
#[derive(Debug, Error)]
pub enum ExecError<E> {
    /// Rendering failed; nothing was sent to the executor.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Error returned by the executor, unmodified.
    #[error(transparent)]
    Driver(E),
}

impl<E> ExecError<E> {
    pub fn is_build(&self) -> bool {
        matches!(self, Self::Build(_))
    }

    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }

    pub fn build_error(&self) -> Option<&BuildError> {
        match self {
            Self::Build(err) => Some(err),
            Self::Driver(_) => None,
        }
    }

    pub fn driver_error(&self) -> Option<&E> {
        match self {
            Self::Driver(err) => Some(err),
            Self::Build(_) => None,
        }
    }

    /// Take the driver error out, if this is one.
    pub fn into_driver(self) -> Result<E, BuildError> {
        match self {
            Self::Driver(err) => Ok(err),
            Self::Build(err) => Err(err),
        }
    }
}
