//! Error types for the SQL runner.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for runner operations.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Configuration errors (missing hostname/token, unreadable files, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection errors (client construction, transport failures, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A CREATE statement targets a catalog that does not end in `_dev`,
    /// or carries no fully qualified object name at all.
    #[error("Catalog policy violation: {0}")]
    CatalogPolicy(String),

    /// The statement's first keyword is outside the execute/explain sets.
    #[error("Unsupported statement type: {0}")]
    UnsupportedStatement(String),

    /// The warehouse reported a failure while executing a statement.
    #[error("Execution error: {0}")]
    Execution(String),

    /// An EXPLAIN returned a plan containing a planning-error marker.
    #[error("Planning error: {0}")]
    Planning(String),
}

impl RunnerError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a catalog policy violation with the given message.
    pub fn catalog_policy(msg: impl Into<String>) -> Self {
        Self::CatalogPolicy(msg.into())
    }

    /// Creates an unsupported-statement error with the given message.
    pub fn unsupported_statement(msg: impl Into<String>) -> Self {
        Self::UnsupportedStatement(msg.into())
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a planning error with the given message.
    pub fn planning(msg: impl Into<String>) -> Self {
        Self::Planning(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Connection(_) => "Connection Error",
            Self::CatalogPolicy(_) => "Catalog Policy Violation",
            Self::UnsupportedStatement(_) => "Unsupported Statement",
            Self::Execution(_) => "Execution Error",
            Self::Planning(_) => "Planning Error",
        }
    }
}

/// Result type alias using RunnerError.
pub type Result<T> = std::result::Result<T, RunnerError>;
