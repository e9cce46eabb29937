//! Error handling module for the application shell

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Process exit code for any failure not listed below
pub const EXIT_FAILURE: i32 = 1;
/// Process exit code when a required tool is missing at startup
pub const EXIT_MISSING_DEPENDENCY: i32 = 2;
/// Process exit code when a tool could not be run mid-way
pub const EXIT_TOOL_TRANSPORT: i32 = 3;

/// Main error type for tubize operations
#[derive(Error, Debug)]
pub enum TubizeError {
    /// A required external binary failed its startup check
    #[error("Missing dependency {tool}: {message}")]
    MissingDependency { tool: String, message: String },

    /// Entry path is missing or of the wrong kind
    #[error("Invalid entry path {path}: {message}")]
    InvalidEntryPath { path: String, message: String },

    /// Configuration file, environment or flag value rejected
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Logging could not be installed
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    /// Domain operation failed
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TubizeError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Exit status the binary reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TubizeError::MissingDependency { .. } => EXIT_MISSING_DEPENDENCY,
            TubizeError::Domain(e) if e.is_fatal() => EXIT_TOOL_TRANSPORT,
            _ => EXIT_FAILURE,
        }
    }
}

/// Exit status for an error bubbled up through `anyhow`
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<TubizeError>() {
        return e.exit_code();
    }
    match error.downcast_ref::<DomainError>() {
        Some(e) if e.is_fatal() => EXIT_TOOL_TRANSPORT,
        _ => EXIT_FAILURE,
    }
}

/// Result type alias for tubize operations
pub type TubizeResult<T> = std::result::Result<T, TubizeError>;
