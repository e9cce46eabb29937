// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// External tool could not be spawned (binary missing or environment broken)
    ToolUnavailable(String),
    /// External tool ran but did not produce the expected result
    ToolFailed(String),
    /// Probe output could not be parsed
    ParseFailed(String),
    /// Filesystem operation failed
    FsFail(String),
    /// Processing error
    ProcessingError(String),
    /// Internal error
    InternalError(String),
}

impl DomainError {
    /// Transport failures abort the whole run; everything else is scoped to one file
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::ToolUnavailable(_))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::ToolUnavailable(msg) => write!(f, "Tool unavailable: {}", msg),
            DomainError::ToolFailed(msg) => write!(f, "Tool failed: {}", msg),
            DomainError::ParseFailed(msg) => write!(f, "Parse failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "Filesystem error: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
