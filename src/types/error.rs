//! Unified Error Type System
//!
//! Centralized error types for the analyzer, the diagram pipeline and the
//! optional text-generation collaborator.
//!
//! ## Recovery Policy
//!
//! - **Parse / read errors**: recovered per file (file skipped, run continues)
//! - **Collaborator errors**: recovered per section (empty fragment)
//! - **Output write errors**: fatal to the run

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Collaborator error categories for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Deployment or endpoint not available
    Unavailable,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Temporary server issues - retry
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }
}

// =============================================================================
// Collaborator Error
// =============================================================================

/// Error raised by the text-generation collaborator
#[derive(Debug, Clone)]
pub struct CollaboratorError {
    pub category: ErrorCategory,
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for CollaboratorError {}

impl CollaboratorError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message when no status code is available
    pub fn classify(message: &str, provider: &str) -> CollaboratorError {
        let lower = message.to_lowercase();

        let category = if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
        {
            ErrorCategory::RateLimit
        } else if lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("401")
            || lower.contains("403")
        {
            ErrorCategory::Auth
        } else if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("unreachable")
        {
            ErrorCategory::Network
        } else if lower.contains("deployment") && lower.contains("not found") {
            ErrorCategory::Unavailable
        } else if lower.contains("overloaded") || lower.contains("temporar") {
            ErrorCategory::Transient
        } else {
            ErrorCategory::Unknown
        };

        CollaboratorError::with_provider(category, message, provider)
    }

    /// Classify an HTTP status code (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> CollaboratorError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        CollaboratorError::with_provider(category, message, provider)
    }

    /// Classify a transport-level reqwest failure
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> CollaboratorError {
        if err.is_connect() || err.is_timeout() {
            CollaboratorError::with_provider(ErrorCategory::Network, err.to_string(), provider)
        } else if let Some(status) = err.status() {
            Self::classify_http_status(status.as_u16(), &err.to_string(), provider)
        } else {
            Self::classify(&err.to_string(), provider)
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ArchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Collaborator error: {0}")]
    Collaborator(CollaboratorError),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<CollaboratorError> for ArchError {
    fn from(err: CollaboratorError) -> Self {
        ArchError::Collaborator(err)
    }
}

pub type Result<T> = std::result::Result<T, ArchError>;

impl ArchError {
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Check if another attempt at the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Collaborator(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
        assert_eq!(ErrorCategory::Unavailable.to_string(), "UNAVAILABLE");
    }

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::RateLimit.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Transient.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::BadRequest.is_retryable());
        assert!(!ErrorCategory::Unavailable.is_retryable());
    }

    #[test]
    fn test_classify_messages() {
        assert_eq!(
            ErrorClassifier::classify("Rate limit exceeded", "azure-openai").category,
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorClassifier::classify("Invalid API key provided", "openai").category,
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorClassifier::classify("Connection refused", "openai").category,
            ErrorCategory::Network
        );
        assert_eq!(
            ErrorClassifier::classify("Something weird happened", "openai").category,
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn test_classify_http_status() {
        let cases = [
            (429, ErrorCategory::RateLimit),
            (401, ErrorCategory::Auth),
            (400, ErrorCategory::BadRequest),
            (404, ErrorCategory::Unavailable),
            (503, ErrorCategory::Transient),
            (418, ErrorCategory::Unknown),
        ];
        for (status, expected) in cases {
            let err = ErrorClassifier::classify_http_status(status, "body", "test");
            assert_eq!(err.category, expected, "status {}", status);
        }
    }

    #[test]
    fn test_collaborator_error_display() {
        let err = CollaboratorError::with_provider(ErrorCategory::Auth, "denied", "openai");
        assert_eq!(err.to_string(), "[openai:AUTH] denied");

        let err = CollaboratorError::new(ErrorCategory::Network, "down");
        assert_eq!(err.to_string(), "[NETWORK] down");
    }

    #[test]
    fn test_recoverable() {
        let transient = ArchError::from(CollaboratorError::new(ErrorCategory::Transient, "x"));
        assert!(transient.is_recoverable());

        let auth = ArchError::from(CollaboratorError::new(ErrorCategory::Auth, "x"));
        assert!(!auth.is_recoverable());

        assert!(ArchError::timeout("llm", Duration::from_secs(1)).is_recoverable());
        assert!(!ArchError::parse("a.py", "bad").is_recoverable());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ArchError::parse("pkg/a.py", "syntax error at 3:1");
        assert_eq!(err.to_string(), "Parse error in pkg/a.py: syntax error at 3:1");
    }
}
