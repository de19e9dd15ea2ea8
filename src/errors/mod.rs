//! Unified error handling and the shared error-reporting collaborator.

use std::sync::Arc;

/// Application error type for the search/navigation engine.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error originated at the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this error represents a developer-contract violation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Shared error-handling collaborator.
///
/// Every failed backend call is reported here exactly once; the reporting
/// component keeps its previously displayed data intact (no flash-to-empty).
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &AppError);
}

/// Default reporter: one structured log entry per failure.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &AppError) {
        tracing::error!(error = %error, "Backend call failed");
    }
}

/// Shared reporter handle passed down through page construction.
pub type SharedReporter = Arc<dyn ErrorReporter>;
