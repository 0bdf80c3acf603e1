//! Tracker client error types.

use tracksmith_core::IssueNumber;

/// Errors that can occur when talking to the issue tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The authentication token environment variable is not set.
    #[error("tracker token not found: set the {0} environment variable")]
    MissingToken(String),

    /// The repository coordinates (owner/name) are not configured.
    #[error("tracker repository not configured: {0}")]
    MissingRepository(String),

    /// An HTTP request failed (transport, TLS, or a non-2xx status).
    #[error("tracker request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    /// A response body could not be decoded.
    #[error("failed to decode tracker response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The requested issue does not exist on the tracker.
    #[error("issue #{0} not found")]
    IssueNotFound(IssueNumber),
}

impl From<ureq::Error> for TrackerError {
    fn from(err: ureq::Error) -> Self {
        Self::Http(Box::new(err))
    }
}

/// Convenience alias used throughout the tracker crate.
pub type Result<T> = std::result::Result<T, TrackerError>;
