//! Error types surfaced by the platform client.
//!
//! Every failure carries a structured [`ErrorKind`] so callers can match on
//! the kind of failure instead of on message substrings. Messages keep the
//! wording the platform services use so they remain readable in logs.

use std::fmt;

use thiserror::Error;

/// What a `NotFound` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundTarget {
    Project,
    Branch,
    Revision,
}

impl fmt::Display for NotFoundTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotFoundTarget::Project => "project",
            NotFoundTarget::Branch => "branch",
            NotFoundTarget::Revision => "revision",
        };
        f.write_str(name)
    }
}

/// Failure kinds surfaced by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Incomplete credentials at construction time
    InvalidCredentials,
    /// Malformed caller input (e.g. an illegal project name)
    Validation,
    /// Server rejected the credentials (HTTP 401/403)
    Authentication,
    /// Transport failure: DNS, TLS, refused connection
    Connection,
    /// Wrong URL or path (HTTP 404/405 without a platform error body)
    Endpoint,
    /// Referenced project, branch or revision does not exist
    NotFound(NotFoundTarget),
    /// Model version of the working copy is not supported
    UnsupportedVersion,
    /// Commit target is outdated or invalid relative to the server head
    Conflict,
    /// Asynchronous job did not finish within the configured bound
    Timeout,
    /// Commit request may have been applied but no response was received
    CommitOutcomeUnknown,
    /// Unexpected status or unparseable response body
    Protocol,
}

impl ErrorKind {
    /// Whether a caller may reasonably retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Connection | ErrorKind::Timeout)
    }

    /// Whether the failure points at a configuration problem rather than
    /// at the request itself.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidCredentials | ErrorKind::Authentication | ErrorKind::Endpoint
        )
    }
}

/// Error returned by every platform operation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PlatformError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status of the failed response, if one was received
    pub http_status: Option<u16>,
    /// Request id sent with the failed request (for support tickets)
    pub request_id: Option<String>,
}

impl PlatformError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
            request_id: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorKind::InvalidCredentials,
            "Incomplete credentials: a username and either an API key or a password and OpenID are required",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication, "Invalid username and/or API key")
    }

    pub fn connection(detail: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Connection, format!("Connection error: {}", detail))
    }

    pub fn endpoint(status: u16, reason: &str) -> Self {
        Self::new(
            ErrorKind::Endpoint,
            format!("{} {}: check the configured API endpoint", status, reason),
        )
        .with_http_status(status)
    }

    pub fn not_found(target: NotFoundTarget, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound(target), message)
    }

    pub fn unsupported_version(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedVersion, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn commit_outcome_unknown(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::CommitOutcomeUnknown,
            format!(
                "Commit outcome unknown: the request was sent but no response was received ({})",
                detail
            ),
        )
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let err = PlatformError::not_found(NotFoundTarget::Project, "Project does not exist");
        assert_eq!(err.to_string(), "Project does not exist");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_endpoint_message_contains_status() {
        let err = PlatformError::endpoint(404, "Not Found");
        assert!(err.to_string().contains("404 Not Found"));
        assert_eq!(err.http_status, Some(404));
        assert!(err.kind.is_fatal());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::Connection.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(!ErrorKind::Conflict.is_retryable());
        assert!(!ErrorKind::CommitOutcomeUnknown.is_retryable());
    }
}
