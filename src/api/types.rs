//! API request and response types for the platform services.
//!
//! This module contains the wire structures for the projects and model
//! endpoints, and the translation of error responses into [`PlatformError`].

use serde::{Deserialize, Serialize};

use crate::error::{NotFoundTarget, PlatformError};
use crate::model::Model;

// ============================================================================
// Projects API
// ============================================================================

/// Create app request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAppRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<&'a str>,
}

/// Accepted asynchronous job
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobAccepted {
    pub job_id: String,
}

/// Server-side state of an asynchronous job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
    /// Any status this client does not know yet; polled like `Pending`
    #[serde(other)]
    Unknown,
}

/// Job status response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobStatusResponse {
    pub status: JobState,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

// ============================================================================
// Model API
// ============================================================================

/// Create working copy request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateWorkingCopyRequest<'a> {
    pub project_id: &'a str,
    /// `None` for mainline
    pub branch_name: Option<&'a str>,
    /// -1 for the latest revision
    pub revision: i64,
}

/// Working copy response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkingCopyResponse {
    pub id: String,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub model: Model,
}

/// Commit request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitRequest<'a> {
    pub branch_name: Option<&'a str>,
    pub base_revision: i64,
    pub model: &'a Model,
}

/// Commit response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitResponse {
    pub revision: i64,
}

// ============================================================================
// Error responses
// ============================================================================

/// Error body returned by both platform services
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    pub error_code: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// What the failed request was addressing, used to name the missing
/// object when the server does not.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestTarget<'a> {
    pub project_id: Option<&'a str>,
    pub branch_name: Option<&'a str>,
    pub revision: Option<i64>,
}

impl RequestTarget<'_> {
    fn branch_label(&self) -> &str {
        self.branch_name.unwrap_or("mainline")
    }
}

impl ErrorBody {
    /// Translate a known error code. Unknown codes yield `None`.
    pub fn to_platform_error(&self, target: &RequestTarget<'_>) -> Option<PlatformError> {
        let message = self
            .error_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        let message_or = |fallback: String| message.map(ToOwned::to_owned).unwrap_or(fallback);

        let err = match self.error_code.as_str() {
            "InvalidCredentials" => PlatformError::authentication(),
            "InvalidProjectName" => PlatformError::validation(message_or(
                "Project name cannot contain these characters".into(),
            )),
            "ProjectNotFound" => PlatformError::not_found(
                NotFoundTarget::Project,
                message_or(format!(
                    "Project does not exist: '{}'",
                    target.project_id.unwrap_or_default()
                )),
            ),
            "BranchNotFound" => PlatformError::not_found(
                NotFoundTarget::Branch,
                message_or(format!("Branch '{}' doesn't exist", target.branch_label())),
            ),
            "RevisionNotFound" => PlatformError::not_found(
                NotFoundTarget::Revision,
                message_or(format!(
                    "No such revision: {} on branch '{}'",
                    target.revision.unwrap_or(-1),
                    target.branch_label()
                )),
            ),
            "UnsupportedModelVersion" => PlatformError::unsupported_version(message_or(
                "The working copy was created with a version of the Business Modeler which is not supported by the Model API.".into(),
            )),
            "WorkingCopyOutdated" => {
                PlatformError::conflict(message_or("Working copy is not up-to-date".into()))
            }
            "InvalidBaseRevision" => PlatformError::conflict(message_or(format!(
                "Invalid base revision: {}",
                target.revision.unwrap_or(-1)
            ))),
            _ => return None,
        };
        Some(err)
    }
}

/// Map a non-success HTTP response to a platform error.
pub(crate) fn error_from_response(
    status: reqwest::StatusCode,
    body: &str,
    target: &RequestTarget<'_>,
) -> PlatformError {
    let code = status.as_u16();

    if matches!(code, 401 | 403) {
        return PlatformError::authentication().with_http_status(code);
    }

    let known = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.to_platform_error(target));
    if let Some(err) = known {
        return err.with_http_status(code);
    }

    if matches!(code, 404 | 405) {
        return PlatformError::endpoint(code, status.canonical_reason().unwrap_or("Not Found"));
    }

    let detail = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        body.trim().to_string()
    };
    PlatformError::protocol(format!("Unexpected response (HTTP {}): {}", code, detail))
        .with_http_status(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use reqwest::StatusCode;

    fn body(code: &str, message: Option<&str>) -> String {
        match message {
            Some(m) => format!(r#"{{"errorCode":"{}","errorMessage":"{}"}}"#, code, m),
            None => format!(r#"{{"errorCode":"{}"}}"#, code),
        }
    }

    #[test]
    fn test_auth_statuses() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = error_from_response(status, "", &RequestTarget::default());
            assert_eq!(err.kind, ErrorKind::Authentication);
            assert!(err.to_string().contains("Invalid username and/or API key"));
        }
    }

    #[test]
    fn test_404_without_body_is_endpoint_error() {
        let err = error_from_response(
            StatusCode::NOT_FOUND,
            "<html>nope</html>",
            &RequestTarget::default(),
        );
        assert_eq!(err.kind, ErrorKind::Endpoint);
        assert!(err.to_string().contains("404 Not Found"));

        let err = error_from_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "",
            &RequestTarget::default(),
        );
        assert_eq!(err.kind, ErrorKind::Endpoint);
        assert!(err.to_string().contains("405"));
    }

    #[test]
    fn test_404_with_known_body_is_not_found() {
        let target = RequestTarget {
            project_id: Some("p-1"),
            branch_name: Some("Feature"),
            revision: Some(999),
        };

        let err = error_from_response(
            StatusCode::NOT_FOUND,
            &body("BranchNotFound", None),
            &target,
        );
        assert_eq!(err.kind, ErrorKind::NotFound(NotFoundTarget::Branch));
        assert!(err.to_string().contains("Feature' doesn't exist"));

        let err = error_from_response(
            StatusCode::NOT_FOUND,
            &body("RevisionNotFound", None),
            &target,
        );
        assert_eq!(err.kind, ErrorKind::NotFound(NotFoundTarget::Revision));
        assert!(err.to_string().contains("No such revision: 999"));

        let err = error_from_response(
            StatusCode::NOT_FOUND,
            &body("ProjectNotFound", Some("Project does not exist")),
            &target,
        );
        assert_eq!(err.kind, ErrorKind::NotFound(NotFoundTarget::Project));
        assert_eq!(err.to_string(), "Project does not exist");
    }

    #[test]
    fn test_conflict_codes() {
        let target = RequestTarget {
            revision: Some(-2),
            ..RequestTarget::default()
        };
        let err = error_from_response(
            StatusCode::CONFLICT,
            &body("WorkingCopyOutdated", None),
            &target,
        );
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.to_string().contains("Working copy is not up-to-date"));

        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            &body("InvalidBaseRevision", None),
            &target,
        );
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.to_string().contains("Invalid base revision"));
    }

    #[test]
    fn test_unknown_error_is_protocol() {
        let err = error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &body("SomethingElse", Some("boom")),
            &RequestTarget::default(),
        );
        assert_eq!(err.kind, ErrorKind::Protocol);
        assert_eq!(err.http_status, Some(500));
    }

    #[test]
    fn test_unknown_job_status_is_tolerated() {
        let status: JobStatusResponse = serde_json::from_str(r#"{"status":"Queued"}"#).unwrap();
        assert_eq!(status.status, JobState::Unknown);

        let status: JobStatusResponse =
            serde_json::from_str(r#"{"status":"Completed","projectId":"p-1"}"#).unwrap();
        assert_eq!(status.status, JobState::Completed);
        assert_eq!(status.project_id.as_deref(), Some("p-1"));
    }
}
