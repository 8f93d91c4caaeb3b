//! Platform client and façade.
//!
//! `PlatformClient` owns the credentials, endpoints and options, and is
//! cheap to clone: clones share one HTTP client (and its connection pool).
//! `Platform` is the stateless façade offering the three operations:
//!
//! - `create_new_app`: start app provisioning and poll until it is done
//! - `create_online_working_copy`: check out a revision into a working copy
//! - `commit_to_team_server`: commit a working copy's model as a new revision

mod poll;

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::api::types::{
    CommitRequest, CommitResponse, CreateAppRequest, CreateWorkingCopyRequest, JobAccepted,
    JobState, JobStatusResponse, RequestTarget, WorkingCopyResponse,
};
use crate::api::{ApiClient, Delivery, Service};
use crate::config::{Endpoints, SdkOptions};
use crate::credentials::Credentials;
use crate::domain::{Branch, Project, Revision};
use crate::error::{ErrorKind, PlatformError, Result};
use crate::working_copy::OnlineWorkingCopy;

use poll::{JobPoller, JobProgress};

const APPS_PATH: &[&str] = &["api", "v1", "apps"];
const JOBS_PATH: &[&str] = &["api", "v1", "jobs"];
const WORKING_COPIES_PATH: &[&str] = &["v1", "wcs"];

struct ClientInner {
    api: ApiClient,
    options: SdkOptions,
}

/// Client for the Mendix platform APIs.
#[derive(Clone)]
pub struct PlatformClient {
    inner: Arc<ClientInner>,
}

impl PlatformClient {
    /// Create a client from loosely specified credentials.
    ///
    /// A username is required, plus either an API key or a password and
    /// OpenID. Missing endpoints fall back to the public platform services.
    pub fn new(
        username: Option<&str>,
        api_key: Option<&str>,
        password: Option<&str>,
        open_id: Option<&str>,
        projects_api_endpoint: Option<&str>,
        model_api_endpoint: Option<&str>,
        options: Option<SdkOptions>,
    ) -> Result<Self> {
        let credentials = Credentials::from_parts(username, api_key, password, open_id)?;
        Self::with_credentials(
            credentials,
            Endpoints::new(projects_api_endpoint, model_api_endpoint),
            options.unwrap_or_default(),
        )
    }

    pub fn with_credentials(
        credentials: Credentials,
        endpoints: Endpoints,
        options: SdkOptions,
    ) -> Result<Self> {
        debug!(
            "Creating platform client for {} (projects: {}, model: {})",
            credentials.username(),
            endpoints.projects,
            endpoints.model
        );
        let api = ApiClient::new(credentials, endpoints, &options)?;
        Ok(Self {
            inner: Arc::new(ClientInner { api, options }),
        })
    }

    pub fn platform(&self) -> Platform {
        Platform {
            client: self.clone(),
        }
    }

    pub fn username(&self) -> &str {
        self.inner.api.credentials().username()
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.inner.api.endpoints()
    }

    pub fn options(&self) -> &SdkOptions {
        &self.inner.options
    }

    fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}

impl fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformClient")
            .field("credentials", self.inner.api.credentials())
            .field("endpoints", self.endpoints())
            .finish()
    }
}

fn project_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9 _-]+$").expect("valid project name regex"))
}

/// Check a project name before sending it anywhere.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PlatformError::validation("Project name cannot be empty"));
    }
    if !project_name_pattern().is_match(name) {
        return Err(PlatformError::validation(
            "Project name cannot contain characters other than letters, digits, dashes, underscores and spaces",
        ));
    }
    Ok(())
}

/// Stateless façade over a `PlatformClient`.
#[derive(Debug, Clone)]
pub struct Platform {
    client: PlatformClient,
}

impl Platform {
    /// Create a new app and wait for its provisioning to finish.
    pub async fn create_new_app(
        &self,
        name: &str,
        summary: Option<&str>,
        template_id: Option<&str>,
    ) -> Result<Project> {
        validate_project_name(name)?;
        info!("Creating app '{}'", name);

        let api = self.client.api();
        let request = CreateAppRequest {
            name,
            summary: summary.filter(|s| !s.is_empty()),
            template_id: template_id.filter(|t| !t.is_empty()),
        };
        let accepted: JobAccepted = api
            .post_json(
                Service::Projects,
                APPS_PATH,
                &request,
                Delivery::Once,
                &RequestTarget::default(),
            )
            .await?;
        debug!("App creation accepted as job {}", accepted.job_id);

        let options = self.client.options();
        let poller = JobPoller::new(options.poll_delay, options.max_poll_attempts);
        let job_id = accepted.job_id.as_str();

        let project_id = poller
            .run(job_id, move || async move {
                let path: Vec<&str> = JOBS_PATH.iter().copied().chain([job_id]).collect();
                let target = RequestTarget::default();
                let status: JobStatusResponse =
                    api.get_json(Service::Projects, &path, &target).await?;

                match status.status {
                    JobState::Pending | JobState::Running | JobState::Unknown => {
                        Ok(JobProgress::Pending)
                    }
                    JobState::Completed => status.project_id.map(JobProgress::Done).ok_or_else(
                        || {
                            PlatformError::protocol(format!(
                                "Job {} completed without a project id",
                                job_id
                            ))
                        },
                    ),
                    JobState::Failed => Err(status
                        .error
                        .and_then(|body| body.to_platform_error(&target))
                        .unwrap_or_else(|| {
                            PlatformError::protocol(format!("App creation job {} failed", job_id))
                        })),
                }
            })
            .await?;

        info!("Created app '{}' ({})", name, project_id);
        Ok(Project::new(self.client.clone(), project_id, name))
    }

    /// Check out `revision` of `project` into a new online working copy.
    pub async fn create_online_working_copy(
        &self,
        project: &Project,
        revision: &Revision,
    ) -> Result<OnlineWorkingCopy> {
        if revision.project() != project {
            return Err(PlatformError::validation(format!(
                "Revision belongs to project '{}', not to '{}'",
                revision.project().id(),
                project.id()
            )));
        }

        let branch_name = revision.branch().name();
        info!(
            "Creating working copy of project {} (branch: {}, revision: {})",
            project.id(),
            branch_name.unwrap_or("mainline"),
            revision.num()
        );

        let request = CreateWorkingCopyRequest {
            project_id: project.id(),
            branch_name,
            revision: revision.num(),
        };
        let target = RequestTarget {
            project_id: Some(project.id()),
            branch_name,
            revision: Some(revision.num()),
        };
        let response: WorkingCopyResponse = self
            .client
            .api()
            .post_json(
                Service::Model,
                WORKING_COPIES_PATH,
                &request,
                Delivery::Retry,
                &target,
            )
            .await?;

        debug!(
            "Working copy {} created (model version {})",
            response.id,
            response.model_version.as_deref().unwrap_or("unknown")
        );
        Ok(OnlineWorkingCopy::new(
            self.client.clone(),
            response.id,
            revision.clone(),
            response.model,
        )
        .with_model_version(response.model_version))
    }

    /// Commit the working copy's model to the Team Server.
    ///
    /// `branch_name` and `revision` default to the working copy's source
    /// branch and revision. Commits are never resent: if the response is
    /// lost the error kind is `CommitOutcomeUnknown`.
    pub async fn commit_to_team_server(
        &self,
        working_copy: &mut OnlineWorkingCopy,
        branch_name: Option<&str>,
        revision: Option<i64>,
    ) -> Result<Revision> {
        working_copy.ensure_committable()?;

        let source = working_copy.source_revision().clone();
        let wc_id = working_copy.id().to_owned();
        let branch_name = branch_name.or(source.branch().name()).map(str::to_owned);
        let base_revision = revision.unwrap_or(source.num());
        let project = source.project();

        info!(
            "Committing working copy {} to branch {} (base revision {})",
            wc_id,
            branch_name.as_deref().unwrap_or("mainline"),
            base_revision
        );

        let request = CommitRequest {
            branch_name: branch_name.as_deref(),
            base_revision,
            model: working_copy.model(),
        };
        let target = RequestTarget {
            project_id: Some(project.id()),
            branch_name: branch_name.as_deref(),
            revision: Some(base_revision),
        };
        let path: Vec<&str> = WORKING_COPIES_PATH
            .iter()
            .copied()
            .chain([wc_id.as_str(), "commit"])
            .collect();

        let result: Result<CommitResponse> = self
            .client
            .api()
            .post_json(Service::Model, &path, &request, Delivery::Commit, &target)
            .await;

        match result {
            Ok(response) => {
                working_copy.mark_committed(response.revision);
                info!(
                    "Working copy {} committed as revision {}",
                    wc_id,
                    response.revision
                );
                Ok(Revision::new(
                    response.revision,
                    Branch::new(project.clone(), branch_name),
                ))
            }
            Err(err) => {
                if matches!(err.kind, ErrorKind::Conflict | ErrorKind::NotFound(_)) {
                    working_copy.mark_rejected();
                }
                if err.kind == ErrorKind::CommitOutcomeUnknown {
                    warn!(
                        "Commit of working copy {} may or may not have been applied: {}",
                        wc_id,
                        err
                    );
                }
                Err(err)
            }
        }
    }
}
