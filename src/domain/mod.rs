//! Version-control addresses: projects, branches and revisions.
//!
//! These are immutable values. A branch carries its project and a revision
//! carries its branch, so a revision alone is enough to address a checkout.
//! Existence is only checked by the server when the address is used.

use std::fmt;

use crate::error::Result;
use crate::platform::PlatformClient;
use crate::working_copy::OnlineWorkingCopy;

/// Revision number meaning "the latest revision of the branch"
pub const LATEST_REVISION: i64 = -1;

/// A Team Server project (an app).
#[derive(Clone)]
pub struct Project {
    client: PlatformClient,
    id: String,
    name: String,
}

impl Project {
    pub fn new(client: PlatformClient, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &PlatformClient {
        &self.client
    }

    pub fn mainline(&self) -> Branch {
        Branch::new(self.clone(), None)
    }

    pub fn branch(&self, name: impl Into<String>) -> Branch {
        Branch::new(self.clone(), Some(name.into()))
    }

    /// Check out the latest mainline revision.
    pub async fn create_working_copy(&self) -> Result<OnlineWorkingCopy> {
        self.mainline().latest().create_working_copy().await
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Project {}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// A branch of a project; `None` is the mainline.
#[derive(Clone, PartialEq, Eq)]
pub struct Branch {
    project: Project,
    name: Option<String>,
}

impl Branch {
    pub fn new(project: Project, name: Option<String>) -> Self {
        Self { project, name }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_mainline(&self) -> bool {
        self.name.is_none()
    }

    pub fn latest(&self) -> Revision {
        Revision::new(LATEST_REVISION, self.clone())
    }

    pub fn revision(&self, num: i64) -> Revision {
        Revision::new(num, self.clone())
    }
}

impl fmt::Debug for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branch")
            .field("project", &self.project.id)
            .field("name", &self.name.as_deref().unwrap_or("mainline"))
            .finish()
    }
}

/// A revision on a branch; `LATEST_REVISION` means whatever is newest.
#[derive(Clone, PartialEq, Eq)]
pub struct Revision {
    num: i64,
    branch: Branch,
}

impl Revision {
    pub fn new(num: i64, branch: Branch) -> Self {
        Self { num, branch }
    }

    pub fn num(&self) -> i64 {
        self.num
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    pub fn project(&self) -> &Project {
        self.branch.project()
    }

    pub fn is_latest(&self) -> bool {
        self.num == LATEST_REVISION
    }

    /// Check out a fresh working copy of this revision.
    pub async fn create_working_copy(&self) -> Result<OnlineWorkingCopy> {
        let project = self.project();
        project
            .client()
            .platform()
            .create_online_working_copy(project, self)
            .await
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Revision")
            .field("num", &self.num)
            .field("branch", &self.branch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, SdkOptions};
    use crate::credentials::Credentials;

    fn project(id: &str) -> Project {
        let client = PlatformClient::with_credentials(
            Credentials::api_key("someone", "key").unwrap(),
            Endpoints::default(),
            SdkOptions::default(),
        )
        .unwrap();
        Project::new(client, id, "Roundtrip Integration")
    }

    #[test]
    fn test_mainline_latest() {
        let revision = project("p-1").mainline().latest();
        assert!(revision.is_latest());
        assert!(revision.branch().is_mainline());
        assert_eq!(revision.branch().name(), None);
        assert_eq!(revision.project().id(), "p-1");
    }

    #[test]
    fn test_named_branch_revision() {
        let revision = project("p-1").branch("Feature").revision(12);
        assert_eq!(revision.num(), 12);
        assert_eq!(revision.branch().name(), Some("Feature"));
        assert!(!revision.is_latest());
    }

    #[test]
    fn test_equality_ignores_client_and_name() {
        let a = project("p-1");
        let b = Project::new(a.client().clone(), "p-1", "renamed");
        assert_eq!(a, b);
        assert_eq!(a.mainline().revision(3), b.mainline().revision(3));
        assert_ne!(a.mainline().revision(3), b.branch("x").revision(3));
        assert_ne!(a, project("p-2"));
    }

    #[test]
    fn test_debug_shows_addresses() {
        let revision = project("p-1").mainline().revision(7);
        let debug_str = format!("{:?}", revision);
        assert!(debug_str.contains("p-1"));
        assert!(debug_str.contains("mainline"));
        assert!(debug_str.contains('7'));
    }
}
