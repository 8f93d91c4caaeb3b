//! Online working copies.
//!
//! A working copy is checked out from one source revision and holds its own
//! model, which callers edit locally before committing it back.

use std::fmt;

use crate::domain::{Project, Revision};
use crate::error::{PlatformError, Result};
use crate::model::Model;
use crate::platform::PlatformClient;

/// Lifecycle of a working copy. `Committed` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingCopyState {
    Created,
    /// Committed as the given revision number
    Committed { revision: i64 },
    /// The server refused the commit target (outdated or missing)
    Rejected,
}

impl WorkingCopyState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkingCopyState::Created)
    }
}

pub struct OnlineWorkingCopy {
    client: PlatformClient,
    id: String,
    source_revision: Revision,
    model: Model,
    model_version: Option<String>,
    state: WorkingCopyState,
}

impl OnlineWorkingCopy {
    pub fn new(
        client: PlatformClient,
        id: impl Into<String>,
        source_revision: Revision,
        model: Model,
    ) -> Self {
        Self {
            client,
            id: id.into(),
            source_revision,
            model,
            model_version: None,
            state: WorkingCopyState::Created,
        }
    }

    pub(crate) fn with_model_version(mut self, version: Option<String>) -> Self {
        self.model_version = version;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client(&self) -> &PlatformClient {
        &self.client
    }

    pub fn source_revision(&self) -> &Revision {
        &self.source_revision
    }

    pub fn project(&self) -> &Project {
        self.source_revision.project()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Model version reported by the server at checkout
    pub fn model_version(&self) -> Option<&str> {
        self.model_version.as_deref()
    }

    pub fn state(&self) -> WorkingCopyState {
        self.state
    }

    /// Commit the model to `branch_name` (default: the source branch) on top
    /// of `revision` (default: the source revision).
    pub async fn commit(
        &mut self,
        branch_name: Option<&str>,
        revision: Option<i64>,
    ) -> Result<Revision> {
        let platform = self.client.platform();
        platform
            .commit_to_team_server(self, branch_name, revision)
            .await
    }

    pub(crate) fn ensure_committable(&self) -> Result<()> {
        match self.state {
            WorkingCopyState::Created => Ok(()),
            WorkingCopyState::Committed { revision } => Err(PlatformError::conflict(format!(
                "Working copy {} was already committed as revision {}",
                self.id, revision
            ))),
            WorkingCopyState::Rejected => Err(PlatformError::conflict(format!(
                "Working copy {} was rejected by the Team Server and cannot be committed again",
                self.id
            ))),
        }
    }

    pub(crate) fn mark_committed(&mut self, revision: i64) {
        self.state = WorkingCopyState::Committed { revision };
    }

    pub(crate) fn mark_rejected(&mut self) {
        self.state = WorkingCopyState::Rejected;
    }
}

impl fmt::Debug for OnlineWorkingCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnlineWorkingCopy")
            .field("id", &self.id)
            .field("source_revision", &self.source_revision)
            .field("model_version", &self.model_version)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, SdkOptions};
    use crate::credentials::Credentials;
    use crate::error::ErrorKind;

    fn working_copy() -> OnlineWorkingCopy {
        let client = PlatformClient::with_credentials(
            Credentials::api_key("someone", "key").unwrap(),
            Endpoints::default(),
            SdkOptions::default(),
        )
        .unwrap();
        let revision = Project::new(client.clone(), "p-1", "App").mainline().revision(2);
        OnlineWorkingCopy::new(client, "wc-1", revision, Model::default())
    }

    #[test]
    fn test_new_working_copy_is_created() {
        let wc = working_copy();
        assert_eq!(wc.state(), WorkingCopyState::Created);
        assert!(wc.ensure_committable().is_ok());
        assert_eq!(wc.project().id(), "p-1");
        assert_eq!(wc.source_revision().num(), 2);
    }

    #[test]
    fn test_terminal_states_refuse_commit() {
        let mut wc = working_copy();
        wc.mark_committed(3);
        assert!(wc.state().is_terminal());
        let err = wc.ensure_committable().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.to_string().contains("revision 3"));

        let mut wc = working_copy();
        wc.mark_rejected();
        assert_eq!(wc.ensure_committable().unwrap_err().kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_model_is_owned_per_working_copy() {
        let mut a = working_copy();
        let b = working_copy();
        crate::model::Module::create_in(a.model_mut(), "NewModule");
        assert_eq!(a.model().modules.len(), 1);
        assert!(b.model().modules.is_empty());
    }
}
