//! Client for the Mendix Platform APIs.
//!
//! Create apps, check out online working copies, edit their model and commit
//! them back to the Team Server:
//!
//! ```ignore
//! let client = PlatformClient::new(Some(user), Some(api_key), None, None, None, None, None)?;
//! let project = client.platform().create_new_app("NewApp", None, None).await?;
//! let mut wc = project.create_working_copy().await?;
//! Module::create_in(wc.model_mut(), "NewModule");
//! let revision = wc.commit(None, None).await?;
//! ```

mod api;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod model;
pub mod platform;
pub mod working_copy;

pub use config::{ConfigStore, Endpoints, SdkOptions, StoredConfig};
pub use credentials::{AuthMode, Credentials};
pub use domain::{Branch, Project, Revision, LATEST_REVISION};
pub use error::{ErrorKind, NotFoundTarget, PlatformError, Result};
pub use model::{DomainModel, Entity, Location, Model, Module};
pub use platform::{validate_project_name, Platform, PlatformClient};
pub use working_copy::{OnlineWorkingCopy, WorkingCopyState};
