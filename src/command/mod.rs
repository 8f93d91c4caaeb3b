mod checkout;
mod create_app;
mod login;
mod logout;
mod smoke_test;
mod status;

use anyhow::{Context, Result};

use mendix_platform_sdk::{ConfigStore, PlatformClient};

pub use checkout::run_checkout;
pub use create_app::run_create_app;
pub use login::run_login;
pub use logout::run_logout;
pub use smoke_test::run_smoke_test;
pub use status::run_status;

/// Client built from the stored config plus environment overrides.
fn load_client(config_dir: Option<String>) -> Result<PlatformClient> {
    let config = ConfigStore::new(config_dir)?.load()?;
    config
        .to_client()
        .context("No usable credentials. Run 'mxsdk login' first")
}
