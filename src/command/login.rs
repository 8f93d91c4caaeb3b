use anyhow::{Context, Result};

use mendix_platform_sdk::{ConfigStore, Credentials, StoredConfig};

use crate::cli::LoginArgs;

pub async fn run_login(args: LoginArgs, config_dir: Option<String>) -> Result<()> {
    let store = ConfigStore::new(config_dir)?;
    let existing = store.read_file()?;

    // Reject incomplete credentials before anything is written
    Credentials::from_parts(
        Some(&args.username),
        args.api_key.as_deref(),
        args.password.as_deref(),
        args.openid.as_deref(),
    )
    .context("Cannot log in")?;

    if existing.has_credentials() {
        println!(
            "⚠️  Replacing stored credentials for {}",
            existing.username.as_deref().unwrap_or("unknown user")
        );
    }

    let config = StoredConfig {
        username: Some(args.username),
        api_key: args.api_key,
        password: args.password,
        open_id: args.openid,
        projects_api_endpoint: args.projects_api.or(existing.projects_api_endpoint),
        model_api_endpoint: args.model_api.or(existing.model_api_endpoint),
        accept_invalid_certs: false,
    };
    store.save(&config)?;

    println!(
        "✅ Credentials for {} saved to {}",
        config.username.as_deref().unwrap_or_default(),
        store.config_path().display()
    );

    Ok(())
}
