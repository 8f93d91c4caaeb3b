use anyhow::Result;

use mendix_platform_sdk::{AuthMode, ConfigStore};

pub async fn run_status(config_dir: Option<String>) -> Result<()> {
    let store = ConfigStore::new(config_dir)?;
    let config = store.load()?;

    match config.credentials() {
        Ok(credentials) => {
            let mode = match credentials.auth() {
                AuthMode::ApiKey(_) => "API key",
                AuthMode::Password { .. } => "password and OpenID",
            };
            let endpoints = config.endpoints();
            println!("✅ Credentials configured for {}", credentials.username());
            println!("   Authentication: {}", mode);
            println!("   Projects API: {}", endpoints.projects);
            println!("   Model API: {}", endpoints.model);
            if config.accept_invalid_certs {
                println!("   ⚠️  TLS certificate validation is disabled");
            }
        }
        Err(_) => {
            println!("❌ No credentials configured");
            println!("   Run 'mxsdk login' or set MENDIX_USERNAME and MENDIX_API_KEY.");
        }
    }

    Ok(())
}
