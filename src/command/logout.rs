use anyhow::Result;

use mendix_platform_sdk::ConfigStore;

pub async fn run_logout(config_dir: Option<String>) -> Result<()> {
    let store = ConfigStore::new(config_dir)?;

    if !store.read_file()?.has_credentials() {
        println!("No credentials are stored.");
        return Ok(());
    }

    store.remove()?;
    println!("✅ Removed stored credentials.");

    Ok(())
}
