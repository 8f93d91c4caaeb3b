use anyhow::Result;

use super::load_client;

pub async fn run_create_app(
    name: String,
    summary: Option<String>,
    template_id: Option<String>,
    config_dir: Option<String>,
) -> Result<()> {
    let client = load_client(config_dir)?;

    println!("Creating app '{}'...", name);
    let project = client
        .platform()
        .create_new_app(&name, summary.as_deref(), template_id.as_deref())
        .await?;

    println!("✅ Created app '{}'", project.name());
    println!("   Project id: {}", project.id());

    Ok(())
}
