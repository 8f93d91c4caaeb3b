use anyhow::Result;

use mendix_platform_sdk::{Project, LATEST_REVISION};

use super::load_client;

pub async fn run_checkout(
    project_id: String,
    branch: Option<String>,
    revision: Option<i64>,
    config_dir: Option<String>,
) -> Result<()> {
    let client = load_client(config_dir)?;
    let project = Project::new(client, project_id, "");
    let branch = match branch {
        Some(name) => project.branch(name),
        None => project.mainline(),
    };
    let revision = branch.revision(revision.unwrap_or(LATEST_REVISION));

    let wc = revision.create_working_copy().await?;

    println!("✅ Working copy {}", wc.id());
    println!("   Branch: {}", branch.name().unwrap_or("mainline"));
    if revision.is_latest() {
        println!("   Revision: latest");
    } else {
        println!("   Revision: {}", revision.num());
    }
    if let Some(version) = wc.model_version() {
        println!("   Model version: {}", version);
    }
    for (module, domain_model) in wc.model().all_domain_models() {
        println!("   {:<32} {} entities", module, domain_model.entities.len());
    }

    Ok(())
}
