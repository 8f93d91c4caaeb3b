use anyhow::Result;
use chrono::Utc;
use tracing::info;

use mendix_platform_sdk::{Entity, Location, Module};

use super::load_client;

const TARGET_MODULE: &str = "MyFirstModule";

pub async fn run_smoke_test(name: Option<String>, config_dir: Option<String>) -> Result<()> {
    let client = load_client(config_dir)?;
    let name = name
        .unwrap_or_else(|| format!("SmokeTest {}", Utc::now().format("%Y%m%d %H%M%S")));

    println!("1/4 Creating app '{}'...", name);
    let project = client
        .platform()
        .create_new_app(&name, Some("Created by mxsdk smoke-test"), None)
        .await?;

    println!("2/4 Checking out project {}...", project.id());
    let mut wc = project.create_working_copy().await?;

    println!("3/4 Adding an entity to {}...", TARGET_MODULE);
    let model = wc.model_mut();
    if model.domain_model(TARGET_MODULE).is_none() {
        info!("Module {} not found, creating it", TARGET_MODULE);
        Module::create_in(model, TARGET_MODULE);
    }
    if let Some(domain_model) = model.domain_model_mut(TARGET_MODULE) {
        let entity_name = format!("SmokeEntity{}", domain_model.entities.len() + 1);
        domain_model.add_entity(Entity::new(entity_name, Location { x: 100, y: 100 }));
    }

    println!("4/4 Committing working copy {}...", wc.id());
    let revision = wc.commit(None, None).await?;

    println!("\n✅ Smoke test passed");
    println!("   Project: {} ({})", project.name(), project.id());
    println!("   New revision: {}", revision.num());

    Ok(())
}
