use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod command;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_dir = cli.config_dir;
    match cli.command {
        Some(Commands::Login(args)) => command::run_login(args, config_dir).await?,
        Some(Commands::Logout) => command::run_logout(config_dir).await?,
        Some(Commands::Status) => command::run_status(config_dir).await?,
        Some(Commands::CreateApp {
            name,
            summary,
            template_id,
        }) => command::run_create_app(name, summary, template_id, config_dir).await?,
        Some(Commands::Checkout {
            project_id,
            branch,
            revision,
        }) => command::run_checkout(project_id, branch, revision, config_dir).await?,
        Some(Commands::SmokeTest { name }) => command::run_smoke_test(name, config_dir).await?,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'mxsdk login' to store credentials.");
        }
    }

    Ok(())
}
