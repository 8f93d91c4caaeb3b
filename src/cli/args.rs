use clap::{Args, Parser, Subcommand};

/// mxsdk - create Mendix apps and commit model changes from the command line
#[derive(Parser)]
#[command(name = "mxsdk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.json. Defaults to ~/.mendix
    #[arg(long, global = true, env = "MENDIX_CONFIG_DIR")]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store platform credentials
    Login(LoginArgs),
    /// Remove stored credentials
    Logout,
    /// Show the stored configuration
    Status,
    /// Create a new app and wait until it is provisioned
    CreateApp {
        /// App name (letters, digits, spaces, dashes and underscores)
        name: String,

        #[arg(long)]
        summary: Option<String>,

        #[arg(long)]
        template_id: Option<String>,
    },
    /// Check out a revision into an online working copy
    Checkout {
        project_id: String,

        /// Branch name. Defaults to the mainline
        #[arg(short, long)]
        branch: Option<String>,

        /// Revision number. Defaults to the latest revision
        #[arg(short, long)]
        revision: Option<i64>,
    },
    /// Create an app, add an entity and commit it
    SmokeTest {
        /// App name. Defaults to a timestamped name
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub username: String,

    #[arg(long, conflicts_with_all = ["password", "openid"])]
    pub api_key: Option<String>,

    #[arg(long, requires = "openid")]
    pub password: Option<String>,

    #[arg(long, requires = "password")]
    pub openid: Option<String>,

    /// Projects API endpoint (for non-public deployments)
    #[arg(long)]
    pub projects_api: Option<String>,

    /// Model API endpoint (for non-public deployments)
    #[arg(long)]
    pub model_api: Option<String>,
}
