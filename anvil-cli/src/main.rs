//! Anvil CLI
//!
//! Command-line interface for constructing pipelines from seed files.

mod commands;
mod config;
mod seed_file;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "anvil")]
#[command(about = "Anvil pipeline construction CLI", long_about = None)]
struct Cli {
    /// Project the pipeline belongs to
    #[arg(long, env = "ANVIL_PROJECT_ID", default_value = "1")]
    project: u64,

    /// First internal id handed out per project
    #[arg(long, env = "ANVIL_IID_START", default_value = "1")]
    iid_start: u64,

    /// Protected ref patterns (comma-separated, `release/*` style wildcards)
    #[arg(long, env = "ANVIL_PROTECTED_REFS", value_delimiter = ',')]
    protect: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anvil=info,anvil_chain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        project_id: cli.project,
        iid_start: cli.iid_start,
        protected_refs: cli.protect,
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
