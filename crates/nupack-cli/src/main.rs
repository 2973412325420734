//! nupack - build and publish .nupkg packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nupack_cli::cmd;
use nupack_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            nuspec,
            base_path,
            output_dir,
        } => cmd::pack::pack(&nuspec, base_path.as_deref(), &output_dir),
        Commands::Push {
            package,
            source,
            api_key,
        } => cmd::push::push(&package, source.as_deref(), api_key.as_deref()).await,
    }
}
