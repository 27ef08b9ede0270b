mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_search, handle_status, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            no_llm,
            graph_out,
        } => {
            handle_search(cli.config.as_deref(), query, no_llm, graph_out).await?;
        }
        Commands::Status => {
            handle_status(cli.config.as_deref())?;
        }
    }

    Ok(())
}
