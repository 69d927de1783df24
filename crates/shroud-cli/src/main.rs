mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Redact(args) => commands::redact::handle(args).await,
        cli::Commands::Scan(args) => commands::scan::handle(args).await,
        cli::Commands::Config { path } => commands::config::handle(path),
        cli::Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
