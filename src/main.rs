mod cli;
mod logging;
mod model;
mod orchestrator;
mod presentation;
mod registry;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init(&args)?;
    tracing::debug!(?args, "starting");

    cli::run(args).await
}
