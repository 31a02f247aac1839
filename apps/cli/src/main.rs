//! pressmill CLI — batch driver for the press-corpus pipeline.
//!
//! Converts harvested press-export files into analysis-ready artifacts
//! (tabular, corpus markup, statistics, plots, summaries).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
