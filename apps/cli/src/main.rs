//! DocReview CLI: scrape help-center articles and review them with an LLM.
//!
//! `extract` writes the articles file; `analyze` turns it into
//! four-criterion editorial reports.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
