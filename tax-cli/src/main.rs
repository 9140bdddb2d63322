use anyhow::Result;
use clap::Parser;
use tax_cli::{Cli, logging, run_to_stdout};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_file.as_deref())?;

    run_to_stdout(&cli).await
}
