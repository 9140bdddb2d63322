use std::io::{self, Write};

use anyhow::{Context, Result};
use tax_core::PageSource;
use tax_scrape::{EntityTable, FilePageSource, HttpPageSource, TaxRequest};
use tracing::info;

use crate::args::Cli;
use crate::config::AppConfig;
use crate::output::{format_report, write_brackets_csv};

/// The page source selected by the command line: a saved file, or the
/// configured URL.
pub fn page_source(
    cli: &Cli,
    config: &AppConfig,
) -> Result<Box<dyn PageSource>> {
    match &cli.file {
        Some(path) => Ok(Box::new(FilePageSource::new(path))),
        None => {
            let source = HttpPageSource::new(config.source.clone())
                .context("Failed to build HTTP client")?;
            Ok(Box::new(source))
        }
    }
}

/// Fetches the page, then writes either the tax report or the bracket CSV.
pub async fn run<W: Write>(
    cli: &Cli,
    out: W,
) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?.with_timeout(cli.timeout);
    config.check_year(cli.year)?;

    let source = page_source(cli, &config)?;
    let entities = EntityTable::html();
    let request = TaxRequest::fetch(source.as_ref(), cli.year, &entities)
        .await
        .with_context(|| format!("Failed to read bracket page: {}", source.location(cli.year)))?;

    let filer = cli.filer_type();
    if cli.brackets {
        let brackets = request
            .brackets(filer)
            .with_context(|| format!("No usable {filer} brackets for {}", cli.year))?;
        return write_brackets_csv(out, cli.year, filer, &brackets);
    }

    let owed = request
        .tax_owed(filer, &cli.incomes)
        .with_context(|| format!("Failed to compute {filer} tax for {}", cli.year))?;
    info!(year = cli.year, %filer, incomes = cli.incomes.len(), "computed tax owed");

    write_report(out, &format_report(&cli.incomes, &owed))
}

fn write_report<W: Write>(
    mut out: W,
    report: &str,
) -> Result<()> {
    out.write_all(report.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// [`run`] against stdout.
pub async fn run_to_stdout(cli: &Cli) -> Result<()> {
    run(cli, io::stdout().lock()).await
}
