use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;
use tax_cli::{Cli, run};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tax-scrape/tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

async fn run_with(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("taxhunt").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(&cli, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn single_report_from_saved_page() {
    let page = fixture("brackets-2017.html");

    let report = run_with(&["-y", "2017", "-f", &page, "49000"]).await.unwrap();

    assert_eq!(report, "49000  7988.75\n");
}

#[tokio::test]
async fn married_report_totals_several_incomes() {
    let page = fixture("brackets-2017.html");

    let report = run_with(&["-y", "2017", "-m", "-f", &page, "49e3", "0"]).await.unwrap();

    assert_eq!(report, "49000  6417.50\n    0  0.00\ntotal  6417.50\n");
}

#[tokio::test]
async fn column_form_page_report() {
    let page = fixture("brackets-2018.html");

    let report = run_with(&["--year", "2018", "--file", &page, "49000"]).await.unwrap();

    assert_eq!(report, "49000  6719.50\n");
}

#[tokio::test]
async fn brackets_flag_writes_csv() {
    let page = fixture("brackets-2018.html");

    let csv = run_with(&["-y", "2018", "-m", "-f", &page, "--brackets"]).await.unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "tax_year,filer_type,min_income,max_income,max_liability,rate");
    assert!(lines[1].starts_with("2018,married,0,19050,"), "got {}", lines[1]);
    assert!(lines[7].starts_with("2018,married,600000,,,"), "got {}", lines[7]);
}

#[tokio::test]
async fn missing_page_file_fails() {
    let result = run_with(&["-y", "2017", "-f", "/nonexistent/taxhunt.html", "49000"]).await;

    let err = result.unwrap_err();
    assert!(
        format!("{err:#}").contains("/nonexistent/taxhunt.html"),
        "got {err:#}"
    );
}

#[tokio::test]
async fn config_first_year_is_enforced() {
    let config = std::env::temp_dir().join(format!("taxhunt-config-{}.toml", std::process::id()));
    std::fs::write(&config, "first_year = 2018\n").unwrap();
    let page = fixture("brackets-2017.html");

    let result = run_with(&[
        "-y",
        "2017",
        "-c",
        &config.display().to_string(),
        "-f",
        &page,
        "49000",
    ])
    .await;
    std::fs::remove_file(&config).unwrap();

    assert!(result.is_err());
}
