use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, Local};
use clap::Parser;
use rust_decimal::Decimal;
use tax_core::FilerType;

/// Earliest year the bracket pages are published in table form.
pub const FIRST_TAX_YEAR: i32 = 2014;

/// Largest exponent accepted in `<digits>e<digits>` incomes.
const MAX_INCOME_EXPONENT: usize = 20;

/// Calculate federal income tax owed from the published bracket tables.
///
/// Fetches the bracket page for the given year, finds the table for the
/// filing status and prints the tax owed on each income.
#[derive(Parser, Debug)]
#[command(name = "taxhunt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Tax year to look up
    #[arg(short, long, value_parser = parse_year)]
    pub year: i32,

    /// Use the married-filing-jointly brackets instead of single
    #[arg(short, long, default_value_t = false)]
    pub married: bool,

    /// Taxable incomes, as integers or <digits>e<digits> (64e3 = 64000)
    #[arg(value_parser = parse_income, required_unless_present = "brackets")]
    pub incomes: Vec<Decimal>,

    /// Read a saved bracket page instead of fetching it
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HTTP timeout in seconds, overriding the configuration file
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the parsed brackets as CSV instead of computing tax
    #[arg(long, default_value_t = false)]
    pub brackets: bool,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn filer_type(&self) -> FilerType {
        if self.married {
            FilerType::Married
        } else {
            FilerType::Single
        }
    }
}

/// Accepts a year between [`FIRST_TAX_YEAR`] and the current year.
pub fn parse_year(s: &str) -> Result<i32, String> {
    let year: i32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a year"))?;
    let current = Local::now().year();

    if !(FIRST_TAX_YEAR..=current).contains(&year) {
        return Err(format!(
            "year must be between {FIRST_TAX_YEAR} and {current}, got {year}"
        ));
    }
    Ok(year)
}

/// Accepts `49000` or `49e3` (the exponent marker is case-insensitive).
pub fn parse_income(s: &str) -> Result<Decimal, String> {
    let invalid = || format!("'{s}' is not an income; use digits, optionally followed by e<digits>");
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let (mantissa, exponent) = match s.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent),
        None => (s, "0"),
    };
    if !is_digits(mantissa) || !is_digits(exponent) {
        return Err(invalid());
    }

    let exponent: usize = exponent.parse().map_err(|_| invalid())?;
    if exponent > MAX_INCOME_EXPONENT {
        return Err(format!("'{s}' is too large"));
    }

    let digits = format!("{mantissa}{}", "0".repeat(exponent));
    Decimal::from_str(&digits).map_err(|_| format!("'{s}' is too large"))
}
