use std::io::Write;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::common::round_half_up;
use tax_core::{Bracket, FilerType};

/// One bracket as written by `--brackets`.
///
/// - `tax_year`: The tax year the page was fetched for
/// - `filer_type`: `single` or `married`
/// - `min_income`: Lower bound of the bracket
/// - `max_income`: Upper bound (empty for the top bracket)
/// - `max_liability`: Tax owed on the whole bracket (empty for the top bracket)
/// - `rate`: The marginal rate as a decimal (e.g., 0.10)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub filer_type: &'static str,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub max_liability: Option<Decimal>,
    pub rate: Decimal,
}

impl BracketRecord {
    pub fn new(
        tax_year: i32,
        filer: FilerType,
        bracket: &Bracket,
    ) -> Self {
        Self {
            tax_year,
            filer_type: filer.term(),
            min_income: bracket.min,
            max_income: bracket.max.amount(),
            max_liability: bracket.max_liability.amount(),
            rate: bracket.rate,
        }
    }
}

/// Writes `brackets` as CSV with a header row.
pub fn write_brackets_csv<W: Write>(
    writer: W,
    tax_year: i32,
    filer: FilerType,
    brackets: &[Bracket],
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for bracket in brackets {
        csv.serialize(BracketRecord::new(tax_year, filer, bracket))?;
    }
    csv.flush()?;
    Ok(())
}

/// One line per income with the tax owed in cents, then a total when there
/// is more than one income.
pub fn format_report(
    incomes: &[Decimal],
    owed: &[Decimal],
) -> String {
    let mut lines: Vec<(String, Decimal)> = incomes
        .iter()
        .zip(owed)
        .map(|(income, owed)| (income.to_string(), *owed))
        .collect();

    if lines.len() > 1 {
        let total: Decimal = owed.iter().sum();
        lines.push(("total".to_string(), total));
    }

    let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    lines
        .iter()
        .map(|(label, amount)| format!("{label:>width$}  {:.2}\n", round_half_up(*amount)))
        .collect()
}
