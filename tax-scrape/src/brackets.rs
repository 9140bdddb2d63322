//! Bracket rows read out of free-text table cells.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use tax_core::calculations::add_max_liability;
use tax_core::calculations::common::rate_from_percent;
use tax_core::{Bracket, BracketBound, FilerType, ParsedBracket};
use tracing::{debug, warn};

use crate::classify::{bound_terms, classify, find_header};
use crate::error::ScrapeError;
use crate::table::TaxTable;

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(\.\d+)?)%").expect("valid regex"));
static DOLLARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+(\.\d+)?)").expect("valid regex"));
static UPPER_BOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"to \$?(\d+(\.\d+)?)").expect("valid regex"));

const RATE_COLUMN: [&str; 1] = ["rate"];

/// First `N%` in `text`, as a fraction.
pub fn parse_rate(text: &str) -> Result<Decimal, ScrapeError> {
    let malformed = || ScrapeError::MalformedCellText {
        column: "rate".to_string(),
        text: text.to_string(),
        expected: "a percentage in (0, 100]",
    };

    let percent = first_number(&PERCENT, text).ok_or_else(malformed)?;
    let rate = rate_from_percent(percent);
    if rate <= Decimal::ZERO || rate > Decimal::ONE {
        return Err(malformed());
    }
    Ok(rate)
}

/// First `$N` in `text`, ignoring thousands separators.
pub fn parse_min(text: &str) -> Result<Decimal, ScrapeError> {
    first_number(&DOLLARS, &text.replace(',', "")).ok_or_else(|| ScrapeError::MalformedCellText {
        column: "bracket".to_string(),
        text: text.to_string(),
        expected: "a dollar lower bound",
    })
}

/// The amount after `to`; a bracket with none is the open top bracket.
///
/// # Errors
///
/// [`ScrapeError::MalformedCellText`] when an amount follows `to` but is not
/// a representable number.
pub fn parse_max(text: &str) -> Result<BracketBound, ScrapeError> {
    let stripped = text.replace(',', "");
    let Some(amount) = UPPER_BOUND.captures(&stripped).and_then(|caps| caps.get(1)) else {
        return Ok(BracketBound::Unbounded);
    };

    amount
        .as_str()
        .parse()
        .map(BracketBound::Bounded)
        .map_err(|_| ScrapeError::MalformedCellText {
            column: "bracket".to_string(),
            text: text.to_string(),
            expected: "a dollar upper bound",
        })
}

fn first_number(
    pattern: &Regex,
    text: &str,
) -> Option<Decimal> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl TaxTable<'_> {
    /// Parsed brackets for `filer`, in row order, with maximum liability
    /// attached.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::NotTaxableIncomeRelated`] for tables about something
    ///   other than income brackets
    /// - [`ScrapeError::NoMatchingFilerTable`] when the table carries no
    ///   brackets for `filer`
    /// - [`ScrapeError::HeaderTermNotFound`] and
    ///   [`ScrapeError::MalformedCellText`] for unreadable rows
    pub fn tax_data(
        &self,
        filer: FilerType,
    ) -> Result<Vec<Bracket>, ScrapeError> {
        if !self.is_taxable_income_related() {
            return Err(ScrapeError::NotTaxableIncomeRelated {
                title: self.title().unwrap_or_default(),
            });
        }
        let shape = classify(self, filer).ok_or(ScrapeError::NoMatchingFilerTable(filer))?;

        let headers = self.headers()?;
        let rate_column = header_index(&headers, &RATE_COLUMN)?;
        let bound_column = header_index(&headers, &bound_terms(filer, shape))?;
        debug!(%filer, ?shape, rate_column, bound_column, "located bracket columns");

        let parsed = self
            .data()?
            .iter()
            .enumerate()
            .map(|(index, row)| {
                parse_row(&row[rate_column], &row[bound_column]).inspect_err(|err| {
                    warn!(%filer, row = index, %err, "rejected bracket row");
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(add_max_liability(parsed))
    }
}

fn header_index(
    headers: &[String],
    terms: &[&str],
) -> Result<usize, ScrapeError> {
    find_header(headers, terms).ok_or_else(|| ScrapeError::HeaderTermNotFound {
        terms: terms.iter().map(|t| t.to_string()).collect(),
    })
}

fn parse_row(
    rate: &str,
    bounds: &str,
) -> Result<ParsedBracket, ScrapeError> {
    Ok(ParsedBracket {
        rate: parse_rate(rate)?,
        min: parse_min(bounds)?,
        max: parse_max(bounds)?,
    })
}
