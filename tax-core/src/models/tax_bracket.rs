use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper end of a bracket, or the liability accrued by completing one.
///
/// `Unbounded` only ever describes the top bracket; a bound that could not be
/// read from the page is a parse error, never `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketBound {
    Bounded(Decimal),
    Unbounded,
}

impl BracketBound {
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Bounded(amount) => Some(*amount),
            Self::Unbounded => None,
        }
    }
}

impl From<Option<Decimal>> for BracketBound {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Self::Unbounded, Self::Bounded)
    }
}

impl fmt::Display for BracketBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(amount) => write!(f, "{amount}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// One bracket as read from a table row, before enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBracket {
    /// Marginal rate as a fraction (0.10 for 10%).
    pub rate: Decimal,
    pub min: Decimal,
    pub max: BracketBound,
}

/// A bracket together with the most tax it can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub rate: Decimal,
    pub min: Decimal,
    pub max: BracketBound,
    /// `rate × (max − min)`, or `Unbounded` for the top bracket.
    pub max_liability: BracketBound,
}

impl Bracket {
    pub fn new(
        rate: Decimal,
        min: Decimal,
        max: BracketBound,
    ) -> Self {
        let max_liability = match max {
            BracketBound::Bounded(max) => BracketBound::Bounded(rate * (max - min)),
            BracketBound::Unbounded => BracketBound::Unbounded,
        };

        Self {
            rate,
            min,
            max,
            max_liability,
        }
    }
}

impl From<ParsedBracket> for Bracket {
    fn from(parsed: ParsedBracket) -> Self {
        Bracket::new(parsed.rate, parsed.min, parsed.max)
    }
}
