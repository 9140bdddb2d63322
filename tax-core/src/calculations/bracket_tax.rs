//! Progressive tax accumulation over an ordered bracket list.
//!
//! Tax owed for an income is the sum, over every bracket the income has
//! entered (`min < income`), of either the bracket's full liability (the
//! income is past the bracket's `max`) or the partial liability
//! `(income − min) × rate` (the income falls inside the bracket).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Bracket, BracketBound, BracketTaxCalculator};
//!
//! // 2017, single filers (first three brackets plus an open top).
//! let brackets = vec![
//!     Bracket::new(dec!(0.10), dec!(0), BracketBound::Bounded(dec!(9325))),
//!     Bracket::new(dec!(0.15), dec!(9325), BracketBound::Bounded(dec!(37950))),
//!     Bracket::new(dec!(0.25), dec!(37950), BracketBound::Unbounded),
//! ];
//!
//! let calculator = BracketTaxCalculator::new(&brackets).unwrap();
//!
//! assert_eq!(calculator.tax_owed(dec!(49000)), dec!(7988.75));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::{Bracket, BracketBound};

/// Errors raised when a bracket list does not describe a progressive schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    /// No brackets were provided for the calculation.
    #[error("no tax brackets provided")]
    NoBrackets,

    /// A bracket other than the last one has no upper bound.
    #[error("bracket {index} has no upper bound but is not the top bracket")]
    UnboundedBeforeTop { index: usize },

    /// The last bracket has an upper bound, leaving higher incomes untaxed.
    #[error("top bracket is capped at {max}; expected an unbounded top bracket")]
    BoundedTop { max: Decimal },

    /// A bracket starts below the previous bracket's upper bound.
    #[error("bracket {index} starts at {min}, below the previous upper bound {previous_max}")]
    Overlapping {
        index: usize,
        min: Decimal,
        previous_max: Decimal,
    },

    /// A bracket's upper bound is below its own lower bound.
    #[error("bracket {index} ends at {max}, below its lower bound {min}")]
    Inverted {
        index: usize,
        min: Decimal,
        max: Decimal,
    },
}

/// Checks that `brackets`, in order, form non-decreasing, non-overlapping
/// `[min, max)` intervals ending in exactly one unbounded bracket.
pub fn validate_brackets(brackets: &[Bracket]) -> Result<(), BracketError> {
    let Some(last_index) = brackets.len().checked_sub(1) else {
        return Err(BracketError::NoBrackets);
    };

    let mut previous_max: Option<Decimal> = None;

    for (index, bracket) in brackets.iter().enumerate() {
        if let Some(previous_max) = previous_max {
            if bracket.min < previous_max {
                return Err(BracketError::Overlapping {
                    index,
                    min: bracket.min,
                    previous_max,
                });
            }
        }

        match bracket.max {
            BracketBound::Bounded(max) if index == last_index => {
                return Err(BracketError::BoundedTop { max });
            }
            BracketBound::Bounded(max) if max < bracket.min => {
                return Err(BracketError::Inverted {
                    index,
                    min: bracket.min,
                    max,
                });
            }
            BracketBound::Bounded(max) => previous_max = Some(max),
            BracketBound::Unbounded if index != last_index => {
                return Err(BracketError::UnboundedBeforeTop { index });
            }
            BracketBound::Unbounded => {}
        }
    }

    Ok(())
}

/// Calculator over one filer type's validated bracket list.
#[derive(Debug, Clone)]
pub struct BracketTaxCalculator<'a> {
    brackets: &'a [Bracket],
}

impl<'a> BracketTaxCalculator<'a> {
    /// Creates a calculator, rejecting bracket lists that are not a
    /// progressive schedule.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError`] if the list is empty, out of order,
    /// overlapping, or does not end in a single unbounded bracket.
    pub fn new(brackets: &'a [Bracket]) -> Result<Self, BracketError> {
        validate_brackets(brackets)?;
        Ok(Self { brackets })
    }

    /// Tax owed on `income`. Incomes at or below the first bracket's lower
    /// bound owe nothing.
    pub fn tax_owed(
        &self,
        income: Decimal,
    ) -> Decimal {
        let owed: Decimal = self
            .brackets
            .iter()
            .filter(|bracket| bracket.min < income)
            .map(|bracket| self.bracket_contribution(bracket, income))
            .sum();

        debug!(%income, %owed, "computed tax owed");
        owed
    }

    /// Tax owed for each income, in input order.
    pub fn tax_owed_for_all(
        &self,
        incomes: &[Decimal],
    ) -> Vec<Decimal> {
        incomes.iter().map(|income| self.tax_owed(*income)).collect()
    }

    /// Liability one entered bracket contributes for `income`.
    fn bracket_contribution(
        &self,
        bracket: &Bracket,
        income: Decimal,
    ) -> Decimal {
        match (bracket.max, bracket.max_liability) {
            (BracketBound::Bounded(max), BracketBound::Bounded(liability)) if income > max => {
                liability
            }
            _ => (income - bracket.min) * bracket.rate,
        }
    }
}
