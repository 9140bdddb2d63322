//! Bracket arithmetic: enrichment of parsed rows, sequence validation and
//! progressive tax accumulation.

pub mod bracket_tax;
pub mod common;
pub mod liability;

pub use bracket_tax::{BracketError, BracketTaxCalculator, validate_brackets};
pub use liability::add_max_liability;
