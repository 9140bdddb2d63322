//! Per-bracket maximum liability.

use crate::models::{Bracket, ParsedBracket};

/// Attaches `max_liability` to every parsed bracket, preserving order.
///
/// Each bracket is independent: the unbounded top bracket gets an unbounded
/// liability, every other bracket `rate × (max − min)`.
pub fn add_max_liability(parsed: impl IntoIterator<Item = ParsedBracket>) -> Vec<Bracket> {
    parsed.into_iter().map(Bracket::from).collect()
}
