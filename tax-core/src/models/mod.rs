mod filer_type;
mod tax_bracket;

pub use filer_type::FilerType;
pub use tax_bracket::{Bracket, BracketBound, ParsedBracket};
