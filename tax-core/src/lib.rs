pub mod calculations;
pub mod models;
pub mod source;

pub use calculations::{BracketError, BracketTaxCalculator};
pub use models::*;
pub use source::{FetchError, PageSource, SourceConfig};
