use tax_core::{BracketError, FetchError, FilerType};
use thiserror::Error;

/// Errors that can occur while turning a bracket page into bracket lists.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("table {title:?} does not describe taxable income brackets")]
    NotTaxableIncomeRelated { title: String },

    #[error("no bracket table found for {0} filers")]
    NoMatchingFilerTable(FilerType),

    #[error("cannot read {expected} from {column} cell {text:?}")]
    MalformedCellText {
        column: String,
        text: String,
        expected: &'static str,
    },

    #[error("no header matches all of {terms:?}")]
    HeaderTermNotFound { terms: Vec<String> },

    #[error("table has no <{0}> element")]
    MissingElement(&'static str),

    #[error("{cells} data cells do not fill rows of {columns} columns")]
    IncompleteRow { cells: usize, columns: usize },

    #[error("Malformed table document: {0}")]
    Document(#[from] roxmltree::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid brackets: {0}")]
    Brackets(#[from] BracketError),
}
