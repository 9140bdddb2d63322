//! Tax bracket tables scraped out of published HTML pages.
//!
//! Pipeline: raw page → [`extract::extract_tables`] (table-only, well-formed
//! markup) → [`document::parse`] (strict `roxmltree` tree) → [`TaxTable`]
//! views → [`classify()`] by filer type → [`TaxTable::tax_data`] brackets.
//! [`TaxRequest`] runs the whole pipeline for one year.

pub mod brackets;
pub mod classify;
pub mod document;
pub mod entities;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod request;
pub mod table;

pub use classify::{TableShape, classify, find_header};
pub use entities::EntityTable;
pub use error::ScrapeError;
pub use fetch::{FilePageSource, HttpPageSource};
pub use request::{TableDocument, TaxRequest};
pub use table::TaxTable;
