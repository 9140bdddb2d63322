//! Filer-type classification of bracket tables.
//!
//! Pages publish brackets in one of two shapes: one table per filer type
//! (the caption names the filer), or one table with a bounds column per filer
//! type (the header names the filer).

use tax_core::FilerType;
use tracing::debug;

use crate::table::TaxTable;

/// Tables with at least this many columns can hold one column per filer type.
pub const MIN_FILER_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// Bounds for several filer types side by side, one column each.
    Column,
    /// A table devoted to a single filer type.
    Dedicated,
}

impl TaxTable<'_> {
    /// Concatenated header text, lowercased. Tables without a `<thead>` have
    /// no header text.
    fn header_text(&self) -> String {
        self.headers()
            .map(|headers| headers.concat().to_lowercase())
            .unwrap_or_default()
    }

    /// Wide table whose headers name `filer`.
    pub fn has_filer_column(
        &self,
        filer: FilerType,
    ) -> bool {
        self.columns() >= MIN_FILER_COLUMNS && self.header_text().contains(filer.term())
    }

    /// Narrow table whose title, but not its headers, names `filer`.
    pub fn is_dedicated_table(
        &self,
        filer: FilerType,
    ) -> bool {
        if self.columns() >= MIN_FILER_COLUMNS || self.header_text().contains(filer.term()) {
            return false;
        }
        self.title()
            .map(|title| title.to_lowercase().contains(filer.term()))
            .unwrap_or(false)
    }
}

/// The shape in which `table` carries brackets for `filer`, if it does.
pub fn classify(
    table: &TaxTable<'_>,
    filer: FilerType,
) -> Option<TableShape> {
    let shape = if table.has_filer_column(filer) {
        Some(TableShape::Column)
    } else if table.is_dedicated_table(filer) {
        Some(TableShape::Dedicated)
    } else {
        None
    };

    debug!(%filer, columns = table.columns(), ?shape, "classified table");
    shape
}

/// Header terms that identify the bounds column for `filer` in a table of
/// the given shape.
pub fn bound_terms(
    filer: FilerType,
    shape: TableShape,
) -> Vec<&'static str> {
    match shape {
        TableShape::Column => vec![filer.term(), "filers"],
        TableShape::Dedicated => vec!["taxable", "income", "bracket"],
    }
}

/// Index of the first header containing every one of `terms`,
/// case-insensitively.
pub fn find_header(
    headers: &[String],
    terms: &[&str],
) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.to_lowercase();
        terms.iter().all(|term| header.contains(&term.to_lowercase()))
    })
}
