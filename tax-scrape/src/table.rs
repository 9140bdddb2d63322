//! Read-only view over one extracted `<table>`.

use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;

use crate::document::{elements, first_element, text};
use crate::error::ScrapeError;

static TAXABLE_INCOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)taxable.*income").expect("valid regex"));
static RATES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)rates").expect("valid regex"));
static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)brackets").expect("valid regex"));

/// A `<table>` node with accessors for the parts bracket parsing needs.
///
/// Nothing is cached; every accessor walks the node again.
#[derive(Debug, Clone, Copy)]
pub struct TaxTable<'a> {
    node: Node<'a, 'a>,
}

impl<'a> TaxTable<'a> {
    pub fn new(node: Node<'a, 'a>) -> Self {
        Self { node }
    }

    /// Number of `<th>` cells, or the `<td>` count of the first row when the
    /// table has no header cells.
    pub fn columns(&self) -> usize {
        let headers = elements(self.node, "th").count();
        if headers > 0 {
            return headers;
        }
        first_element(self.node, "tr").map_or(0, |row| elements(row, "td").count())
    }

    /// Caption text, falling back to the text of the header group.
    pub fn title(&self) -> Result<String, ScrapeError> {
        first_element(self.node, "caption")
            .or_else(|| first_element(self.node, "thead"))
            .map(text)
            .ok_or(ScrapeError::MissingElement("caption"))
    }

    pub fn headers(&self) -> Result<Vec<String>, ScrapeError> {
        let thead = first_element(self.node, "thead").ok_or(ScrapeError::MissingElement("thead"))?;

        Ok(elements(thead, "th").map(text).collect())
    }

    /// Body cell texts grouped into rows of [`columns`](Self::columns) cells.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::IncompleteRow`] when the cells do not divide evenly into
    /// rows.
    pub fn data(&self) -> Result<Vec<Vec<String>>, ScrapeError> {
        let body = first_element(self.node, "tbody").unwrap_or(self.node);
        let cells: Vec<String> = elements(body, "td").map(text).collect();

        let columns = self.columns();
        if cells.is_empty() {
            return Ok(Vec::new());
        }
        if columns == 0 || cells.len() % columns != 0 {
            return Err(ScrapeError::IncompleteRow {
                cells: cells.len(),
                columns,
            });
        }

        Ok(cells.chunks(columns).map(<[String]>::to_vec).collect())
    }

    /// Heuristic: the title mentions taxable income, or mentions both rates
    /// and brackets. Untitled tables never qualify.
    pub fn is_taxable_income_related(&self) -> bool {
        match self.title() {
            Ok(title) => {
                TAXABLE_INCOME.is_match(&title)
                    || (RATES.is_match(&title) && BRACKETS.is_match(&title))
            }
            Err(_) => false,
        }
    }
}

/// Runs `check` over the tables extracted from `html`.
#[cfg(test)]
pub(crate) fn with_tables<R>(
    html: &str,
    check: impl FnOnce(&[TaxTable<'_>]) -> R,
) -> R {
    let markup = crate::extract::extract_tables(html, &crate::entities::EntityTable::html());
    let doc = crate::document::parse(&markup).expect("extracted markup parses");
    let tables: Vec<TaxTable<'_>> = crate::document::tables(&doc).map(|node| TaxTable::new(node)).collect();
    check(&tables)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn with_first_table<R>(
        html: &str,
        check: impl FnOnce(TaxTable<'_>) -> R,
    ) -> R {
        with_tables(html, |tables| check(tables[0]))
    }

    const DEDICATED: &str = "<table>\
        <caption>Table 1. Single Taxable Income Tax Brackets and Rates, 2017</caption>\
        <thead><tr><th>Rate</th><th>Taxable Income Bracket</th><th>Tax Owed</th></tr></thead>\
        <tbody>\
        <tr><td>10%</td><td>$0 to $9,325</td><td>10% of Taxable Income</td></tr>\
        <tr><td>15%</td><td>$9,325 to $37,950</td><td>$932.50 plus 15%</td></tr>\
        </tbody></table>";

    // =========================================================================
    // shape tests
    // =========================================================================

    #[test]
    fn columns_counts_header_cells() {
        let columns = with_first_table(DEDICATED, |table| table.columns());

        assert_eq!(columns, 3);
    }

    #[test]
    fn columns_falls_back_to_first_row_cells() {
        let columns = with_first_table(
            "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>",
            |table| table.columns(),
        );

        assert_eq!(columns, 2);
    }

    #[test]
    fn empty_table_has_no_columns() {
        with_first_table("<table></table>", |table| {
            assert_eq!(table.columns(), 0);
            assert_eq!(table.data().unwrap(), Vec::<Vec<String>>::new());
        });
    }

    // =========================================================================
    // title and header tests
    // =========================================================================

    #[test]
    fn title_prefers_caption() {
        let title = with_first_table(DEDICATED, |table| table.title().unwrap());

        assert_eq!(title, "Table 1. Single Taxable Income Tax Brackets and Rates, 2017");
    }

    #[test]
    fn title_falls_back_to_thead_text() {
        let title = with_first_table(
            "<table><thead><tr><th>Rate</th><th>Brackets</th></tr></thead></table>",
            |table| table.title().unwrap(),
        );

        assert_eq!(title, "RateBrackets");
    }

    #[test]
    fn untitled_table_reports_missing_caption() {
        let err = with_first_table("<table><tr><td>10%</td></tr></table>", |table| {
            table.title().unwrap_err()
        });

        assert!(matches!(err, ScrapeError::MissingElement("caption")), "got {err:?}");
    }

    #[test]
    fn headers_are_thead_cells_in_order() {
        let headers = with_first_table(DEDICATED, |table| table.headers().unwrap());

        assert_eq!(headers, vec!["Rate", "Taxable Income Bracket", "Tax Owed"]);
    }

    #[test]
    fn headers_require_thead() {
        let err = with_first_table("<table><caption>x</caption></table>", |table| {
            table.headers().unwrap_err()
        });

        assert!(matches!(err, ScrapeError::MissingElement("thead")), "got {err:?}");
    }

    #[test]
    fn entity_text_in_cells_is_decoded() {
        let headers = with_first_table(
            "<table><thead><tr><th>Rate&nbsp;(%)</th><th>Income &amp; Bracket</th></tr></thead></table>",
            |table| table.headers().unwrap(),
        );

        assert_eq!(headers, vec!["Rate\u{A0}(%)", "Income & Bracket"]);
    }

    // =========================================================================
    // data tests
    // =========================================================================

    #[test]
    fn data_chunks_body_cells_into_rows() {
        let rows = with_first_table(DEDICATED, |table| table.data().unwrap());

        assert_eq!(
            rows,
            vec![
                vec!["10%", "$0 to $9,325", "10% of Taxable Income"],
                vec!["15%", "$9,325 to $37,950", "$932.50 plus 15%"],
            ]
        );
    }

    #[test]
    fn data_without_tbody_reads_whole_table() {
        let rows = with_first_table(
            "<table><tr><td>10%</td><td>$0</td></tr><tr><td>12%</td><td>$9,526</td></tr></table>",
            |table| table.data().unwrap(),
        );

        assert_eq!(rows, vec![vec!["10%", "$0"], vec!["12%", "$9,526"]]);
    }

    #[test]
    fn trailing_partial_row_is_an_error() {
        let err = with_first_table(
            "<table><thead><tr><th>Rate</th><th>Bracket</th></tr></thead>\
             <tbody><tr><td>10%</td><td>$0</td></tr><tr><td>12%</td></tr></tbody></table>",
            |table| table.data().unwrap_err(),
        );

        assert!(
            matches!(err, ScrapeError::IncompleteRow { cells: 3, columns: 2 }),
            "got {err:?}"
        );
    }

    // =========================================================================
    // relevance tests
    // =========================================================================

    #[test]
    fn taxable_income_title_is_related() {
        assert!(with_first_table(DEDICATED, |table| table.is_taxable_income_related()));
    }

    #[test]
    fn rates_and_brackets_title_is_related() {
        let related = with_first_table(
            "<table><caption>Tax Brackets and Rates, 2018</caption></table>",
            |table| table.is_taxable_income_related(),
        );

        assert!(related);
    }

    #[test]
    fn unrelated_titles_are_not_related() {
        let related: Vec<bool> = with_tables(
            "<table><caption>Standard Deduction and Personal Exemption</caption></table>\
             <table><caption>Marginal rates only</caption></table>\
             <table><tr><td>untitled</td></tr></table>",
            |tables| tables.iter().map(TaxTable::is_taxable_income_related).collect(),
        );

        assert_eq!(related, vec![false, false, false]);
    }
}
