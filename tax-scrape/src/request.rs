//! One year's bracket page, from raw HTML to tax owed.

use rust_decimal::Decimal;
use tax_core::{Bracket, BracketTaxCalculator, FilerType, PageSource};
use tracing::{debug, info};

use crate::classify::classify;
use crate::document;
use crate::entities::EntityTable;
use crate::error::ScrapeError;
use crate::extract::extract_tables;
use crate::table::TaxTable;

/// The extracted table markup for one tax year.
///
/// The markup is checked once on construction and never modified. Queries go
/// through [`TaxRequest::document`], which parses it into a borrowed tree.
#[derive(Debug, Clone)]
pub struct TaxRequest {
    year: i32,
    markup: String,
}

impl TaxRequest {
    /// Fetches the page for `year` from `source` and extracts its tables.
    pub async fn fetch(
        source: &dyn PageSource,
        year: i32,
        entities: &EntityTable,
    ) -> Result<Self, ScrapeError> {
        let page = source.fetch_page(year).await?;
        Self::from_html(year, &page, entities)
    }

    /// Extracts the tables of an already fetched page.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Document`] if the extracted markup does not parse.
    pub fn from_html(
        year: i32,
        html: &str,
        entities: &EntityTable,
    ) -> Result<Self, ScrapeError> {
        let markup = extract_tables(html, entities);
        let tables = document::tables(&document::parse(&markup)?).count();
        debug!(year, tables, "parsed table document");

        Ok(Self { year, markup })
    }

    /// The parsed table document.
    pub fn document(&self) -> Result<TableDocument<'_>, ScrapeError> {
        Ok(TableDocument {
            year: self.year,
            doc: document::parse(&self.markup)?,
        })
    }

    /// Validated brackets for `filer`.
    pub fn brackets(
        &self,
        filer: FilerType,
    ) -> Result<Vec<Bracket>, ScrapeError> {
        self.document()?.brackets(filer)
    }

    /// Tax owed by `filer` on each of `incomes`, in input order.
    pub fn tax_owed(
        &self,
        filer: FilerType,
        incomes: &[Decimal],
    ) -> Result<Vec<Decimal>, ScrapeError> {
        self.document()?.tax_owed(filer, incomes)
    }
}

/// A parsed view of a [`TaxRequest`]'s markup. Bracket lists are derived from
/// it on every call.
#[derive(Debug)]
pub struct TableDocument<'a> {
    year: i32,
    doc: roxmltree::Document<'a>,
}

impl TableDocument<'_> {
    /// Every table on the page, in page order.
    pub fn tables(&self) -> Vec<TaxTable<'_>> {
        document::tables(&self.doc)
            .map(|node| TaxTable::new(node))
            .collect()
    }

    /// Tables whose title marks them as income bracket tables.
    pub fn taxable_income_tables(&self) -> Vec<TaxTable<'_>> {
        self.tables()
            .into_iter()
            .filter(TaxTable::is_taxable_income_related)
            .collect()
    }

    /// The first income bracket table that carries brackets for `filer`.
    pub fn table_for(
        &self,
        filer: FilerType,
    ) -> Result<TaxTable<'_>, ScrapeError> {
        let table = self
            .taxable_income_tables()
            .into_iter()
            .find(|table| classify(table, filer).is_some())
            .ok_or(ScrapeError::NoMatchingFilerTable(filer))?;

        info!(
            year = self.year,
            %filer,
            title = %table.title().unwrap_or_default(),
            "selected bracket table"
        );
        Ok(table)
    }

    /// Validated brackets for `filer`.
    pub fn brackets(
        &self,
        filer: FilerType,
    ) -> Result<Vec<Bracket>, ScrapeError> {
        let brackets = self.table_for(filer)?.tax_data(filer)?;
        tax_core::calculations::validate_brackets(&brackets)?;
        Ok(brackets)
    }

    /// Tax owed by `filer` on each of `incomes`, in input order.
    pub fn tax_owed(
        &self,
        filer: FilerType,
        incomes: &[Decimal],
    ) -> Result<Vec<Decimal>, ScrapeError> {
        let brackets = self.brackets(filer)?;
        let calculator = BracketTaxCalculator::new(&brackets)?;
        Ok(calculator.tax_owed_for_all(incomes))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const PAGE: &str = r#"<html><head><title>Brackets</title></head><body>
        <table><caption>Standard Deduction</caption>
          <thead><tr><th>Filing Status</th><th>Deduction Amount</th></tr></thead>
          <tbody><tr><td>Single</td><td>$6,350</td></tr></tbody>
        </table>
        <table><caption>Single Taxable Income Tax Brackets</caption>
          <thead><tr><th>Rate</th><th>Taxable Income Bracket</th></tr></thead>
          <tbody>
            <tr><td>10%</td><td>$0 to $10,000</td></tr>
            <tr><td>20%</td><td>$10,000+</td></tr>
          </tbody>
        </table>
    </body></html>"#;

    fn request() -> TaxRequest {
        TaxRequest::from_html(2017, PAGE, &EntityTable::html()).unwrap()
    }

    #[test]
    fn all_tables_are_kept_in_page_order() {
        let request = request();
        let doc = request.document().unwrap();

        let titles: Vec<String> = doc
            .tables()
            .iter()
            .map(|table| table.title().unwrap())
            .collect();

        assert_eq!(titles, vec!["Standard Deduction", "Single Taxable Income Tax Brackets"]);
        assert_eq!(doc.taxable_income_tables().len(), 1);
    }

    #[test]
    fn tax_owed_uses_the_selected_table() {
        let request = request();

        let owed = request
            .tax_owed(FilerType::Single, &[dec!(5000), dec!(15000)])
            .unwrap();

        assert_eq!(owed, vec![dec!(500.00), dec!(2000.00)]);
    }

    #[test]
    fn filer_without_a_table_is_an_error() {
        let request = request();

        let err = request.brackets(FilerType::Married).unwrap_err();

        assert!(
            matches!(err, ScrapeError::NoMatchingFilerTable(FilerType::Married)),
            "got {err:?}"
        );
    }

    #[test]
    fn bounded_top_bracket_fails_validation() {
        let page = "<table><caption>Single Taxable Income Brackets</caption>\
            <thead><tr><th>Rate</th><th>Taxable Income Bracket</th></tr></thead>\
            <tbody><tr><td>10%</td><td>$0 to $10,000</td></tr></tbody></table>";
        let request = TaxRequest::from_html(2017, page, &EntityTable::html()).unwrap();

        let err = request.brackets(FilerType::Single).unwrap_err();

        assert!(matches!(err, ScrapeError::Brackets(_)), "got {err:?}");
    }

    #[test]
    fn page_without_tables_has_an_empty_document() {
        let request =
            TaxRequest::from_html(2017, "<p>No brackets this year</p>", &EntityTable::html()).unwrap();

        let doc = request.document().unwrap();

        assert!(doc.tables().is_empty());
        assert!(matches!(
            doc.table_for(FilerType::Single),
            Err(ScrapeError::NoMatchingFilerTable(FilerType::Single))
        ));
    }
}
