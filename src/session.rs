//! The statement currently loaded into the app and the user's filters.

use std::path::Path;

use time::Date;

use crate::{
    Error,
    category::{CategoryColors, extract_categories},
    csv_import::{ParsedStatement, RowIssue, parse_statement},
    dashboard::{
        MonthRow, PieDatum, aggregate_by_month, aggregate_pie, transaction_details,
        visible_expense_total,
    },
    filters::{DateWindow, filter_by_date_window},
    transaction::Transaction,
};

/// A loaded statement together with the filters applied to it.
///
/// Loading a new statement replaces the whole session. Everything shown on
/// the dashboard is derived from the session on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    file_name: String,
    statement: ParsedStatement,
    categories: Vec<String>,
    colors: CategoryColors,
    window: DateWindow,
    selected: Vec<String>,
}

impl Session {
    /// Parses `text` and starts a session with every category selected and no date limits.
    ///
    /// # Errors
    /// Returns [Error::InvalidCSV] if the statement cannot be read as CSV.
    pub fn load(file_name: &str, text: &str) -> Result<Self, Error> {
        let statement = parse_statement(text)?;
        let categories = extract_categories(&statement.transactions);
        let colors = CategoryColors::new(&categories);

        tracing::info!(
            "Loaded {} transactions and {} categories from {file_name} with {} row issues",
            statement.transactions.len(),
            categories.len(),
            statement.issues.len()
        );

        Ok(Self {
            file_name: file_name.to_owned(),
            selected: categories.clone(),
            statement,
            categories,
            colors,
            window: DateWindow::open(),
        })
    }

    /// Reads the statement at `path` and loads it into a new session.
    ///
    /// # Errors
    /// Returns [Error::ReadStatement] if the file cannot be read as text, or
    /// [Error::InvalidCSV] if the statement cannot be read as CSV.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|error| Error::ReadStatement(format!("{}: {error}", path.display())))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::load(&file_name, &text)
    }

    /// The name of the uploaded file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Every transaction in the statement, ignoring the filters.
    pub fn transactions(&self) -> &[Transaction] {
        &self.statement.transactions
    }

    /// The problems found while parsing the statement.
    pub fn issues(&self) -> &[RowIssue] {
        &self.statement.issues
    }

    /// The categories found in the statement, including the synthetic ones.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The chart color of each category.
    pub fn colors(&self) -> &CategoryColors {
        &self.colors
    }

    /// The date window the charts are limited to.
    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// The selected categories, in the same order as [Session::categories].
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Whether `category` is shown in the charts.
    pub fn is_selected(&self, category: &str) -> bool {
        self.selected.iter().any(|selected| selected == category)
    }

    /// Limits the charts to `window`.
    pub fn set_window(&mut self, window: DateWindow) {
        self.window = window;
    }

    /// Selects `categories`, ignoring any that are not in the statement.
    pub fn set_selection(&mut self, categories: &[String]) {
        self.selected = self
            .categories
            .iter()
            .filter(|category| categories.contains(category))
            .cloned()
            .collect();
    }

    /// Selects every category in the statement.
    pub fn select_all(&mut self) {
        self.selected = self.categories.clone();
    }

    /// Clears the selection, leaving the pie chart empty.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// The transactions inside the current date window.
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        filter_by_date_window(&self.statement.transactions, &self.window)
    }

    /// The monthly category totals of the transactions inside the date window.
    pub fn month_rows(&self) -> Vec<MonthRow> {
        aggregate_by_month(&self.visible_transactions())
    }

    /// The pie chart slices for the selected categories.
    pub fn pie_data(&self) -> Vec<PieDatum> {
        aggregate_pie(&self.month_rows(), &self.selected)
    }

    /// The total of the expenses shown in the pie chart.
    pub fn visible_total(&self) -> i64 {
        visible_expense_total(&self.pie_data())
    }

    /// The transactions behind the bar of `category_id` in `month`.
    pub fn details(&self, month: &str, category_id: &str) -> Vec<&Transaction> {
        transaction_details(&self.statement.transactions, month, category_id)
    }

    /// The earliest and latest valid transaction dates in the statement.
    pub fn date_span(&self) -> Option<(Date, Date)> {
        let mut dates = self
            .statement
            .transactions
            .iter()
            .filter_map(Transaction::parsed_date);

        let first = dates.next()?;

        Some(dates.fold((first, first), |(earliest, latest), date| {
            (earliest.min(date), latest.max(date))
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use time::macros::date;

    use crate::{Error, filters::DateWindow, test_utils::STATEMENT};

    use super::Session;

    fn session() -> Session {
        Session::load("statement.csv", STATEMENT).unwrap()
    }

    #[test]
    fn load_selects_every_category() {
        let session = session();

        assert_eq!(
            session.categories(),
            ["groceries", "income", "transport", "unknown", "pot transfer"]
        );
        assert_eq!(session.selected(), session.categories());
        assert_eq!(session.window(), DateWindow::open());
        assert_eq!(session.transactions().len(), 5);
        assert_eq!(session.issues().len(), 1);
    }

    #[test]
    fn month_rows_follow_window() {
        let mut session = session();
        session.set_window(
            DateWindow::new(Some(date!(2024 - 04 - 01)), Some(date!(2024 - 05 - 01))).unwrap(),
        );

        let rows = session.month_rows();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, "4/2024");
        assert_eq!(rows[0].totals.get("transport"), Some(3));
        assert_eq!(rows[0].totals.get("unknown"), Some(4));
    }

    #[test]
    fn pie_follows_selection() {
        let mut session = session();
        session.set_selection(&["transport".to_owned(), "groceries".to_owned()]);

        let pie = session.pie_data();

        let ids: Vec<&str> = pie.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["groceries", "transport"]);
        assert_eq!(session.visible_total(), 25 + 3);
    }

    #[test]
    fn income_category_is_never_in_pie() {
        let session = session();

        let pie = session.pie_data();

        assert!(pie.iter().all(|datum| datum.id != "income"));
        assert_eq!(session.visible_total(), 25 + 50 + 3 + 4);
    }

    #[test]
    fn selection_ignores_unknown_categories_and_keeps_category_order() {
        let mut session = session();

        session.set_selection(&[
            "pot transfer".to_owned(),
            "not a category".to_owned(),
            "groceries".to_owned(),
        ]);

        assert_eq!(session.selected(), ["groceries", "pot transfer"]);
        assert!(session.is_selected("groceries"));
        assert!(!session.is_selected("not a category"));
    }

    #[test]
    fn select_and_deselect_all() {
        let mut session = session();

        session.deselect_all();
        assert!(session.selected().is_empty());
        assert!(session.pie_data().is_empty());

        session.select_all();
        assert_eq!(session.selected(), session.categories());
    }

    #[test]
    fn details_ignore_date_window() {
        let mut session = session();
        session.set_window(
            DateWindow::new(Some(date!(2024 - 04 - 01)), Some(date!(2024 - 05 - 01))).unwrap(),
        );

        let details = session.details("3/2024", "groceries");

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].id, "tx_01");
    }

    #[test]
    fn date_span_covers_all_transactions() {
        assert_eq!(
            session().date_span(),
            Some((date!(2024 - 03 - 01), date!(2024 - 04 - 11)))
        );
    }

    #[test]
    fn date_span_of_empty_statement_is_none() {
        let session = Session::load("empty.csv", "").unwrap();

        assert_eq!(session.date_span(), None);
    }

    #[test]
    fn load_file_reports_missing_file() {
        let result = Session::load_file(Path::new("/definitely/not/a/statement.csv"));

        assert!(matches!(result, Err(Error::ReadStatement(_))));
    }
}
