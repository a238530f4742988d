//! Collapses the monthly totals into one value per category for the pie chart.

use crate::{
    category::INCOME_CATEGORY,
    dashboard::aggregation::{CategoryTotals, MonthRow},
};

/// One slice of the pie chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieDatum {
    /// The text shown for the slice.
    pub label: String,
    /// The category of the slice.
    pub id: String,
    /// The category total summed across every month.
    pub value: i64,
}

/// Sums each category across every month in `rows`.
///
/// Only categories in `selected` are kept and income is always left out.
/// Slices are ordered by when their category first appears in `rows`.
pub fn aggregate_pie(rows: &[MonthRow], selected: &[String]) -> Vec<PieDatum> {
    let mut merged = CategoryTotals::default();

    for row in rows {
        for (category, total) in row.totals.iter() {
            merged.add(category, total);
        }
    }

    merged
        .iter()
        .filter(|(category, _)| selected.iter().any(|selected| selected == *category))
        .filter(|(category, _)| *category != INCOME_CATEGORY)
        .map(|(category, value)| PieDatum {
            label: category.to_owned(),
            id: category.to_owned(),
            value,
        })
        .collect()
}

/// The total of the expenses currently shown in the pie chart.
pub fn visible_expense_total(pie: &[PieDatum]) -> i64 {
    pie.iter().map(|datum| datum.value).sum()
}
