//! Groups transactions by month and totals them by category.
//!
//! Totals use the sign convention of the bar chart: spending is positive and
//! income is negative. Every transaction subtracts its signed amount from the
//! running total of its category, and the total is rounded to a whole unit
//! after every transaction, not just at the end. Repeated rounding can drift
//! from the exact sum by up to one unit per transaction.

use crate::{
    category::{INCOME_CATEGORY, POT_TRANSFER_CATEGORY, UNKNOWN_CATEGORY},
    transaction::Transaction,
};

/// Category totals in the order the categories were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals(Vec<(String, i64)>);

impl CategoryTotals {
    /// Subtracts `amount` from the total for `category` and rounds the result.
    fn accumulate(&mut self, category: &str, amount: f64) {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total = round_half_up(*total as f64 - amount),
            None => self
                .0
                .push((category.to_owned(), round_half_up(-amount))),
        }
    }

    /// Adds `value` to the total for `category` without rounding.
    pub(super) fn add(&mut self, category: &str, value: i64) {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += value,
            None => self.0.push((category.to_owned(), value)),
        }
    }

    /// The total for `category`, if any transaction contributed to it.
    pub fn get(&self, category: &str) -> Option<i64> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    /// The categories and their totals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, total)| (name.as_str(), *total))
    }
}

/// The category totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRow {
    /// The month as "month/year", e.g. "3/2024".
    pub month: String,
    /// The totals for each category with a transaction in the month.
    pub totals: CategoryTotals,
}

/// Rounds to the nearest whole number, with halves rounded up.
///
/// Unlike [f64::round], -2.5 rounds to -2 rather than -3.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// The category a transaction counts towards in the monthly totals.
///
/// Pot transfers take precedence over everything else. Other negative amounts
/// are expenses in their own category, or [UNKNOWN_CATEGORY] if they have
/// none. Everything else is income.
pub fn total_category(transaction: &Transaction) -> &str {
    if transaction.is_pot_transfer() {
        POT_TRANSFER_CATEGORY
    } else if transaction.amount_value() < 0.0 {
        if transaction.category.is_empty() {
            UNKNOWN_CATEGORY
        } else {
            &transaction.category
        }
    } else {
        INCOME_CATEGORY
    }
}

/// Groups `transactions` by month and totals each month by category.
///
/// Months appear in the order they are first seen in `transactions`.
/// Transactions with a date that cannot be parsed have no month and are skipped.
pub fn aggregate_by_month(transactions: &[&Transaction]) -> Vec<MonthRow> {
    let mut rows: Vec<MonthRow> = Vec::new();

    for transaction in transactions {
        let Some(month) = transaction.month_key() else {
            tracing::warn!(
                "Skipping transaction {} with invalid date {:?}",
                transaction.id,
                transaction.date
            );
            continue;
        };

        let row_index = match rows.iter().position(|row| row.month == month) {
            Some(index) => index,
            None => {
                rows.push(MonthRow {
                    month,
                    totals: CategoryTotals::default(),
                });
                rows.len() - 1
            }
        };

        rows[row_index]
            .totals
            .accumulate(total_category(transaction), transaction.amount_value());
    }

    rows
}

/// Lines up the monthly totals of each category for a stacked bar chart.
///
/// Returns one `(category, values)` pair per category in `categories` that
/// has a total in at least one month. `values` has one entry per row in
/// `rows`, with `None` for months without a total for that category.
/// [INCOME_CATEGORY] is never included.
pub fn category_series(
    rows: &[MonthRow],
    categories: &[String],
) -> Vec<(String, Vec<Option<f64>>)> {
    categories
        .iter()
        .filter(|category| category.as_str() != INCOME_CATEGORY)
        .filter_map(|category| {
            let values: Vec<Option<f64>> = rows
                .iter()
                .map(|row| row.totals.get(category).map(|total| total as f64))
                .collect();

            let has_total = values.iter().any(Option::is_some);
            has_total.then(|| (category.clone(), values))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::transaction::Transaction;

    use super::{MonthRow, aggregate_by_month, category_series, round_half_up, total_category};

    fn tx(date: &str, transaction_type: &str, category: &str, amount: &str) -> Transaction {
        Transaction::build("tx", date, transaction_type, category, amount)
    }

    fn aggregate(transactions: &[Transaction]) -> Vec<MonthRow> {
        let refs: Vec<&Transaction> = transactions.iter().collect();
        aggregate_by_month(&refs)
    }

    #[test]
    fn groups_food_and_pot_transfer_in_one_month() {
        let transactions = vec![
            tx("01/03/2024", "payment", "food", "-10"),
            tx("02/03/2024", "pot deposit", "", "-5"),
        ];

        let rows = aggregate(&transactions);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, "3/2024");
        assert_eq!(
            rows[0].totals.iter().collect::<Vec<_>>(),
            vec![("food", 10), ("pot transfer", 5)]
        );
    }

    #[test]
    fn positive_amount_only_counts_as_income() {
        let transactions = vec![tx("01/03/2024", "Faster payment", "food", "20")];

        let rows = aggregate(&transactions);

        assert_eq!(
            rows[0].totals.iter().collect::<Vec<_>>(),
            vec![("income", -20)]
        );
        assert_eq!(rows[0].totals.get("food"), None);
    }

    #[test]
    fn pot_transfer_takes_precedence_over_income() {
        let transaction = tx("01/03/2024", "Pot Withdrawal", "savings", "50");

        assert_eq!(total_category(&transaction), "pot transfer");
    }

    #[test]
    fn expense_without_category_is_unknown() {
        let transaction = tx("01/03/2024", "Card payment", "", "-3.20");

        assert_eq!(total_category(&transaction), "unknown");
    }

    #[test]
    fn zero_amount_is_income() {
        let transaction = tx("01/03/2024", "Card payment", "food", "0");

        assert_eq!(total_category(&transaction), "income");
    }

    #[test]
    fn months_keep_first_seen_order() {
        let transactions = vec![
            tx("15/04/2024", "Card payment", "food", "-1"),
            tx("15/03/2024", "Card payment", "food", "-1"),
            tx("20/04/2024", "Card payment", "food", "-1"),
            tx("01/12/2023", "Card payment", "food", "-1"),
        ];

        let months: Vec<String> = aggregate(&transactions)
            .into_iter()
            .map(|row| row.month)
            .collect();

        assert_eq!(months, vec!["4/2024", "3/2024", "12/2023"]);
    }

    #[test]
    fn rounds_after_every_transaction() {
        let transactions = vec![
            tx("01/03/2024", "Card payment", "food", "-0.4"),
            tx("02/03/2024", "Card payment", "food", "-0.4"),
            tx("03/03/2024", "Card payment", "food", "-0.4"),
        ];

        let rows = aggregate(&transactions);

        // The exact sum is 1.2, but each 0.4 is rounded away before the next is added.
        assert_eq!(rows[0].totals.get("food"), Some(0));
    }

    #[test]
    fn round_half_up_rounds_halves_towards_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(1.49), 1);
    }

    #[test]
    fn invalid_dates_are_skipped() {
        let transactions = vec![
            tx("not a date", "Card payment", "food", "-10"),
            tx("01/03/2024", "Card payment", "food", "-1"),
        ];

        let rows = aggregate(&transactions);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].totals.get("food"), Some(1));
    }

    #[test]
    fn month_total_is_negated_sum_of_amounts() {
        let amounts = [
            "-12.34", "-0.99", "250.00", "-7.5", "-100.01", "3.49", "-0.5", "-19.99",
        ];
        let types = ["Card payment", "Pot transfer", "Faster payment"];
        let categories = ["food", "", "bills"];
        let transactions: Vec<Transaction> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| {
                tx(
                    "10/05/2024",
                    types[i % types.len()],
                    categories[i % categories.len()],
                    amount,
                )
            })
            .collect();
        let exact: f64 = transactions.iter().map(|t| t.amount_value()).sum();

        let rows = aggregate(&transactions);

        let total: i64 = rows[0].totals.iter().map(|(_, total)| total).sum();
        let difference = (total as f64 - -exact).abs();
        assert!(
            difference <= transactions.len() as f64,
            "total {total} too far from {}",
            -exact
        );
    }

    #[test]
    fn category_series_lines_up_months() {
        let transactions = vec![
            tx("01/03/2024", "Card payment", "food", "-10"),
            tx("01/04/2024", "Card payment", "bills", "-20"),
            tx("02/04/2024", "Card payment", "food", "-5"),
            tx("03/04/2024", "Salary", "", "1000"),
        ];
        let rows = aggregate(&transactions);
        let categories = vec![
            "food".to_owned(),
            "bills".to_owned(),
            "unknown".to_owned(),
            "income".to_owned(),
        ];

        let series = category_series(&rows, &categories);

        assert_eq!(
            series,
            vec![
                ("food".to_owned(), vec![Some(10.0), Some(5.0)]),
                ("bills".to_owned(), vec![None, Some(20.0)]),
            ]
        );
    }
}
