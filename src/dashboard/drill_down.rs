//! Finds the transactions behind one segment of the monthly bar chart.

use crate::{category::UNKNOWN_CATEGORY, transaction::Transaction};

/// Gets the transactions for the bar chart segment of `category_id` in `month`.
///
/// `month` is a month key such as "3/2024" and is matched against the raw
/// date text of each transaction as a substring, e.g. "01/03/2024" contains
/// "3/2024". This also matches other months whose text happens to contain the
/// key: "1/2024" matches "05/11/2024" as well as "05/01/2024".
///
/// For [UNKNOWN_CATEGORY], transactions without a category that are not pot
/// transfers are returned. Otherwise the category must match exactly.
///
/// All of `transactions` are searched, regardless of the current date window.
pub fn transaction_details<'a>(
    transactions: &'a [Transaction],
    month: &str,
    category_id: &str,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.date.contains(month))
        .filter(|transaction| {
            if category_id == UNKNOWN_CATEGORY {
                transaction.category.is_empty() && !transaction.is_pot_transfer()
            } else {
                transaction.category == category_id
            }
        })
        .collect()
}
