//! Card components for the dashboard summary.
//!
//! Provides two cards:
//! - The statement that is loaded, with its transaction count and date span
//! - The total of the expenses currently shown in the pie chart

use maud::{Markup, html};
use time::{Date, macros::format_description};

use crate::html::format_currency_rounded;

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Formats a date the same way the statement does, e.g. "01/03/2024".
fn format_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Renders the card describing the loaded statement.
pub(super) fn statement_card(
    file_name: &str,
    transaction_count: usize,
    issue_count: usize,
    date_span: Option<(Date, Date)>,
) -> Markup {
    html! {
        div id="statement-card" class=(CARD_STYLE) {
            h4 class="text-lg font-semibold mb-3 truncate" title=(file_name) {
                (file_name)
            }

            div class="text-3xl font-bold mb-1" {
                (transaction_count) " transactions"
            }

            @if let Some((earliest, latest)) = date_span {
                div class="text-sm text-gray-600 dark:text-gray-400" {
                    (format_date(earliest)) " to " (format_date(latest))
                }
            }

            @if issue_count > 0 {
                div class="mt-2 text-sm font-medium text-red-600 dark:text-red-400" {
                    (issue_count) " rows had problems, see the table below"
                }
            }
        }
    }
}

/// Renders the card with the total of the visible expenses.
pub(super) fn visible_total_card(total: i64) -> Markup {
    html! {
        div id="visible-total-card" class=(CARD_STYLE) {
            h4 class="text-lg font-semibold mb-3" { "Visible Expenses" }

            div class="text-3xl font-bold mb-1" {
                (format_currency_rounded(total))
            }

            div class="text-sm text-gray-600 dark:text-gray-400" {
                "Selected categories in the date range"
            }
        }
    }
}
