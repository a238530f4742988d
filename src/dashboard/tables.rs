//! Table views for dashboard data display.
//!
//! Provides HTML table components for the monthly category totals, the
//! transactions behind one bar of the monthly chart, and the rows of the
//! statement that could not be read cleanly.

use maud::{Markup, html};

use crate::{
    category::INCOME_CATEGORY,
    csv_import::RowIssue,
    dashboard::aggregation::MonthRow,
    html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
        format_currency_rounded,
    },
    transaction::Transaction,
};

// Table cell styles for the monthly totals
const TABLE_HEADER_CELL_STYLE: &str = "px-3 py-3 text-center min-w-[100px]";
const TABLE_HEADER_FIRST_CELL_STYLE: &str =
    "px-3 py-3 sticky left-0 bg-gray-100 dark:bg-gray-700 z-10 font-semibold";
const TABLE_STICKY_CELL_STYLE: &str = "px-3 py-4 font-medium text-gray-900 dark:text-white sticky left-0 bg-white dark:bg-gray-800 z-10";
const TABLE_DATA_CELL_STYLE: &str = "text-center whitespace-nowrap";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for money in, red for money out).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders the monthly category totals with one column per month.
///
/// Rows follow `categories` with income last, and only categories with a
/// total in at least one month are shown. Totals use the chart convention
/// where spending is positive.
pub(super) fn monthly_totals_table(rows: &[MonthRow], categories: &[String]) -> Markup {
    if rows.is_empty() {
        return html! {};
    }

    let income = (!categories.iter().any(|category| category == INCOME_CATEGORY))
        .then_some(INCOME_CATEGORY);
    let shown: Vec<&str> = categories
        .iter()
        .map(String::as_str)
        .chain(income)
        .filter(|category| rows.iter().any(|row| row.totals.get(category).is_some()))
        .collect();

    html! {
        div class="w-full mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Monthly Totals" }

            div
                id="monthly-totals-table"
                class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class="text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400" {
                        tr {
                            th scope="col" class=(TABLE_HEADER_FIRST_CELL_STYLE) { "Category" }
                            @for row in rows {
                                th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-semibold"} {
                                    (row.month)
                                }
                            }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-bold"} { "Total" }
                        }
                    }
                    tbody {
                        @for category in shown {
                            @let totals: Vec<Option<i64>> = rows.iter().map(|row| row.totals.get(category)).collect();
                            @let sum: i64 = totals.iter().flatten().sum();
                            @let is_income = category == INCOME_CATEGORY;

                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class=(TABLE_STICKY_CELL_STYLE) { (category) }
                                @for total in &totals {
                                    td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                        @match total {
                                            Some(total) if is_income => {
                                                span class=(TABLE_CELL_GREEN_STYLE) { (format_currency_rounded(-total)) }
                                            }
                                            Some(total) => { (format_currency_rounded(*total)) }
                                            None => { "—" }
                                        }
                                    }
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " font-bold"} {
                                    @if is_income {
                                        span class=(TABLE_CELL_GREEN_STYLE) { (format_currency_rounded(-sum)) }
                                    } @else {
                                        (format_currency_rounded(sum))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the transactions behind one bar of the monthly chart.
pub(super) fn details_table(month: &str, category: &str, transactions: &[&Transaction]) -> Markup {
    html! {
        div class="w-full" {
            h3 class="text-xl font-semibold mb-4" {
                "Transactions for " (category) " in " (month)
            }

            @if transactions.is_empty() {
                p class="text-gray-600 dark:text-gray-400" { "No transactions found." }
            } @else {
                div class="overflow-x-auto rounded-lg shadow" {
                    table
                        id="details-table"
                        class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE) {
                            tr {
                                @for header in ["Date", "Time", "Category", "Type", "Name", "Amount", "Currency", "Notes"] {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                                }
                            }
                        }
                        tbody {
                            @for transaction in transactions {
                                @let amount = transaction.amount_value();

                                tr class=(TABLE_ROW_STYLE) {
                                    td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.time) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.category) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.name) }
                                    td class={(TABLE_CELL_STYLE) " whitespace-nowrap " (amount_color_class(amount))} {
                                        (format_currency(amount))
                                    }
                                    td class=(TABLE_CELL_STYLE) { (transaction.currency) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.notes) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the rows of the statement that were skipped or only partly read.
///
/// Renders nothing when the statement was read cleanly.
pub(super) fn issues_table(issues: &[RowIssue]) -> Markup {
    if issues.is_empty() {
        return html! {};
    }

    html! {
        div class="w-full mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Rows With Problems" }

            div class="overflow-x-auto rounded-lg shadow" {
                table
                    id="issues-table"
                    class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Line" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Problem" }
                        }
                    }
                    tbody {
                        @for issue in issues {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (issue.line) }
                                td class=(TABLE_CELL_STYLE) { (issue.kind.to_string()) }
                            }
                        }
                    }
                }
            }
        }
    }
}
