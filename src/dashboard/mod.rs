//! Dashboard module
//!
//! Turns the loaded statement into monthly category totals, the pie chart
//! breakdown and the transactions behind one bar, and renders them as an
//! htmx driven page with a date filter and category checkboxes.

mod aggregation;
mod cards;
mod charts;
mod drill_down;
mod handlers;
mod pie;
mod tables;

pub use aggregation::{CategoryTotals, MonthRow, aggregate_by_month};
pub use drill_down::transaction_details;
pub use handlers::{deselect_all, get_dashboard_page, get_details, select_all, update_filters};
pub use pie::{PieDatum, aggregate_pie, visible_expense_total};
