//! Date range filtering for statement transactions.

use time::Date;

use crate::{Error, transaction::Transaction};

/// A window of dates with exclusive bounds.
///
/// A missing bound leaves that side of the window open. A transaction dated
/// exactly on `from` or `to` is outside the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    /// The lower bound, exclusive.
    pub from: Option<Date>,
    /// The upper bound, exclusive.
    pub to: Option<Date>,
}

impl DateWindow {
    /// Creates a window between `from` and `to`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `from` is after `to`.
    pub fn new(from: Option<Date>, to: Option<Date>) -> Result<Self, Error> {
        match (from, to) {
            (Some(from), Some(to)) if from > to => Err(Error::InvalidDateRange { from, to }),
            _ => Ok(Self { from, to }),
        }
    }

    /// A window that contains every valid date.
    pub fn open() -> Self {
        Self::default()
    }

    /// Whether `date` lies strictly between the bounds of the window.
    pub fn contains(&self, date: Date) -> bool {
        self.from.is_none_or(|from| date > from) && self.to.is_none_or(|to| date < to)
    }
}

/// Keeps the transactions whose date lies strictly inside `window`.
///
/// Transactions with a date that cannot be parsed are outside every window.
pub fn filter_by_date_window<'a, I>(transactions: I, window: &DateWindow) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|transaction| {
            transaction
                .parsed_date()
                .is_some_and(|date| window.contains(date))
        })
        .collect()
}
