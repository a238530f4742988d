//! The transaction records found in a Monzo statement export.
//!
//! A [Transaction] keeps every column of the export as text, exactly as it
//! appeared in the file. Typed views of the columns that the dashboard needs
//! (date, amount, whether it is a pot transfer) are derived on demand.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// The date format used by the statement export, e.g. "01/03/2024".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

/// Transaction types containing this text (ignoring case) are transfers to
/// or from a savings pot.
const POT_MARKER: &str = "pot";

/// One row of a Monzo statement export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// The unique ID Monzo assigned to the transaction.
    pub id: String,
    /// The date of the transaction as "DD/MM/YYYY".
    pub date: String,
    /// The time of day of the transaction, e.g. "12:30:00".
    pub time: String,
    /// The kind of transaction, e.g. "Card payment" or "Pot transfer".
    pub transaction_type: String,
    /// The counterparty.
    pub name: String,
    /// The emoji Monzo shows next to the counterparty.
    pub emoji: String,
    /// The spending category, may be empty.
    pub category: String,
    /// The signed amount, negative for expenses and positive for income.
    pub amount: String,
    /// The currency of `amount`, e.g. "GBP".
    pub currency: String,
    /// The amount in the currency the payment was made in.
    pub local_amount: String,
    /// The currency the payment was made in.
    pub local_currency: String,
    /// Free text notes and #tags.
    pub notes: String,
    /// The address of the counterparty.
    pub address: String,
    /// A link to the receipt.
    pub receipt: String,
    /// The description from the payment network.
    pub description: String,
    /// How the amount was split across categories.
    pub category_split: String,
}

impl Transaction {
    /// The transaction date as a calendar date.
    ///
    /// Returns `None` if the date column is not in the "DD/MM/YYYY" format.
    pub fn parsed_date(&self) -> Option<Date> {
        Date::parse(&self.date, DATE_FORMAT).ok()
    }

    /// The amount as a number, or zero if the amount column is not a number.
    pub fn amount_value(&self) -> f64 {
        parse_amount(&self.amount).unwrap_or(0.0)
    }

    /// Whether the transaction moves money to or from a savings pot.
    pub fn is_pot_transfer(&self) -> bool {
        self.transaction_type.to_lowercase().contains(POT_MARKER)
    }

    /// The key of the month the transaction falls in, e.g. "3/2024".
    pub fn month_key(&self) -> Option<String> {
        self.parsed_date().map(month_key)
    }

    #[cfg(test)]
    pub(crate) fn build(
        id: &str,
        date: &str,
        transaction_type: &str,
        category: &str,
        amount: &str,
    ) -> Self {
        Self {
            id: id.to_owned(),
            date: date.to_owned(),
            transaction_type: transaction_type.to_owned(),
            category: category.to_owned(),
            amount: amount.to_owned(),
            currency: "GBP".to_owned(),
            ..Default::default()
        }
    }
}

/// Parses a signed decimal amount such as "-12.50".
///
/// Returns `None` for text that is not a finite number.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Formats the month key for `date` as "month/year" without zero padding,
/// e.g. "3/2024" for any day in March 2024.
pub fn month_key(date: Date) -> String {
    format!("{}/{}", u8::from(date.month()), date.year())
}
