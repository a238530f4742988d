//! Parses the CSV statement exported from the Monzo app.
//!
//! The export has a fixed 16 column layout and a single header row:
//!
//! ```text
//! Transaction ID,Date,Time,Type,Name,Emoji,Category,Amount,Currency,Local amount,Local currency,Notes and #tags,Address,Receipt,Description,Category split
//! ```
//!
//! Fields are mapped by position and quoting is not supported, so a field
//! containing a comma shifts every column after it. Such rows are kept but
//! reported as a [RowIssueKind::FieldCount] issue.

use std::fmt;

use csv::{ReaderBuilder, StringRecord};

use crate::{
    Error,
    transaction::{Transaction, parse_amount},
};

/// The number of columns in a Monzo statement export.
pub const COLUMN_COUNT: usize = 16;

/// A problem found in a single row of a statement.
///
/// Row issues never stop a statement from loading. They are collected so
/// they can be shown to the user alongside the charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// The 1-based line number in the file, the header is line 1.
    pub line: usize,
    /// What was wrong with the row.
    pub kind: RowIssueKind,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// The kinds of problems a statement row can have.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowIssueKind {
    /// The row has no transaction ID and was skipped.
    #[error("row has no transaction ID and was skipped")]
    MissingId,

    /// The row does not have the expected number of columns, most likely
    /// because a field contains a comma.
    #[error("expected {expected} columns but found {found}, columns may be shifted")]
    FieldCount {
        /// The number of columns in the export format.
        expected: usize,
        /// The number of columns in the row.
        found: usize,
    },

    /// The amount is not a number and is counted as zero.
    #[error("amount \"{0}\" is not a number and was counted as zero")]
    InvalidAmount(String),

    /// The date is not in the "DD/MM/YYYY" format. The transaction is kept,
    /// but will not show up in any date range or month.
    #[error("date \"{0}\" is not in the format DD/MM/YYYY and will be left out of the charts")]
    InvalidDate(String),
}

/// The transactions and row issues found in a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStatement {
    /// The transactions in file order, without the header and rows missing an ID.
    pub transactions: Vec<Transaction>,
    /// The problems found while parsing, in file order.
    pub issues: Vec<RowIssue>,
}

/// Parses the text of a Monzo statement export.
///
/// The first line is always treated as the header and skipped, as are blank
/// lines. Rows without a transaction ID are dropped.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the CSV reader fails to read a record.
pub fn parse_statement(text: &str) -> Result<ParsedStatement, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut statement = ParsedStatement::default();

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|error| Error::InvalidCSV(error.to_string()))?;
        // Record indices start after the header, which is line 1.
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(index + 2);

        match parse_record(&record) {
            Some(transaction) => {
                if record.len() != COLUMN_COUNT {
                    statement.issues.push(RowIssue {
                        line,
                        kind: RowIssueKind::FieldCount {
                            expected: COLUMN_COUNT,
                            found: record.len(),
                        },
                    });
                }

                if parse_amount(&transaction.amount).is_none() {
                    statement.issues.push(RowIssue {
                        line,
                        kind: RowIssueKind::InvalidAmount(transaction.amount.clone()),
                    });
                }

                if transaction.parsed_date().is_none() {
                    statement.issues.push(RowIssue {
                        line,
                        kind: RowIssueKind::InvalidDate(transaction.date.clone()),
                    });
                }

                statement.transactions.push(transaction);
            }
            None => statement.issues.push(RowIssue {
                line,
                kind: RowIssueKind::MissingId,
            }),
        }
    }

    for issue in &statement.issues {
        tracing::debug!("Statement {issue}");
    }

    Ok(statement)
}

/// Maps the fields of `record` to a transaction by position.
///
/// Returns `None` if the row has no transaction ID.
fn parse_record(record: &StringRecord) -> Option<Transaction> {
    let field = |column: usize| record.get(column).unwrap_or_default().to_owned();

    let id = field(0);

    if id.is_empty() {
        return None;
    }

    Some(Transaction {
        id,
        date: field(1),
        time: field(2),
        transaction_type: field(3),
        name: field(4),
        emoji: field(5),
        category: field(6),
        amount: field(7),
        currency: field(8),
        local_amount: field(9),
        local_currency: field(10),
        notes: field(11),
        address: field(12),
        receipt: field(13),
        description: field(14),
        category_split: field(15),
    })
}

#[cfg(test)]
mod tests {
    use crate::transaction::Transaction;

    use super::{ParsedStatement, RowIssue, RowIssueKind, parse_statement};

    const HEADER: &str = "Transaction ID,Date,Time,Type,Name,Emoji,Category,Amount,Currency,\
        Local amount,Local currency,Notes and #tags,Address,Receipt,Description,Category split";

    #[test]
    fn maps_fields_by_position() {
        let text = format!(
            "{HEADER}\n\
            tx_0001,01/03/2024,12:30:00,Card payment,Tesco,🛒,groceries,-12.50,GBP,-12.50,GBP,weekly shop,1 High St,,TESCO STORES,\n"
        );

        let statement = parse_statement(&text).unwrap();

        assert_eq!(
            statement,
            ParsedStatement {
                transactions: vec![Transaction {
                    id: "tx_0001".to_owned(),
                    date: "01/03/2024".to_owned(),
                    time: "12:30:00".to_owned(),
                    transaction_type: "Card payment".to_owned(),
                    name: "Tesco".to_owned(),
                    emoji: "🛒".to_owned(),
                    category: "groceries".to_owned(),
                    amount: "-12.50".to_owned(),
                    currency: "GBP".to_owned(),
                    local_amount: "-12.50".to_owned(),
                    local_currency: "GBP".to_owned(),
                    notes: "weekly shop".to_owned(),
                    address: "1 High St".to_owned(),
                    receipt: "".to_owned(),
                    description: "TESCO STORES".to_owned(),
                    category_split: "".to_owned(),
                }],
                issues: vec![],
            }
        );
    }

    #[test]
    fn header_is_always_dropped() {
        // The header is skipped by position, not by content.
        let text = "tx_header,01/03/2024,,Card payment,,,food,-1,GBP,,,,,,,\n\
            tx_0001,02/03/2024,,Card payment,,,food,-2,GBP,,,,,,,";

        let statement = parse_statement(text).unwrap();

        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].id, "tx_0001");
    }

    #[test]
    fn rows_without_id_are_dropped_and_reported() {
        let text = format!(
            "{HEADER}\n\
            ,01/03/2024,,Card payment,,,food,-1,GBP,,,,,,,\n\
            tx_0002,02/03/2024,,Card payment,,,food,-2,GBP,,,,,,,\n"
        );

        let statement = parse_statement(&text).unwrap();

        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].id, "tx_0002");
        assert_eq!(
            statement.issues,
            vec![RowIssue {
                line: 2,
                kind: RowIssueKind::MissingId
            }]
        );
    }

    #[test]
    fn blank_lines_and_crlf_are_ignored() {
        let text = format!(
            "{HEADER}\r\n\
            tx_0001,01/03/2024,,Card payment,,,food,-1,GBP,,,,,,,\r\n\
            \r\n\
            tx_0002,02/03/2024,,Card payment,,,food,-2,GBP,,,,,,,\r\n"
        );

        let statement = parse_statement(&text).unwrap();

        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(statement.transactions[1].category_split, "");
        assert!(statement.issues.is_empty(), "got {:?}", statement.issues);
    }

    #[test]
    fn comma_in_field_is_reported_and_shifts_columns() {
        let text = format!(
            "{HEADER}\n\
            tx_0001,01/03/2024,,Card payment,Smith, Jones & Co,,food,-1,GBP,,,,,,,\n"
        );

        let statement = parse_statement(&text).unwrap();

        assert_eq!(statement.transactions.len(), 1);
        // Everything after the name moves one column to the right.
        assert_eq!(statement.transactions[0].name, "Smith");
        assert_eq!(statement.transactions[0].emoji, " Jones & Co");
        assert_eq!(statement.transactions[0].amount, "food");
        assert!(statement.issues.contains(&RowIssue {
            line: 2,
            kind: RowIssueKind::FieldCount {
                expected: 16,
                found: 17
            }
        }));
        assert!(statement.issues.contains(&RowIssue {
            line: 2,
            kind: RowIssueKind::InvalidAmount("food".to_owned())
        }));
    }

    #[test]
    fn quotes_are_ordinary_characters() {
        let text = format!("{HEADER}\ntx_0001,01/03/2024,,Card payment,\"Tesco\",,food,-1,GBP,,,,,,,\n");

        let statement = parse_statement(&text).unwrap();

        assert_eq!(statement.transactions[0].name, "\"Tesco\"");
    }

    #[test]
    fn short_rows_are_padded_and_reported() {
        let text = format!("{HEADER}\ntx_0001,01/03/2024,,Card payment,,,food,-1\n");

        let statement = parse_statement(&text).unwrap();

        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].amount, "-1");
        assert_eq!(statement.transactions[0].currency, "");
        assert_eq!(
            statement.issues,
            vec![RowIssue {
                line: 2,
                kind: RowIssueKind::FieldCount {
                    expected: 16,
                    found: 8
                }
            }]
        );
    }

    #[test]
    fn invalid_amount_and_date_are_kept_and_reported() {
        let text = format!("{HEADER}\ntx_0001,2024-03-01,,Card payment,,,food,lots,GBP,,,,,,,\n");

        let statement = parse_statement(&text).unwrap();

        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].amount_value(), 0.0);
        assert_eq!(
            statement.issues,
            vec![
                RowIssue {
                    line: 2,
                    kind: RowIssueKind::InvalidAmount("lots".to_owned())
                },
                RowIssue {
                    line: 2,
                    kind: RowIssueKind::InvalidDate("2024-03-01".to_owned())
                },
            ]
        );
    }

    #[test]
    fn empty_text_has_no_transactions() {
        let statement = parse_statement("").unwrap();

        assert_eq!(statement, ParsedStatement::default());
    }

    #[test]
    fn issue_display_includes_line_number() {
        let issue = RowIssue {
            line: 7,
            kind: RowIssueKind::MissingId,
        };

        assert_eq!(
            issue.to_string(),
            "line 7: row has no transaction ID and was skipped"
        );
    }
}
