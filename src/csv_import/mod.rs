//! Uploading and parsing Monzo statements.

mod csv;
mod import_page;
mod import_statement;

pub use self::csv::{COLUMN_COUNT, ParsedStatement, RowIssue, RowIssueKind, parse_statement};
pub use import_page::get_import_page;
pub use import_statement::import_statement;
