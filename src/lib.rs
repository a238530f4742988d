//! Monzo Analytics is a web app for exploring a Monzo bank statement.
//!
//! Upload the CSV statement exported from the Monzo app to see monthly
//! spending by category as a stacked bar chart, an overall breakdown as a pie
//! chart, and the transactions behind any bar. The statement is only held in
//! memory and is replaced by the next upload.
//!
//! The data pipeline is made up of pure functions that do not depend on the
//! web layer:
//! [parse_statement] → [extract_categories] → [filter_by_date_window] →
//! [aggregate_by_month] → [aggregate_pie], plus [transaction_details] for
//! drilling down into one bar. [Session] ties them together.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod csv_import;
mod dashboard;
mod endpoints;
mod filters;
mod html;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod session;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{
    CategoryColors, FALLBACK_COLOR, INCOME_CATEGORY, PALETTE, POT_TRANSFER_CATEGORY,
    UNKNOWN_CATEGORY, extract_categories,
};
pub use csv_import::{COLUMN_COUNT, ParsedStatement, RowIssue, RowIssueKind, parse_statement};
pub use dashboard::{
    CategoryTotals, MonthRow, PieDatum, aggregate_by_month, aggregate_pie, transaction_details,
    visible_expense_total,
};
pub use filters::{DateWindow, filter_by_date_window};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::Session;
pub use transaction::Transaction;

use crate::{alert::Alert, not_found::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The multipart form could not be parsed or did not contain a file.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file is not a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The statement could not be read as CSV text.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The statement file could not be read from disk.
    #[error("Could not read the statement file {0}")]
    ReadStatement(String),

    /// A date filter could not be parsed as a `YYYY-MM-DD` date.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// The start of a date range is after its end.
    #[error("the start date {from} is after the end date {to}")]
    InvalidDateRange {
        /// The start of the range.
        from: Date,
        /// The end of the range.
        to: Date,
    },

    /// A request needs a statement, but none has been uploaded yet.
    #[error("no statement has been loaded")]
    NoStatementLoaded,

    /// Could not acquire the session lock.
    #[error("could not acquire the session lock")]
    SessionLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SessionLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::NotCSV => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "File type must be CSV".to_owned(),
                    details: "Export your statement from the Monzo app as a CSV file.".to_owned(),
                },
            )
                .into_response(),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the upload".to_owned(),
                    details,
                },
            )
                .into_response(),
            Error::InvalidCSV(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not parse the statement".to_owned(),
                    details,
                },
            )
                .into_response(),
            Error::InvalidDate(text) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date".to_owned(),
                    details: format!("\"{text}\" is not a valid date."),
                },
            )
                .into_response(),
            Error::InvalidDateRange { from, to } => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date range".to_owned(),
                    details: format!(
                        "The start date {from} is after the end date {to}. \
                        Change one of the dates and try again."
                    ),
                },
            )
                .into_response(),
            Error::NoStatementLoaded => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "No statement loaded".to_owned(),
                    details: "Upload a statement on the import page first.".to_owned(),
                },
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::ErrorSimple {
                        message: "Something went wrong, check the server logs for details."
                            .to_owned(),
                    },
                )
                    .into_response()
            }
        }
    }
}
