use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{AppState, Error, endpoints, session::Session};

/// The name of the multipart field holding the statement.
const FILE_FIELD: &str = "file";

/// The state needed for importing a statement.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The loaded statement, replaced by every successful upload.
    pub session: Arc<Mutex<Option<Session>>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
        }
    }
}

/// A statement file read from a multipart form.
#[derive(Debug)]
struct UploadedStatement {
    file_name: String,
    text: String,
}

/// Route handler for uploading a Monzo statement.
///
/// The statement replaces the current session and the client is redirected
/// to the dashboard. Errors are returned as alerts and leave the current
/// session untouched.
pub async fn import_statement(
    State(state): State<ImportState>,
    multipart: Multipart,
) -> Response {
    let start_time = std::time::Instant::now();

    let upload = match read_statement_upload(multipart).await {
        Ok(upload) => upload,
        Err(error) => {
            tracing::debug!("Rejected statement upload: {error}");
            return error.into_alert_response();
        }
    };

    let session = match Session::load(&upload.file_name, &upload.text) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("Failed to parse {}: {error}", upload.file_name);
            return error.into_alert_response();
        }
    };

    match state.session.lock() {
        Ok(mut current) => *current = Some(session),
        Err(error) => {
            tracing::error!("could not acquire session lock: {error}");
            return Error::SessionLockError.into_alert_response();
        }
    }

    tracing::info!(
        "Imported {} in {:.1}ms",
        upload.file_name,
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    (
        StatusCode::CREATED,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        (),
    )
        .into_response()
}

/// Finds the statement field in `multipart` and reads it as text.
async fn read_statement_upload(mut multipart: Multipart) -> Result<UploadedStatement, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        if field.name() == Some(FILE_FIELD) {
            return parse_multipart_field(field).await;
        }
    }

    Err(Error::MultipartError(
        "The form did not include a statement file.".to_owned(),
    ))
}

async fn parse_multipart_field(field: Field<'_>) -> Result<UploadedStatement, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();

    if !is_csv(field.content_type(), &file_name) {
        return Err(Error::NotCSV);
    }

    let data = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    let text = String::from_utf8(data.to_vec())
        .map_err(|_| Error::InvalidCSV("The file is not UTF-8 encoded text.".to_owned()))?;

    Ok(UploadedStatement { file_name, text })
}

/// Whether an upload looks like a CSV file, going by its content type or file name.
///
/// Some browsers send CSV files as `application/vnd.ms-excel`, so a `.csv`
/// file name is accepted regardless of the content type.
fn is_csv(content_type: Option<&str>, file_name: &str) -> bool {
    let is_csv_type = content_type.is_some_and(|content_type| {
        content_type
            .split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/csv"))
    });

    is_csv_type || file_name.to_ascii_lowercase().ends_with(".csv")
}
