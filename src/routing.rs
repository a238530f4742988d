//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    csv_import::{get_import_page, import_statement},
    dashboard::{deselect_all, get_dashboard_page, get_details, select_all, update_filters},
    endpoints,
    not_found::{get_404_not_found, get_internal_server_error_page},
};

/// The largest statement upload accepted, in bytes.
///
/// An "All time" export covering several years is several megabytes, well
/// over axum's default limit of 2 MB.
pub const MAX_STATEMENT_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::IMPORT_VIEW, get(get_import_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::IMPORT,
            post(import_statement).layer(DefaultBodyLimit::max(MAX_STATEMENT_UPLOAD_BYTES)),
        )
        .route(endpoints::DASHBOARD_FILTERS, post(update_filters))
        .route(endpoints::DASHBOARD_SELECT_ALL, post(select_all))
        .route(endpoints::DASHBOARD_DESELECT_ALL, post(deselect_all))
        .route(endpoints::DASHBOARD_DETAILS, get(get_details));

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
