//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the charts for the loaded statement.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for uploading a statement.
pub const IMPORT_VIEW: &str = "/import";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to upload a CSV statement.
pub const IMPORT: &str = "/api/import";
/// The route to update the date range and selected categories.
pub const DASHBOARD_FILTERS: &str = "/api/dashboard/filters";
/// The route to select every category.
pub const DASHBOARD_SELECT_ALL: &str = "/api/dashboard/select-all";
/// The route to deselect every category.
pub const DASHBOARD_DESELECT_ALL: &str = "/api/dashboard/deselect-all";
/// The route to get the transactions behind one bar of the monthly chart.
pub const DASHBOARD_DETAILS: &str = "/api/dashboard/details";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::IMPORT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::IMPORT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_FILTERS);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_SELECT_ALL);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_DESELECT_ALL);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_DETAILS);
    }
}
