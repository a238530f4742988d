//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard and updating its filters
//! - HTML view functions for rendering the dashboard UI
//! - State and form types used by the handlers

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    AppState, Error,
    dashboard::{
        cards::{statement_card, visible_total_card},
        charts::{
            DETAILS_TARGET_ID, DashboardChart, category_pie_chart, charts_view,
            monthly_spending_chart,
        },
        tables::{details_table, issues_table, monthly_totals_table},
    },
    endpoints,
    filters::DateWindow,
    html::{
        BUTTON_SECONDARY_STYLE, ECHARTS_SCRIPT, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, base, link,
    },
    navigation::NavBar,
    session::Session,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The loaded statement, `None` until a statement is uploaded.
    pub session: Arc<Mutex<Option<Session>>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
        }
    }
}

/// Form data for updating the date range and selected categories.
#[derive(Debug, Deserialize)]
pub struct FiltersForm {
    /// The first day to include as `YYYY-MM-DD`, empty for no lower limit.
    #[serde(default)]
    pub from: String,
    /// The last day to include as `YYYY-MM-DD`, empty for no upper limit.
    #[serde(default)]
    pub to: String,
    /// The categories to show, one entry per checked box.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// The bar of the monthly chart to show the transactions for.
#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    /// The month key of the bar, e.g. "3/2024".
    pub month: String,
    /// The category of the bar segment.
    pub category: String,
}

fn lock_session(state: &DashboardState) -> Result<MutexGuard<'_, Option<Session>>, Error> {
    state
        .session
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire session lock: {error}"))
        .map_err(|_| Error::SessionLockError)
}

/// Runs `update` on the loaded session and renders the result as an htmx partial.
///
/// Errors are rendered as alerts.
fn update_session<F>(state: &DashboardState, update: F) -> Response
where
    F: FnOnce(&mut Session) -> Result<Markup, Error>,
{
    let mut session = match lock_session(state) {
        Ok(session) => session,
        Err(error) => return error.into_alert_response(),
    };

    let Some(session) = session.as_mut() else {
        return Error::NoStatementLoaded.into_alert_response();
    };

    match update(session) {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Display a page with the charts for the loaded statement.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let session = lock_session(&state)?;
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    match session.as_ref() {
        Some(session) => Ok(dashboard_view(nav_bar, session).into_response()),
        None => Ok(dashboard_no_data_view(nav_bar).into_response()),
    }
}

/// API endpoint to update the date range and selected categories.
///
/// The session is left unchanged if either date is invalid or the range is reversed.
pub async fn update_filters(
    State(state): State<DashboardState>,
    Form(form): Form<FiltersForm>,
) -> Response {
    update_session(&state, |session| {
        let from = parse_filter_date(&form.from)?;
        let to = parse_filter_date(&form.to)?;
        let window = DateWindow::new(from, to)
            .inspect_err(|error| tracing::debug!("rejected date filter: {error}"))?;

        session.set_window(window);
        session.set_selection(&form.categories);

        tracing::debug!(
            "Updated dashboard filters: {from:?} to {to:?} with {} categories selected",
            session.selected().len()
        );

        Ok(dashboard_content(session))
    })
}

/// API endpoint to select every category.
pub async fn select_all(State(state): State<DashboardState>) -> Response {
    update_session(&state, |session| {
        session.select_all();
        Ok(dashboard_content(session))
    })
}

/// API endpoint to deselect every category.
pub async fn deselect_all(State(state): State<DashboardState>) -> Response {
    update_session(&state, |session| {
        session.deselect_all();
        Ok(dashboard_content(session))
    })
}

/// API endpoint for the transactions behind one bar of the monthly chart.
pub async fn get_details(
    State(state): State<DashboardState>,
    Query(query): Query<DetailsQuery>,
) -> Response {
    update_session(&state, |session| {
        let transactions = session.details(&query.month, &query.category);

        tracing::debug!(
            "Found {} transactions for {} in {}",
            transactions.len(),
            query.category,
            query.month
        );

        Ok(details_table(&query.month, &query.category, &transactions))
    })
}

/// Parses a date from a date input, where an empty value means no limit.
fn parse_filter_date(text: &str) -> Result<Option<Date>, Error> {
    let text = text.trim();

    if text.is_empty() {
        return Ok(None);
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Creates the dashboard charts from the session's filtered data.
fn build_dashboard_charts(session: &Session) -> [DashboardChart; 2] {
    let rows = session.month_rows();

    [
        DashboardChart {
            id: "monthly-spending-chart",
            options: monthly_spending_chart(&rows, session.selected(), session.colors())
                .to_string(),
            drill_down: true,
        },
        DashboardChart {
            id: "category-pie-chart",
            options: category_pie_chart(&session.pie_data(), session.colors()).to_string(),
            drill_down: false,
        },
    ]
}

/// Renders the dashboard page when no statement has been uploaded.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let import_link = link(endpoints::IMPORT_VIEW, "uploading a statement");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you load your Monzo statement.
                Get started by " (import_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with the filter controls, charts and tables.
fn dashboard_view<'a>(nav_bar: NavBar<'a>, session: &Session) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (dashboard_content(session))
        }
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    base("Dashboard", &scripts, &content)
}

/// Renders the dashboard content that htmx swaps in when the filters change.
fn dashboard_content(session: &Session) -> Markup {
    let charts = build_dashboard_charts(session);

    html!(
        (filters_form(session))

        section class="w-full grid grid-cols-1 md:grid-cols-2 gap-4 mb-4"
        {
            (statement_card(
                session.file_name(),
                session.transactions().len(),
                session.issues().len(),
                session.date_span(),
            ))
            (visible_total_card(session.visible_total()))
        }

        (charts_view(&charts))

        div id=(DETAILS_TARGET_ID) class="w-full mb-8" {}

        (monthly_totals_table(&session.month_rows(), session.categories()))

        (issues_table(session.issues()))
    )
}

/// Renders the date range inputs and the category checkboxes.
fn filters_form(session: &Session) -> Markup {
    let window = session.window();
    let from = window.from.map(|date| date.to_string()).unwrap_or_default();
    let to = window.to.map(|date| date.to_string()).unwrap_or_default();
    let (min, max) = match session.date_span() {
        Some((earliest, latest)) => (Some(earliest.to_string()), Some(latest.to_string())),
        None => (None, None),
    };

    html!(
        div class="mb-8 w-full"
        {
            form
                id="filters-form"
                hx-post=(endpoints::DASHBOARD_FILTERS)
                hx-target="#dashboard-content"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                hx-trigger="change"
                class="bg-gray-50 dark:bg-gray-800 p-4 rounded-lg"
            {
                div class="grid grid-cols-1 md:grid-cols-2 gap-4 mb-4"
                {
                    div
                    {
                        label for="from" class=(FORM_LABEL_STYLE) { "From" }
                        input
                            type="date"
                            id="from"
                            name="from"
                            value=(from)
                            min=[min.as_deref()]
                            max=[max.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="to" class=(FORM_LABEL_STYLE) { "To" }
                        input
                            type="date"
                            id="to"
                            name="to"
                            value=(to)
                            min=[min.as_deref()]
                            max=[max.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div class="flex items-center gap-2 mb-3"
                {
                    h3 class="text-xl font-semibold me-auto" { "Categories" }

                    button
                        type="button"
                        hx-post=(endpoints::DASHBOARD_SELECT_ALL)
                        hx-target="#dashboard-content"
                        hx-target-error="#alert-container"
                        hx-swap="innerHTML"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Select all"
                    }

                    button
                        type="button"
                        hx-post=(endpoints::DASHBOARD_DESELECT_ALL)
                        hx-target="#dashboard-content"
                        hx-target-error="#alert-container"
                        hx-swap="innerHTML"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Deselect all"
                    }
                }

                div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-3"
                {
                    @for category in session.categories() {
                        label class="flex items-center space-x-2"
                        {
                            input
                                type="checkbox"
                                name="categories"
                                value=(category)
                                checked[session.is_selected(category)]
                                class="rounded-sm border-gray-300
                                    text-blue-600 shadow-xs
                                    focus:border-blue-300 focus:ring-3
                                    focus:ring-blue-200/50"
                            ;

                            span
                                class="inline-flex items-center
                                    px-2.5 py-0.5
                                    text-xs font-semibold text-gray-900
                                    rounded-full"
                                style={"background-color: " (session.colors().get(category))}
                            {
                                (category)
                            }
                        }
                    }
                }
            }
        }
    )
}
