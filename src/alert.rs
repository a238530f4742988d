//! Alerts for displaying error messages to users.
//!
//! Alerts are swapped out-of-band into the `#alert-container` element that
//! every page includes, so they can be returned from any htmx request.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An error message, optionally with details on how to fix it.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, details),
            Alert::ErrorSimple { message } => (message, String::new()),
        };

        let style =
            "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400";

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role="alert"
                {
                    div class="flex justify-between items-start"
                    {
                        div
                        {
                            span class="font-semibold" { (message) }

                            @if !details.is_empty() {
                                p class="mt-1" { (details) }
                            }
                        }

                        button
                            type="button"
                            class="ms-4 font-bold"
                            aria-label="Dismiss"
                            onclick="this.closest('[role=alert]').remove()"
                        {
                            "×"
                        }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
