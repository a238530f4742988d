use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

fn import_form_view() -> Markup {
    let import_route = endpoints::IMPORT;
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(import_route)
            enctype="multipart/form-data"
            hx-disabled-elt="#file, #submit-button"
            hx-indicator="#indicator"
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="file" class=(FORM_LABEL_STYLE)
                {
                    "Choose a statement to upload"
                }

                input
                    id="file"
                    type="file"
                    name="file"
                    accept="text/csv,.csv"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-2 text-sm text-gray-600 dark:text-gray-400"
                {
                    "Export your statement from the Monzo app as a CSV file and upload it here.
                    The statement is kept in memory and replaces any statement uploaded before."
                }
            }

            button
                type="submit"
                id="submit-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (spinner) }
                " Upload Statement"
            }
        }
    }
}

fn import_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::IMPORT_VIEW).into_html();
    let form = import_form_view();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="relative w-full max-w-md"
            {
                (form)
            }
        }
    };

    base("Import Statement", &[], &content)
}

/// Route handler for the statement upload page.
pub async fn get_import_page() -> Response {
    import_view().into_response()
}
