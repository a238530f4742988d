#![allow(missing_docs)]

use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

/// A small statement with one transaction of each kind and one row without an ID.
pub(crate) const STATEMENT: &str = "\
Transaction ID,Date,Time,Type,Name,Emoji,Category,Amount,Currency,Local amount,Local currency,Notes and #tags,Address,Receipt,Description,Category split
tx_01,01/03/2024,09:00:00,Card payment,Tesco,,groceries,-25.40,GBP,-25.40,GBP,,,,,
tx_02,02/03/2024,10:00:00,Pot transfer,Savings,,,-50.00,GBP,-50.00,GBP,,,,,
tx_03,05/03/2024,11:00:00,Faster payment,Employer,,income,2000.00,GBP,2000.00,GBP,,,,,
tx_04,10/04/2024,12:00:00,Card payment,TfL,,transport,-2.80,GBP,-2.80,GBP,,,,,
tx_05,11/04/2024,13:00:00,Card payment,Corner shop,,,-4.20,GBP,-4.20,GBP,,,,,
,12/04/2024,13:00:00,Card payment,Nobody,,,-1.00,GBP,-1.00,GBP,,,,,
";

pub(crate) async fn response_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&response_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&response_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let header = response
        .headers()
        .get("hx-redirect")
        .expect("Headers missing hx-redirect")
        .to_str()
        .expect("Could not convert to str");

    assert_eq!(header, endpoint);
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let value = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        value, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {value:?}"
    );
}

/// Counts the elements in `html` that match the CSS `selector`.
#[track_caller]
pub(crate) fn count_matches(html: &Html, selector: &str) -> usize {
    html.select(&Selector::parse(selector).unwrap()).count()
}
