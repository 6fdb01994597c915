//! Dashboard page hosting the browser frontend.

use axum::response::Html;

const INDEX_PAGE: &str = include_str!("../../static/index.html");

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
