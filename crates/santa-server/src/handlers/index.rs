//! Landing page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// `GET /`
pub async fn handler() -> Html<&'static str> { Html(INDEX_HTML) }
