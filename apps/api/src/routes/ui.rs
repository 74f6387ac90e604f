use axum::response::Html;

/// GET /
/// Serves the single-page ranking UI. All interactivity runs client-side
/// against the JSON API; the server only hands out this page.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
