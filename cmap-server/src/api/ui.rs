//! UI serving routes
//!
//! Upload page and the downloadable sample CSV

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../../ui/index.html");
const SAMPLE_CSV: &str = include_str!("../../ui/sample.csv");

/// GET /
///
/// Upload form; posts to /generate-map and shows the result in a frame
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /sample.csv
///
/// Demo member file covering every supported column
pub async fn serve_sample_csv() -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"demo-community-map.csv\"",
            ),
        ],
        SAMPLE_CSV,
    )
        .into_response()
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_index))
        .route("/sample.csv", get(serve_sample_csv))
}
