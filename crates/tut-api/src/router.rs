use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::{draft, media, state::ApiState, tutorial};

/// Assemble the full route table.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(draft::routes())
        .merge(tutorial::routes())
        .merge(media::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
