//! Prometheus metrics for monitoring API performance and health.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics exporter.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware that records a counter and duration histogram per request.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response: Response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Normalize URL paths to reduce label cardinality: UUID segments become
/// `:id`.
fn normalize_path(path: &str) -> String {
    let uuid_regex =
        regex::Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap();

    uuid_regex.replace_all(path, ":id").to_string()
}

/// Handler for the `/metrics` endpoint.
pub async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record the outcome of a publish attempt.
pub fn record_publish(success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!(
        "tutorial_publishes_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the outcome of a quiz generation call.
pub fn record_quiz_generation(success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!(
        "quiz_generations_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the outcome of a media upload.
pub fn record_upload(success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!(
        "media_uploads_total",
        "status" => status.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/tutorials/550e8400-e29b-41d4-a716-446655440000"),
            "/tutorials/:id"
        );
        assert_eq!(
            normalize_path("/drafts/550e8400-e29b-41d4-a716-446655440000/publish"),
            "/drafts/:id/publish"
        );
        assert_eq!(normalize_path("/health"), "/health");
    }
}
