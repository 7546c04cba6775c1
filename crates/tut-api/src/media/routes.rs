use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::metrics;
use crate::state::ApiState;

/// Create the media routes.
pub fn routes() -> Router<ApiState> {
    Router::new().route("/media", post(upload_media))
}

/// Accept a multipart `file` field and forward it to the image host,
/// returning the durable URL. Failures are surfaced, never swallowed.
async fn upload_media(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Validation(format!("invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::Validation(format!("failed to read upload: {err}")))?;

        let url = match state.uploader.upload(&file_name, bytes.to_vec()).await {
            Ok(url) => {
                metrics::record_upload(true);
                url
            }
            Err(err) => {
                metrics::record_upload(false);
                return Err(err.into());
            }
        };

        return Ok(Json(json!({ "url": url })));
    }

    Err(ApiError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}
