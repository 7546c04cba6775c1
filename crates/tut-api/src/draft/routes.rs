use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use uuid::Uuid;

use tut_quiz::Quiz;

use crate::auth::MaybeUser;
use crate::error::ApiError;
use crate::metrics;
use crate::state::ApiState;
use crate::validation;

use super::model::{AddTag, DraftCreated, DraftView, PublishResponse, UpdateDraft};
use super::publish::publish;

/// Create the draft-session routes.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/drafts", post(create_draft))
        .route("/drafts/{id}", get(get_draft))
        .route("/drafts/{id}", put(update_draft))
        .route("/drafts/{id}", delete(remove_draft))
        .route("/drafts/{id}/tags", post(add_tag))
        .route("/drafts/{id}/tags/{tag}", delete(remove_tag))
        .route("/drafts/{id}/quiz", post(generate_quiz))
        .route("/drafts/{id}/publish", post(publish_draft))
        .route("/drafts/{id}/error", delete(acknowledge_error))
}

/// Open a new authoring session.
async fn create_draft(State(state): State<ApiState>) -> (StatusCode, Json<DraftCreated>) {
    let id = state.sessions.create();
    (StatusCode::CREATED, Json(DraftCreated { id }))
}

/// Read a session's fields and submission status.
async fn get_draft(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, ApiError> {
    let session = state.sessions.get(id)?;
    let mut session = session.lock().await;
    Ok(Json(DraftView::from_session(&mut session)))
}

/// Update title, content or image. Rejected while a publish is in flight.
async fn update_draft(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDraft>,
) -> Result<Json<DraftView>, ApiError> {
    let session = state.sessions.get(id)?;
    let mut session = session.lock().await;
    if session.is_submitting() {
        return Err(ApiError::SubmissionInFlight);
    }

    if let Some(title) = payload.title {
        session.draft.title = title;
    }
    if let Some(content) = payload.content {
        session.draft.content = content;
    }
    if let Some(image_url) = payload.image_url {
        session.draft.image_url = if image_url.is_empty() {
            None
        } else {
            Some(image_url)
        };
    }

    Ok(Json(DraftView::from_session(&mut session)))
}

/// Tear a session down. An in-flight publish still settles against the
/// detached session, with no further effect.
async fn remove_draft(State(state): State<ApiState>, Path(id): Path<Uuid>) -> StatusCode {
    state.sessions.remove(id);
    StatusCode::NO_CONTENT
}

/// Add a tag. Adding a tag that is already present leaves the set unchanged.
async fn add_tag(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddTag>,
) -> Result<Json<DraftView>, ApiError> {
    let tag = validation::normalize_tag(&payload.tag)?;
    let session = state.sessions.get(id)?;
    let mut session = session.lock().await;
    if session.is_submitting() {
        return Err(ApiError::SubmissionInFlight);
    }
    session.draft.add_tag(&tag);
    Ok(Json(DraftView::from_session(&mut session)))
}

/// Remove a tag. Removing an absent tag is a no-op.
async fn remove_tag(
    State(state): State<ApiState>,
    Path((id, tag)): Path<(Uuid, String)>,
) -> Result<Json<DraftView>, ApiError> {
    let session = state.sessions.get(id)?;
    let mut session = session.lock().await;
    if session.is_submitting() {
        return Err(ApiError::SubmissionInFlight);
    }
    session.draft.remove_tag(&tag);
    Ok(Json(DraftView::from_session(&mut session)))
}

/// Explicitly (re)generate the quiz for the current content and cache it.
async fn generate_quiz(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    let session = state.sessions.get(id)?;
    let content = {
        let session = session.lock().await;
        if session.is_submitting() {
            return Err(ApiError::SubmissionInFlight);
        }
        session.draft.content.clone()
    };

    let quiz = match state.quiz_generator.generate(&content).await {
        Ok(quiz) => {
            metrics::record_quiz_generation(true);
            quiz
        }
        Err(err) => {
            metrics::record_quiz_generation(false);
            return Err(err.into());
        }
    };

    session.lock().await.quiz = Some(quiz.clone());
    Ok(Json(quiz))
}

/// Run the submission workflow for this draft. Identity is optional; a
/// signed-out author publishes as "Anonymous".
async fn publish_draft(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<PublishResponse>, ApiError> {
    let session = state.sessions.get(id)?;

    // Detached task: a dropped client connection cannot strand the session
    // in `Submitting`.
    let task = tokio::spawn(publish(
        session,
        state.store.clone(),
        state.quiz_generator.clone(),
        user,
    ));

    let tutorial_id = task
        .await
        .map_err(|err| ApiError::Internal(format!("publish task failed: {err}")))??;

    Ok(Json(PublishResponse { tutorial_id }))
}

/// Acknowledge a failed submission, returning the session to idle.
async fn acknowledge_error(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, ApiError> {
    let session = state.sessions.get(id)?;
    let mut session = session.lock().await;
    session.acknowledge_failure();
    Ok(Json(DraftView::from_session(&mut session)))
}
