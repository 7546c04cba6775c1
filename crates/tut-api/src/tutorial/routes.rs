use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;
use validator::Validate;

use tut_db::{NewRating, NewReview, Rating, Review, Tutorial};
use tut_quiz::Quiz;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::ApiState;

use super::model::{CreateRating, CreateReview};

/// Create the tutorial read and review/rating routes.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/tutorials/{id}", get(get_tutorial))
        .route("/tutorials/{id}/quizzes", get(get_quizzes))
        .route("/tutorials/{id}/reviews", get(list_reviews))
        .route("/tutorials/{id}/reviews", post(create_review))
        .route("/tutorials/{id}/ratings", post(create_rating))
}

/// Read a published tutorial.
async fn get_tutorial(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tutorial>, ApiError> {
    let tutorial = state
        .store
        .get_tutorial(id)
        .await?
        .ok_or(ApiError::NotFound("tutorial"))?;
    Ok(Json(tutorial))
}

/// Read the quiz attached to a published tutorial.
async fn get_quizzes(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    let quiz = state
        .store
        .get_quizzes(id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;
    Ok(Json(quiz))
}

/// Reviews for a tutorial, newest first.
async fn list_reviews(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, ApiError> {
    if state.store.get_tutorial(id).await?.is_none() {
        return Err(ApiError::NotFound("tutorial"));
    }
    let reviews = state.store.list_reviews(id).await?;
    Ok(Json(reviews))
}

/// Append a review. Requires an authenticated user and a non-empty comment.
async fn create_review(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    user: AuthUser,
    Json(payload): Json<CreateReview>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let comment = payload.comment.trim().to_string();
    if comment.is_empty() {
        return Err(ApiError::Validation("comment must not be empty".to_string()));
    }

    let new = NewReview {
        user_id: user.id,
        user_name: user.display_name(),
        comment,
    };
    let review = state.store.append_review(id, new).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Append a rating. Requires an authenticated user; re-rating is allowed and
/// every rating is kept. No aggregate is computed here.
async fn create_rating(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    user: AuthUser,
    Json(payload): Json<CreateRating>,
) -> Result<(StatusCode, Json<Rating>), ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let new = NewRating {
        user_id: user.id,
        user_name: user.display_name(),
        stars: payload.stars,
    };
    let rating = state.store.append_rating(id, new).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}
