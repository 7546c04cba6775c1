use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published tutorial. Immutable after creation: there is no edit path.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tutorial {
    /// Unique tutorial identifier
    pub id: Uuid,
    /// Tutorial title
    pub title: String,
    /// Rich-text markup as produced by the client-side editor
    pub content: String,
    /// Ordered, duplicate-free tag list
    pub tags: Vec<String>,
    /// Durable URL of the attached image, if one was uploaded
    pub image_url: Option<String>,
    /// Resolved author display name ("Anonymous" for signed-out authors)
    pub author: String,
    /// True user id when the author was signed in
    pub author_id: Option<Uuid>,
    /// Score counter, reserved for future aggregation. Starts at zero.
    pub points: i32,
    /// When the tutorial was published
    pub created_at: DateTime<Utc>,
}

/// Field values for a tutorial about to be created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTutorial {
    /// Tutorial title
    pub title: String,
    /// Rich-text markup
    pub content: String,
    /// Ordered, duplicate-free tag list
    pub tags: Vec<String>,
    /// Durable image URL, if any
    pub image_url: Option<String>,
    /// Resolved author display name
    pub author: String,
    /// True user id, if the author was signed in
    pub author_id: Option<Uuid>,
}

/// A reader comment on a tutorial. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    /// Unique review identifier
    pub id: Uuid,
    /// Tutorial this review belongs to
    pub tutorial_id: Uuid,
    /// Reviewer's user id
    pub user_id: Uuid,
    /// Reviewer's display name at the time of writing
    pub user_name: String,
    /// Comment text
    pub comment: String,
    /// When the review was written
    pub created_at: DateTime<Utc>,
}

/// Field values for a review about to be appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    /// Reviewer's user id
    pub user_id: Uuid,
    /// Reviewer's display name
    pub user_name: String,
    /// Comment text
    pub comment: String,
}

/// A 1-5 star rating. Append-only; a user may rate the same tutorial more
/// than once and every rating is kept.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    /// Unique rating identifier
    pub id: Uuid,
    /// Tutorial this rating belongs to
    pub tutorial_id: Uuid,
    /// Rater's user id
    pub user_id: Uuid,
    /// Rater's display name at the time of rating
    pub user_name: String,
    /// Star value, 1 through 5
    pub stars: i16,
    /// When the rating was given
    pub created_at: DateTime<Utc>,
}

/// Field values for a rating about to be appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRating {
    /// Rater's user id
    pub user_id: Uuid,
    /// Rater's display name
    pub user_name: String,
    /// Star value, 1 through 5
    pub stars: i16,
}
