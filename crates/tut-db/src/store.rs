use async_trait::async_trait;
use thiserror::Error;
use tut_quiz::Quiz;
use uuid::Uuid;

use crate::models::{NewRating, NewReview, NewTutorial, Rating, Review, Tutorial};

/// Errors raised by a [`TutorialStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A child record was addressed at a tutorial that does not exist.
    #[error("tutorial {0} does not exist")]
    TutorialNotFound(Uuid),
}

/// Capability contract over the tutorial document store.
///
/// The submission workflow and the HTTP routes only ever see this trait, so
/// they can run against Postgres in production and an in-memory store in
/// tests.
#[async_trait]
pub trait TutorialStore: Send + Sync {
    /// Create a tutorial record and return its generated id. Points start at
    /// zero and the ratings collection starts empty.
    async fn create_tutorial(&self, new: NewTutorial) -> Result<Uuid, StoreError>;

    /// Attach the generated quiz to a tutorial, keyed by its id.
    async fn save_quizzes(&self, tutorial_id: Uuid, quiz: &Quiz) -> Result<(), StoreError>;

    /// Remove a tutorial and, through it, its quiz, reviews and ratings.
    /// Used to compensate a failed quiz save. Deleting a tutorial that does
    /// not exist is not an error.
    async fn delete_tutorial(&self, tutorial_id: Uuid) -> Result<(), StoreError>;

    /// Fetch a tutorial by id.
    async fn get_tutorial(&self, tutorial_id: Uuid) -> Result<Option<Tutorial>, StoreError>;

    /// Fetch the quiz attached to a tutorial, if one was saved.
    async fn get_quizzes(&self, tutorial_id: Uuid) -> Result<Option<Quiz>, StoreError>;

    /// Append a review under a tutorial.
    async fn append_review(&self, tutorial_id: Uuid, new: NewReview) -> Result<Review, StoreError>;

    /// Append a rating under a tutorial.
    async fn append_rating(&self, tutorial_id: Uuid, new: NewRating) -> Result<Rating, StoreError>;

    /// Reviews for a tutorial, newest first.
    async fn list_reviews(&self, tutorial_id: Uuid) -> Result<Vec<Review>, StoreError>;
}
