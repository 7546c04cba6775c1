use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tut_quiz::{Question, Quiz};
use uuid::Uuid;

use crate::models::{NewRating, NewReview, NewTutorial, Rating, Review, Tutorial};
use crate::store::{StoreError, TutorialStore};

/// [`TutorialStore`] backed by Postgres. Quiz tiers are stored as JSONB
/// columns keyed by the tutorial id.
#[derive(Debug, Clone)]
pub struct PgTutorialStore {
    pool: PgPool,
}

impl PgTutorialStore {
    /// Wrap an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TutorialStore for PgTutorialStore {
    async fn create_tutorial(&self, new: NewTutorial) -> Result<Uuid, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            // language=PostgreSQL
            r#"
                INSERT INTO tutorials (title, content, tags, image_url, author, author_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
            "#,
        )
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.tags)
        .bind(&new.image_url)
        .bind(&new.author)
        .bind(new.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn save_quizzes(&self, tutorial_id: Uuid, quiz: &Quiz) -> Result<(), StoreError> {
        let result = sqlx::query(
            // language=PostgreSQL
            r#"
                INSERT INTO tutorial_quizzes (tutorial_id, easy, medium, hard)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(tutorial_id)
        .bind(Json(&quiz.easy))
        .bind(Json(&quiz.medium))
        .bind(Json(&quiz.hard))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("tutorial_quizzes_tutorial_id_fkey") =>
            {
                Err(StoreError::TutorialNotFound(tutorial_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_tutorial(&self, tutorial_id: Uuid) -> Result<(), StoreError> {
        // Child quizzes, reviews and ratings go with it (ON DELETE CASCADE).
        sqlx::query(
            // language=PostgreSQL
            r#"
                DELETE FROM tutorials
                WHERE id = $1
            "#,
        )
        .bind(tutorial_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_tutorial(&self, tutorial_id: Uuid) -> Result<Option<Tutorial>, StoreError> {
        let tutorial = sqlx::query_as::<_, Tutorial>(
            // language=PostgreSQL
            r#"
                SELECT id, title, content, tags, image_url, author, author_id, points, created_at
                FROM tutorials
                WHERE id = $1
            "#,
        )
        .bind(tutorial_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tutorial)
    }

    async fn get_quizzes(&self, tutorial_id: Uuid) -> Result<Option<Quiz>, StoreError> {
        type Tiers = (
            Json<Vec<Question>>,
            Json<Vec<Question>>,
            Json<Vec<Question>>,
        );

        let row = sqlx::query_as::<_, Tiers>(
            // language=PostgreSQL
            r#"
                SELECT easy, medium, hard
                FROM tutorial_quizzes
                WHERE tutorial_id = $1
            "#,
        )
        .bind(tutorial_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(easy, medium, hard)| Quiz {
            easy: easy.0,
            medium: medium.0,
            hard: hard.0,
        }))
    }

    async fn append_review(&self, tutorial_id: Uuid, new: NewReview) -> Result<Review, StoreError> {
        let result = sqlx::query_as::<_, Review>(
            // language=PostgreSQL
            r#"
                INSERT INTO reviews (tutorial_id, user_id, user_name, comment)
                VALUES ($1, $2, $3, $4)
                RETURNING id, tutorial_id, user_id, user_name, comment, created_at
            "#,
        )
        .bind(tutorial_id)
        .bind(new.user_id)
        .bind(&new.user_name)
        .bind(&new.comment)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(review) => Ok(review),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("reviews_tutorial_id_fkey") =>
            {
                Err(StoreError::TutorialNotFound(tutorial_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn append_rating(&self, tutorial_id: Uuid, new: NewRating) -> Result<Rating, StoreError> {
        let result = sqlx::query_as::<_, Rating>(
            // language=PostgreSQL
            r#"
                INSERT INTO ratings (tutorial_id, user_id, user_name, stars)
                VALUES ($1, $2, $3, $4)
                RETURNING id, tutorial_id, user_id, user_name, stars, created_at
            "#,
        )
        .bind(tutorial_id)
        .bind(new.user_id)
        .bind(&new.user_name)
        .bind(new.stars)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(rating) => Ok(rating),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("ratings_tutorial_id_fkey") =>
            {
                Err(StoreError::TutorialNotFound(tutorial_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_reviews(&self, tutorial_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            // language=PostgreSQL
            r#"
                SELECT id, tutorial_id, user_id, user_name, comment, created_at
                FROM reviews
                WHERE tutorial_id = $1
                ORDER BY created_at DESC
            "#,
        )
        .bind(tutorial_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
