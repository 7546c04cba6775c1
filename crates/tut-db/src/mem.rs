use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tut_quiz::Quiz;
use uuid::Uuid;

use crate::models::{NewRating, NewReview, NewTutorial, Rating, Review, Tutorial};
use crate::store::{StoreError, TutorialStore};

/// In-memory [`TutorialStore`] used by the test suite and by development
/// runs without a database. Not durable.
#[derive(Debug, Default)]
pub struct MemTutorialStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tutorials: HashMap<Uuid, Tutorial>,
    quizzes: HashMap<Uuid, Quiz>,
    reviews: Vec<Review>,
    ratings: Vec<Rating>,
}

impl MemTutorialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tutorials.
    pub fn tutorial_count(&self) -> usize {
        self.locked().tutorials.len()
    }

    /// Number of stored quizzes.
    pub fn quiz_count(&self) -> usize {
        self.locked().quizzes.len()
    }

    /// Number of stored ratings across all tutorials.
    pub fn rating_count(&self) -> usize {
        self.locked().ratings.len()
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl TutorialStore for MemTutorialStore {
    async fn create_tutorial(&self, new: NewTutorial) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let tutorial = Tutorial {
            id,
            title: new.title,
            content: new.content,
            tags: new.tags,
            image_url: new.image_url,
            author: new.author,
            author_id: new.author_id,
            points: 0,
            created_at: Utc::now(),
        };
        self.locked().tutorials.insert(id, tutorial);
        Ok(id)
    }

    async fn save_quizzes(&self, tutorial_id: Uuid, quiz: &Quiz) -> Result<(), StoreError> {
        let mut inner = self.locked();
        if !inner.tutorials.contains_key(&tutorial_id) {
            return Err(StoreError::TutorialNotFound(tutorial_id));
        }
        inner.quizzes.insert(tutorial_id, quiz.clone());
        Ok(())
    }

    async fn delete_tutorial(&self, tutorial_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.locked();
        inner.tutorials.remove(&tutorial_id);
        inner.quizzes.remove(&tutorial_id);
        inner.reviews.retain(|review| review.tutorial_id != tutorial_id);
        inner.ratings.retain(|rating| rating.tutorial_id != tutorial_id);
        Ok(())
    }

    async fn get_tutorial(&self, tutorial_id: Uuid) -> Result<Option<Tutorial>, StoreError> {
        Ok(self.locked().tutorials.get(&tutorial_id).cloned())
    }

    async fn get_quizzes(&self, tutorial_id: Uuid) -> Result<Option<Quiz>, StoreError> {
        Ok(self.locked().quizzes.get(&tutorial_id).cloned())
    }

    async fn append_review(&self, tutorial_id: Uuid, new: NewReview) -> Result<Review, StoreError> {
        let mut inner = self.locked();
        if !inner.tutorials.contains_key(&tutorial_id) {
            return Err(StoreError::TutorialNotFound(tutorial_id));
        }
        let review = Review {
            id: Uuid::new_v4(),
            tutorial_id,
            user_id: new.user_id,
            user_name: new.user_name,
            comment: new.comment,
            created_at: Utc::now(),
        };
        inner.reviews.push(review.clone());
        Ok(review)
    }

    async fn append_rating(&self, tutorial_id: Uuid, new: NewRating) -> Result<Rating, StoreError> {
        let mut inner = self.locked();
        if !inner.tutorials.contains_key(&tutorial_id) {
            return Err(StoreError::TutorialNotFound(tutorial_id));
        }
        let rating = Rating {
            id: Uuid::new_v4(),
            tutorial_id,
            user_id: new.user_id,
            user_name: new.user_name,
            stars: new.stars,
            created_at: Utc::now(),
        };
        inner.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn list_reviews(&self, tutorial_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let mut reviews: Vec<Review> = self
            .locked()
            .reviews
            .iter()
            .filter(|review| review.tutorial_id == tutorial_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tut_quiz::generate::canned_quiz;

    fn sample_tutorial(title: &str) -> NewTutorial {
        NewTutorial {
            title: title.to_string(),
            content: "<p>Loops repeat code.</p>".to_string(),
            tags: vec!["python".to_string()],
            image_url: None,
            author: "Anonymous".to_string(),
            author_id: None,
        }
    }

    fn sample_review(comment: &str) -> NewReview {
        NewReview {
            user_id: Uuid::new_v4(),
            user_name: "reader".to_string(),
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_tutorial() {
        let store = MemTutorialStore::new();
        let id = store
            .create_tutorial(sample_tutorial("Intro to Loops"))
            .await
            .expect("create should succeed");

        let tutorial = store
            .get_tutorial(id)
            .await
            .expect("get should succeed")
            .expect("tutorial should exist");
        assert_eq!(tutorial.title, "Intro to Loops");
        assert_eq!(tutorial.points, 0);
    }

    #[tokio::test]
    async fn test_save_quizzes_requires_tutorial() {
        let store = MemTutorialStore::new();
        let result = store.save_quizzes(Uuid::new_v4(), &canned_quiz()).await;
        assert!(matches!(result, Err(StoreError::TutorialNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_tutorial_removes_children() {
        let store = MemTutorialStore::new();
        let id = store
            .create_tutorial(sample_tutorial("Doomed"))
            .await
            .expect("create should succeed");
        store
            .save_quizzes(id, &canned_quiz())
            .await
            .expect("save should succeed");
        store
            .append_review(id, sample_review("nice"))
            .await
            .expect("review should append");

        store.delete_tutorial(id).await.expect("delete should succeed");

        assert_eq!(store.tutorial_count(), 0);
        assert_eq!(store.quiz_count(), 0);
        assert!(store
            .list_reviews(id)
            .await
            .expect("list should succeed")
            .is_empty());

        // Deleting again is a no-op, not an error.
        store.delete_tutorial(id).await.expect("delete is idempotent");
    }

    #[tokio::test]
    async fn test_list_reviews_newest_first() {
        let store = MemTutorialStore::new();
        let id = store
            .create_tutorial(sample_tutorial("Reviewed"))
            .await
            .expect("create should succeed");

        store
            .append_review(id, sample_review("first"))
            .await
            .expect("review should append");
        store
            .append_review(id, sample_review("second"))
            .await
            .expect("review should append");
        store
            .append_review(id, sample_review("third"))
            .await
            .expect("review should append");

        let reviews = store.list_reviews(id).await.expect("list should succeed");
        let comments: Vec<&str> = reviews.iter().map(|r| r.comment.as_str()).collect();
        assert_eq!(comments, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_append_rating_allows_repeat_ratings() {
        let store = MemTutorialStore::new();
        let id = store
            .create_tutorial(sample_tutorial("Rated"))
            .await
            .expect("create should succeed");

        let user_id = Uuid::new_v4();
        for stars in [3, 5] {
            store
                .append_rating(
                    id,
                    NewRating {
                        user_id,
                        user_name: "reader".to_string(),
                        stars,
                    },
                )
                .await
                .expect("rating should append");
        }

        assert_eq!(store.rating_count(), 2);
    }
}
