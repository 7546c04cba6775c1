use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Question, Quiz};

/// Errors raised while turning tutorial content into a quiz.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The authored content was empty; there is nothing to ask about.
    #[error("tutorial content is empty")]
    EmptyContent,
    /// The request to the quiz service failed.
    #[error("quiz service request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered, but not with anything we can use.
    #[error("quiz service returned an unusable response: {0}")]
    MalformedResponse(String),
    /// After repair, one of the tiers ended up with no questions.
    #[error("generated quiz has no usable {0} questions")]
    MissingTier(&'static str),
}

/// Capability contract for quiz generation.
///
/// Implementations must reject empty content and must only return quizzes
/// whose tiers are all non-empty and whose questions are well formed.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Generate a three-tier quiz from authored tutorial content.
    async fn generate(&self, content: &str) -> Result<Quiz, GenerateError>;
}

/// Generator that returns a fixed quiz.
///
/// Used in development when no Gemini API key is configured, and by the test
/// suite. The questions are generic on purpose; they reference the tutorial
/// rather than its content.
#[derive(Debug, Default, Clone)]
pub struct CannedGenerator;

#[async_trait]
impl QuizGenerator for CannedGenerator {
    async fn generate(&self, content: &str) -> Result<Quiz, GenerateError> {
        if content.trim().is_empty() {
            return Err(GenerateError::EmptyContent);
        }
        Ok(canned_quiz())
    }
}

/// The fixed quiz handed out by [`CannedGenerator`].
pub fn canned_quiz() -> Quiz {
    let question = |prompt: &str, options: &[&str], answer: usize| Question {
        prompt: prompt.to_string(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        answer,
    };

    Quiz {
        easy: vec![question(
            "What is the main topic of this tutorial?",
            &[
                "The subject explained above",
                "An unrelated subject",
                "Nothing in particular",
            ],
            0,
        )],
        medium: vec![question(
            "Which approach does the tutorial recommend?",
            &[
                "Ignoring the steps",
                "Following the steps in order",
                "Skipping to the end",
            ],
            1,
        )],
        hard: vec![question(
            "What should you do after reading the tutorial?",
            &[
                "Forget it",
                "Memorize it word for word",
                "Practice what it teaches",
            ],
            2,
        )],
    }
}
