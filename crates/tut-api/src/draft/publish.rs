//! The submission workflow: ensure a quiz exists, create the tutorial,
//! attach the quiz, then settle the session.

use std::sync::Arc;

use uuid::Uuid;

use tut_db::{NewTutorial, TutorialStore};
use tut_quiz::{Quiz, QuizGenerator};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::metrics;

use super::session::SessionHandle;

/// Run one submission attempt against a session.
///
/// Strictly ordered: ensure a quiz exists (generating and caching one when
/// absent), create the tutorial record, attach the quiz. A quiz-save failure
/// deletes the just-created tutorial so no orphan survives. On success the
/// draft resets and the session keeps the new id; on failure the draft is
/// left intact for a retry. No step is ever retried here.
pub async fn publish(
    session: SessionHandle,
    store: Arc<dyn TutorialStore>,
    generator: Arc<dyn QuizGenerator>,
    author: Option<AuthUser>,
) -> Result<Uuid, ApiError> {
    let (draft, cached_quiz) = {
        let mut session = session.lock().await;
        let draft = session.draft.clone();
        if draft.title.trim().is_empty() {
            return Err(ApiError::Validation("Title must not be empty".to_string()));
        }
        if draft.content.trim().is_empty() {
            return Err(ApiError::Validation(
                "Content must not be empty".to_string(),
            ));
        }
        session.begin_submit()?;
        (draft, session.quiz.clone())
    };

    let quiz = match ensure_quiz(&session, cached_quiz, generator, &draft.content).await {
        Ok(quiz) => quiz,
        Err(err) => return Err(settle_failure(&session, err).await),
    };

    let new = NewTutorial {
        title: draft.title,
        content: draft.content,
        tags: draft.tags,
        image_url: draft.image_url,
        author: author
            .as_ref()
            .map(AuthUser::display_name)
            .unwrap_or_else(|| "Anonymous".to_string()),
        author_id: author.as_ref().map(|user| user.id),
    };

    let tutorial_id = match store.create_tutorial(new).await {
        Ok(id) => id,
        Err(err) => return Err(settle_failure(&session, err.into()).await),
    };

    if let Err(err) = store.save_quizzes(tutorial_id, &quiz).await {
        // Compensate so a quiz-less tutorial never survives the failure.
        if let Err(cleanup) = store.delete_tutorial(tutorial_id).await {
            tracing::error!(
                %tutorial_id,
                "failed to remove tutorial after quiz save error: {cleanup}"
            );
        }
        return Err(settle_failure(&session, err.into()).await);
    }

    session.lock().await.succeed(tutorial_id);
    metrics::record_publish(true);
    tracing::info!(%tutorial_id, "tutorial published");

    Ok(tutorial_id)
}

/// Reuse the session's cached quiz, or generate a fresh one and cache it so
/// a later retry does not hit the generator again.
async fn ensure_quiz(
    session: &SessionHandle,
    cached: Option<Quiz>,
    generator: Arc<dyn QuizGenerator>,
    content: &str,
) -> Result<Quiz, ApiError> {
    if let Some(quiz) = cached {
        return Ok(quiz);
    }

    let quiz = match generator.generate(content).await {
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
    Ok(quiz)
}

async fn settle_failure(session: &SessionHandle, err: ApiError) -> ApiError {
    metrics::record_publish(false);
    session.lock().await.fail(err.to_string());
    err
}
