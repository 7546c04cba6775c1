use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::{DraftSession, SubmissionStatus};

/// Partial update of draft fields; absent fields are left untouched. An
/// empty `image_url` clears the attached image.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDraft {
    /// New title
    pub title: Option<String>,
    /// New rich-text content
    pub content: Option<String>,
    /// New image URL; empty string clears it
    pub image_url: Option<String>,
}

/// Payload for adding a tag.
#[derive(Debug, Deserialize)]
pub struct AddTag {
    /// The tag to add
    pub tag: String,
}

/// Response to opening a draft session.
#[derive(Debug, Serialize)]
pub struct DraftCreated {
    /// Id of the new session
    pub id: Uuid,
}

/// Response to a successful publish.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    /// Id of the tutorial that was created
    pub tutorial_id: Uuid,
}

/// Wire form of [`SubmissionStatus`].
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusView {
    /// No submission running
    Idle,
    /// A publish attempt is in flight
    Submitting,
    /// The last attempt succeeded
    Succeeded {
        /// Id of the tutorial that was created
        tutorial_id: Uuid,
    },
    /// The last attempt failed
    Failed {
        /// Why it failed
        reason: String,
    },
}

impl From<SubmissionStatus> for StatusView {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Idle => Self::Idle,
            SubmissionStatus::Submitting => Self::Submitting,
            SubmissionStatus::Succeeded { tutorial_id, .. } => Self::Succeeded { tutorial_id },
            SubmissionStatus::Failed { reason } => Self::Failed { reason },
        }
    }
}

/// What the client sees when reading a draft session.
#[derive(Debug, Serialize)]
pub struct DraftView {
    /// Current title
    pub title: String,
    /// Current rich-text content
    pub content: String,
    /// Current tags
    pub tags: Vec<String>,
    /// Current image URL
    pub image_url: Option<String>,
    /// Whether a generated quiz is cached for this session
    pub has_quiz: bool,
    /// Submission state
    pub status: StatusView,
    /// Id of the last tutorial published from this session
    pub tutorial_id: Option<Uuid>,
}

impl DraftView {
    /// Snapshot a session. Takes `&mut` because reading the status settles
    /// an expired success display.
    pub fn from_session(session: &mut DraftSession) -> Self {
        let status = session.status();
        Self {
            title: session.draft.title.clone(),
            content: session.draft.content.clone(),
            tags: session.draft.tags.clone(),
            image_url: session.draft.image_url.clone(),
            has_quiz: session.quiz.is_some(),
            status: status.into(),
            tutorial_id: session.tutorial_id,
        }
    }
}
