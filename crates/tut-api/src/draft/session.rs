use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use tut_quiz::Quiz;

use crate::error::ApiError;

/// How long a successful submission keeps reporting `Succeeded` before the
/// session settles back to `Idle`.
pub const SUCCESS_DISPLAY: Duration = Duration::from_millis(3000);

/// In-progress field values owned by a single authoring session.
#[derive(Clone, Debug, Default)]
pub struct TutorialDraft {
    /// Tutorial title
    pub title: String,
    /// Rich-text markup from the editor
    pub content: String,
    /// Ordered, duplicate-free tags
    pub tags: Vec<String>,
    /// Durable URL of an uploaded image, if any
    pub image_url: Option<String>,
}

impl TutorialDraft {
    /// Add a tag, keeping the list ordered and duplicate-free. Adding a tag
    /// that is already present leaves the list unchanged.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|existing| existing == tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Remove a tag. Removing an absent tag is a no-op.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|existing| existing != tag);
    }

    /// Clear every field back to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Submission state for one draft session.
#[derive(Clone, Debug)]
pub enum SubmissionStatus {
    /// No submission running
    Idle,
    /// A publish attempt is in flight
    Submitting,
    /// The last attempt succeeded; expires after [`SUCCESS_DISPLAY`]
    Succeeded {
        /// Id of the tutorial that was created
        tutorial_id: Uuid,
        /// When the attempt succeeded
        at: Instant,
    },
    /// The last attempt failed; sticks until acknowledged
    Failed {
        /// Why it failed
        reason: String,
    },
}

/// One authoring session: the draft, its lazily generated quiz, the
/// submission state, and the id of the last published tutorial.
#[derive(Debug)]
pub struct DraftSession {
    /// In-progress field values
    pub draft: TutorialDraft,
    /// Cached quiz, generated at most once unless explicitly regenerated
    pub quiz: Option<Quiz>,
    /// Id of the last tutorial published from this session
    pub tutorial_id: Option<Uuid>,
    status: SubmissionStatus,
}

impl Default for DraftSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftSession {
    /// A fresh, empty session.
    pub fn new() -> Self {
        Self {
            draft: TutorialDraft::default(),
            quiz: None,
            tutorial_id: None,
            status: SubmissionStatus::Idle,
        }
    }

    /// Current status. A `Succeeded` older than [`SUCCESS_DISPLAY`] has
    /// expired and reads as `Idle`.
    pub fn status(&mut self) -> SubmissionStatus {
        if let SubmissionStatus::Succeeded { at, .. } = self.status {
            if at.elapsed() >= SUCCESS_DISPLAY {
                self.status = SubmissionStatus::Idle;
            }
        }
        self.status.clone()
    }

    /// True while a publish is running against this session.
    pub fn is_submitting(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitting)
    }

    /// Claim the session for a publish attempt. Rejecting a second claim
    /// while one is in flight is what makes the submit action idempotent.
    pub fn begin_submit(&mut self) -> Result<(), ApiError> {
        if self.is_submitting() {
            return Err(ApiError::SubmissionInFlight);
        }
        self.status = SubmissionStatus::Submitting;
        Ok(())
    }

    /// Settle a failed attempt. The draft stays intact for a retry.
    pub fn fail(&mut self, reason: String) {
        self.status = SubmissionStatus::Failed { reason };
    }

    /// Settle a successful attempt: remember the new id, clear the form and
    /// the cached quiz, and start the transient success display.
    pub fn succeed(&mut self, tutorial_id: Uuid) {
        self.tutorial_id = Some(tutorial_id);
        self.draft.reset();
        self.quiz = None;
        self.status = SubmissionStatus::Succeeded {
            tutorial_id,
            at: Instant::now(),
        };
    }

    /// Acknowledge a failure, returning the session to `Idle`.
    pub fn acknowledge_failure(&mut self) {
        if matches!(self.status, SubmissionStatus::Failed { .. }) {
            self.status = SubmissionStatus::Idle;
        }
    }
}

/// Shared handle to one session.
pub type SessionHandle = Arc<tokio::sync::Mutex<DraftSession>>;

/// All live draft sessions, keyed by id. In-memory only: drafts do not
/// survive a restart.
#[derive(Clone, Debug, Default)]
pub struct Sessions {
    inner: Arc<Mutex<HashMap<Uuid, SessionHandle>>>,
}

impl Sessions {
    /// Open a new, empty session and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.locked()
            .insert(id, Arc::new(tokio::sync::Mutex::new(DraftSession::new())));
        id
    }

    /// Look a session up by id.
    pub fn get(&self, id: Uuid) -> Result<SessionHandle, ApiError> {
        self.locked()
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound("draft"))
    }

    /// Drop a session. An in-flight publish keeps its own handle and settles
    /// against the detached session without further effect.
    pub fn remove(&self, id: Uuid) {
        self.locked().remove(&id);
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<Uuid, SessionHandle>> {
        self.inner.lock().expect("session map lock poisoned")
    }
}
