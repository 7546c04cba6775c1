//! Draft sessions: the authoring form's server-held state, and the publish
//! workflow that turns a draft into a stored tutorial with its quiz.

pub mod model;
pub mod publish;
pub mod routes;
pub mod session;

pub use routes::routes;
pub use session::{DraftSession, Sessions, SubmissionStatus, TutorialDraft};
