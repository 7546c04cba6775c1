use std::sync::Arc;

use sqlx::PgPool;

use tut_db::{PgTutorialStore, TutorialStore};
use tut_quiz::{CannedGenerator, GeminiGenerator, QuizGenerator};

use crate::config::{ApiConfig, Environment};
use crate::draft::Sessions;
use crate::media::{AssetUploader, CloudinaryUploader};

/// Shared application state.
///
/// The three external collaborators (store, quiz generator, uploader) are
/// trait objects so routes and the submission workflow can be exercised
/// against in-memory fakes.
#[derive(Clone)]
pub struct ApiState {
    /// Tutorial document store
    pub store: Arc<dyn TutorialStore>,
    /// Quiz generation service
    pub quiz_generator: Arc<dyn QuizGenerator>,
    /// Image host adapter
    pub uploader: Arc<dyn AssetUploader>,
    /// Live draft sessions
    pub sessions: Sessions,
    /// Secret for verifying bearer tokens
    pub jwt_secret: String,
    /// Runtime environment
    pub environment: Environment,
}

impl ApiState {
    /// Wire up the production collaborators from the configuration.
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let quiz_generator: Arc<dyn QuizGenerator> = match config.gemini_api_key {
            Some(api_key) => Arc::new(GeminiGenerator::new(api_key, config.gemini_model)),
            None => {
                tracing::warn!(
                    "GEMINI_API_KEY not set; quiz generation will return canned questions"
                );
                Arc::new(CannedGenerator)
            }
        };

        let uploader: Arc<dyn AssetUploader> = Arc::new(CloudinaryUploader::new(
            config.cloudinary_cloud_name,
            config.cloudinary_upload_preset,
        ));

        Self {
            store: Arc::new(PgTutorialStore::new(pool)),
            quiz_generator,
            uploader,
            sessions: Sessions::default(),
            jwt_secret: config.jwt_secret,
            environment: config.env,
        }
    }
}
