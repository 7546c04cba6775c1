use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;
use uuid::Uuid;

use tut_api::ApiState;
use tut_api::config::Environment;
use tut_api::draft::Sessions;
use tut_api::media::{AssetUploader, UploadError};
use tut_db::{
    MemTutorialStore, NewRating, NewReview, NewTutorial, Rating, Review, StoreError, Tutorial,
    TutorialStore,
};
use tut_quiz::{GenerateError, Question, Quiz, QuizGenerator};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret_minimum_32_characters_long";

/// The quiz every stubbed generation returns.
pub fn sample_quiz() -> Quiz {
    let question = |prompt: &str| Question {
        prompt: prompt.to_string(),
        options: vec!["yes".to_string(), "no".to_string()],
        answer: 0,
    };
    Quiz {
        easy: vec![question("easy one")],
        medium: vec![question("medium one")],
        hard: vec![question("hard one")],
    }
}

/// Quiz generator stub: counts calls and can be switched into failure mode.
pub struct StubGenerator {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuizGenerator for StubGenerator {
    async fn generate(&self, content: &str) -> Result<Quiz, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerateError::MalformedResponse(
                "stub generator failure".to_string(),
            ));
        }
        if content.trim().is_empty() {
            return Err(GenerateError::EmptyContent);
        }
        Ok(sample_quiz())
    }
}

/// Uploader stub returning a canned durable URL.
pub struct StubUploader {
    fail: AtomicBool,
}

impl StubUploader {
    pub fn new() -> Self {
        Self {
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetUploader for StubUploader {
    async fn upload(&self, file_name: &str, _bytes: Vec<u8>) -> Result<String, UploadError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(UploadError::MissingUrl);
        }
        Ok(format!("https://cdn.example.com/{file_name}"))
    }
}

/// Store wrapper that can fail the next create or quiz save, for exercising
/// the workflow's abort and compensation paths. Everything else delegates to
/// the in-memory store.
pub struct FlakyStore {
    inner: Arc<MemTutorialStore>,
    fail_next_create: AtomicBool,
    fail_next_save_quizzes: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemTutorialStore>) -> Self {
        Self {
            inner,
            fail_next_create: AtomicBool::new(false),
            fail_next_save_quizzes: AtomicBool::new(false),
        }
    }

    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_save_quizzes(&self) {
        self.fail_next_save_quizzes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TutorialStore for FlakyStore {
    async fn create_tutorial(&self, new: NewTutorial) -> Result<Uuid, StoreError> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.create_tutorial(new).await
    }

    async fn save_quizzes(&self, tutorial_id: Uuid, quiz: &Quiz) -> Result<(), StoreError> {
        if self.fail_next_save_quizzes.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.save_quizzes(tutorial_id, quiz).await
    }

    async fn delete_tutorial(&self, tutorial_id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_tutorial(tutorial_id).await
    }

    async fn get_tutorial(&self, tutorial_id: Uuid) -> Result<Option<Tutorial>, StoreError> {
        self.inner.get_tutorial(tutorial_id).await
    }

    async fn get_quizzes(&self, tutorial_id: Uuid) -> Result<Option<Quiz>, StoreError> {
        self.inner.get_quizzes(tutorial_id).await
    }

    async fn append_review(&self, tutorial_id: Uuid, new: NewReview) -> Result<Review, StoreError> {
        self.inner.append_review(tutorial_id, new).await
    }

    async fn append_rating(&self, tutorial_id: Uuid, new: NewRating) -> Result<Rating, StoreError> {
        self.inner.append_rating(tutorial_id, new).await
    }

    async fn list_reviews(&self, tutorial_id: Uuid) -> Result<Vec<Review>, StoreError> {
        self.inner.list_reviews(tutorial_id).await
    }
}

/// A full router wired to in-memory fakes, plus handles to poke them.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemTutorialStore>,
    pub flaky: Arc<FlakyStore>,
    pub generator: Arc<StubGenerator>,
    pub uploader: Arc<StubUploader>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemTutorialStore::new());
        let flaky = Arc::new(FlakyStore::new(store.clone()));
        let generator = Arc::new(StubGenerator::new());
        let uploader = Arc::new(StubUploader::new());

        let state = ApiState {
            store: flaky.clone(),
            quiz_generator: generator.clone(),
            uploader: uploader.clone(),
            sessions: Sessions::default(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: Environment::Development,
        };

        let router = tut_api::router::router().with_state(state);

        Self {
            router,
            store,
            flaky,
            generator,
            uploader,
        }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes()
            .to_vec();

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    pub async fn post_empty(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    pub async fn put_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    pub async fn post_with_auth(&self, uri: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("Failed to build authenticated request");

        self.request(request).await
    }

    pub async fn post_json_with_auth<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        token: &str,
    ) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(json_body))
            .expect("Failed to build authenticated request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }
}

/// Generate a bearer token signed with the test secret.
pub fn auth_token(user_id: Uuid, name: Option<&str>, email: Option<&str>) -> String {
    tut_api::auth::jwt::generate_token(
        user_id,
        name.map(String::from),
        email.map(String::from),
        TEST_JWT_SECRET,
        24,
    )
    .expect("Failed to generate test token")
}

/// Open a draft session and return its id.
pub async fn create_draft(app: &TestApp) -> Uuid {
    let response = app.post_empty("/drafts").await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["id"]
        .as_str()
        .expect("draft id should be a string")
        .parse()
        .expect("draft id should be a uuid")
}

/// Fill a draft's title and content.
pub async fn seed_draft(app: &TestApp, id: Uuid, title: &str, content: &str) {
    let response = app
        .put_json(
            &format!("/drafts/{id}"),
            &serde_json::json!({ "title": title, "content": content }),
        )
        .await;
    response.assert_status(StatusCode::OK);
}

/// Publish a draft seeded with sample content and return the tutorial id.
pub async fn publish_sample(app: &TestApp) -> Uuid {
    let draft_id = create_draft(app).await;
    seed_draft(app, draft_id, "Intro to Loops", "<p>Loops repeat code.</p>").await;

    let response = app.post_empty(&format!("/drafts/{draft_id}/publish")).await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    body["tutorial_id"]
        .as_str()
        .expect("tutorial id should be a string")
        .parse()
        .expect("tutorial id should be a uuid")
}
