use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while pushing an asset to the image host.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The upload request failed or came back non-2xx.
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The host answered 2xx but without a durable URL.
    #[error("upload response did not contain a secure URL")]
    MissingUrl,
}

/// Capability contract for durable asset uploads: bytes in, durable URL out.
/// Any file type is accepted and forwarded as-is.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Upload one file and return its durable URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError>;
}

const UPLOAD_ENDPOINT: &str = "https://api.cloudinary.com/v1_1";

/// Uploader backed by a Cloudinary unsigned upload preset.
#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    http: reqwest::Client,
    endpoint: String,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

impl CloudinaryUploader {
    /// Uploader against the public Cloudinary endpoint.
    pub fn new(cloud_name: String, upload_preset: String) -> Self {
        Self::with_endpoint(UPLOAD_ENDPOINT.to_string(), cloud_name, upload_preset)
    }

    /// Uploader with an endpoint override, for pointing tests at a stub.
    pub fn with_endpoint(endpoint: String, cloud_name: String, upload_preset: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            cloud_name,
            upload_preset,
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.endpoint, self.cloud_name)
    }
}

#[async_trait]
impl AssetUploader for CloudinaryUploader {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let payload: UploadResponse = response.json().await?;
        payload.secure_url.ok_or(UploadError::MissingUrl)
    }
}
