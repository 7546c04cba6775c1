use std::env;

/// Runtime environment, selected with the `ENVIRONMENT` variable.
/// Anything other than production counts as development.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Local development: pretty logs, relaxed defaults
    Development,
    /// Deployed: JSON logs
    Production,
}

impl Environment {
    /// Read the environment from `ENVIRONMENT`, defaulting to development.
    pub fn from_env() -> Self {
        match env::var("ENVIRONMENT").as_deref() {
            Ok("production") | Ok("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    /// True when running in development mode.
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Configuration for the authoring API, read from environment variables.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Runtime environment
    pub env: Environment,
    /// Port the server listens on (`PORT`, default 3000)
    pub port: u16,
    /// Postgres connection string (`DATABASE_URL`)
    pub database_url: String,
    /// Secret for signing and verifying bearer tokens (`JWT_SECRET`)
    pub jwt_secret: String,
    /// Cloudinary cloud-name segment of the upload URL (`CLOUDINARY_CLOUD_NAME`)
    pub cloudinary_cloud_name: String,
    /// Cloudinary unsigned upload preset (`CLOUDINARY_UPLOAD_PRESET`)
    pub cloudinary_upload_preset: String,
    /// Gemini API key (`GEMINI_API_KEY`); without one, quiz generation falls
    /// back to canned questions
    pub gemini_api_key: Option<String>,
    /// Gemini model name (`GEMINI_MODEL`)
    pub gemini_model: String,
}

impl ApiConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            env: Environment::from_env(),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")?,
            cloudinary_upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")?,
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
        })
    }
}
