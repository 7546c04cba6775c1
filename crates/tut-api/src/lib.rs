pub mod auth;
pub mod config;
pub mod draft;
pub mod error;
pub mod media;
pub mod metrics;
pub mod router;
pub mod state;
pub mod tracing;
pub mod tutorial;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
