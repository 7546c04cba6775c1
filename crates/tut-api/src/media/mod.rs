//! Asset uploads: a thin proxy in front of the image host, so the client
//! gets back a durable URL to attach to the draft.

pub mod cloudinary;
pub mod routes;

pub use cloudinary::{AssetUploader, CloudinaryUploader, UploadError};
pub use routes::routes;
