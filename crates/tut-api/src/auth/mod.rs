//! Identity provider integration: HS256 bearer tokens carrying the user's
//! id, display name and email.

pub mod extract;
pub mod jwt;

pub use extract::{AuthUser, MaybeUser};
