//! Published tutorials and their review/rating side-channel.

pub mod model;
pub mod routes;

pub use routes::routes;
