use serde::Deserialize;
use validator::Validate;

/// Payload for appending a review.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReview {
    /// Comment text; must not be empty
    #[validate(length(min = 1, message = "comment must not be empty"))]
    pub comment: String,
}

/// Payload for appending a rating.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRating {
    /// Star value, 1 through 5
    #[validate(range(min = 1, max = 5, message = "stars must be between 1 and 5"))]
    pub stars: i16,
}
