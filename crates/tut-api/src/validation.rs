use crate::error::ApiError;

/// Longest tag we accept.
const MAX_TAG_LEN: usize = 40;

/// Normalize a tag: trim surrounding whitespace, reject empty or oversized
/// values.
///
/// # Examples
/// ```
/// use tut_api::validation::normalize_tag;
///
/// assert_eq!(normalize_tag(" python ").unwrap(), "python");
/// assert!(normalize_tag("   ").is_err());
/// ```
pub fn normalize_tag(tag: &str) -> Result<String, ApiError> {
    let tag = tag.trim();

    if tag.is_empty() {
        return Err(ApiError::Validation("Tag cannot be empty".to_string()));
    }

    if tag.len() > MAX_TAG_LEN {
        return Err(ApiError::Validation(format!(
            "Tag cannot exceed {MAX_TAG_LEN} characters"
        )));
    }

    Ok(tag.to_string())
}
