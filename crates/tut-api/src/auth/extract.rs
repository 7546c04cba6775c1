use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::ApiState;

use super::jwt;

/// An authenticated caller, extracted from the `Authorization: Bearer`
/// header. Rejects the request with 401 when the token is missing or bad.
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// User id from the token subject
    pub id: Uuid,
    /// Display name, if the token carries one
    pub name: Option<String>,
    /// Email, if the token carries one
    pub email: Option<String>,
}

impl AuthUser {
    /// Display-name fallback chain: name, then email, then "Anonymous".
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Anonymous".to_string())
    }

    fn from_parts_inner(parts: &Parts, jwt_secret: &str) -> Result<Self, ApiError> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Auth("Missing Authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Auth("Expected a bearer token".to_string()))?;

        let claims = jwt::verify_token(token, jwt_secret)?;
        let id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| ApiError::Auth("Token subject is not a valid user id".to_string()))?;

        Ok(Self {
            id,
            name: claims.name,
            email: claims.email,
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    ApiState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let api_state = ApiState::from_ref(state);
        Self::from_parts_inner(parts, &api_state.jwt_secret)
    }
}

/// Like [`AuthUser`], but an absent Authorization header extracts as `None`
/// instead of rejecting. A present-but-invalid token still rejects.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeUser
where
    ApiState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(Self(None));
        }
        let api_state = ApiState::from_ref(state);
        AuthUser::from_parts_inner(parts, &api_state.jwt_secret).map(|user| Self(Some(user)))
    }
}
