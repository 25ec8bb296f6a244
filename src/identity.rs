// region:    --- Imports
use crate::error::AppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

// endregion: --- Imports

/// Header carrying the acting user's id on every identity-scoped route.
pub const SHARER_USER_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the acting user's id. Pulls `X-Sharer-User-Id` off the
/// request and parses it; whether that id names a real user is checked
/// against the store by the operation itself.
#[derive(Debug, Clone, Copy)]
pub struct SharerId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_HEADER)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing {SHARER_USER_HEADER} header."))
            })?;
        let id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Invalid {SHARER_USER_HEADER} header."))
            })?;
        Ok(SharerId(id))
    }
}
