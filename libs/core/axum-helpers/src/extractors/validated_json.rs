//! JSON bodies checked with `validator` before reaching the handler.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserialized and validated JSON body.
///
/// Malformed JSON and failed validation both reject with a 4xx
/// [`ErrorResponse`](crate::errors::ErrorResponse).
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

/// Like [`ValidatedJson`], but a literal `null` body yields `None` so the
/// handler decides what an absent payload means.
pub struct ValidatedOptionalJson<T>(pub Option<T>);

impl<T, S> FromRequest<S> for ValidatedOptionalJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<Option<T>>::from_request(req, state).await?;
        if let Some(payload) = &data {
            payload.validate()?;
        }
        Ok(ValidatedOptionalJson(data))
    }
}
