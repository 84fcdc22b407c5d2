use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use utils::AppError;
use validator::Validate;

/// Json body extractor that runs validator rules before the handler sees
/// the value. Both a malformed body and a rule violation become AppError,
/// so every rejection keeps the `{"error": ...}` contract.
#[derive(Debug, Clone)]
pub struct ValidationExtractor<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidationExtractor<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;

        Ok(ValidationExtractor(value))
    }
}
