use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::{error::AppError, validation::FromPayload};

/// JSON object body, validated into `T` before the handler runs.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FromPayload + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Json::<Value>::from_request(req, state).await {
            Ok(Json(v)) => v,
            Err(rejection) => {
                debug!(error = %rejection, "body rejected");
                return Err(AppError::BadRequest("Request must be JSON".into()));
            }
        };
        let Value::Object(payload) = value else {
            return Err(AppError::BadRequest("Request must be JSON".into()));
        };
        T::from_payload(&payload)
            .map(ValidatedJson)
            .map_err(AppError::Validation)
    }
}

/// Integer `:id` path segment. Anything else is treated as an unknown route.
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Resource not found".into()))?;
        Ok(UserId(id))
    }
}
