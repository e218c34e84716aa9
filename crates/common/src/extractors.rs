//! Request extractors that validate at the boundary

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::Error;

/// JSON body that has already passed `T::validate()`.
///
/// Every endpoint accepts exactly one request shape. A body that is not JSON,
/// does not deserialize into `T`, or fails validation is rejected with 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

fn body_error(rejection: JsonRejection) -> Error {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            Error::Validation("Content-Type must be application/json".to_string())
        }
        other => Error::Validation(format!("Invalid request body: {}", other.body_text())),
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(body_error)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
