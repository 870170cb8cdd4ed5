use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::response::AppError;

/// `axum::Json<T>` that rejects with `AppError` instead of a plain-text body.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_app_error(rejection)),
        }
    }
}

fn json_rejection_to_app_error(rejection: JsonRejection) -> AppError {
    let reason = match &rejection {
        JsonRejection::JsonDataError(_) => "JSON data deserialization failed",
        JsonRejection::JsonSyntaxError(_) => "JSON syntax parsing failed",
        JsonRejection::MissingJsonContentType(_) => "Missing or invalid JSON Content-Type",
        JsonRejection::BytesRejection(_) => "Failed to read request body bytes",
        _ => "Unexpected JSON body rejection",
    };
    tracing::warn!(error = %rejection, reason, "Rejected request body");
    AppError::bad_request("INVALID_REQUEST_BODY", &rejection.body_text())
}

/// Single path segment extracted as `String`, rejecting with `AppError`.
pub struct PathId(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<String>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(id)) => Ok(PathId(id)),
            Err(rejection) => Err(path_rejection_to_app_error(rejection)),
        }
    }
}

fn path_rejection_to_app_error(rejection: PathRejection) -> AppError {
    tracing::warn!(error = %rejection, "Rejected path parameter");
    AppError::bad_request("INVALID_PATH", &rejection.body_text())
}
