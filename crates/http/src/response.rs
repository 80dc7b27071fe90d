//! Success envelope and request extractors

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppError;

/// `{ success, data?, message?, pagination? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T, P = serde_json::Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<P>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }
}

impl<T, P> ApiResponse<T, P> {
    pub fn paginated(data: T, pagination: P) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: Some(pagination),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// JSON body extractor whose rejections use the error envelope.
///
/// The rejection's status is kept: 400 for unparsable JSON, 413 past the body
/// limit, 415 without a JSON content type, 422 for a body of the wrong shape.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}
