use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::usecases::UsecaseError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Usecase(#[from] UsecaseError),
    #[error("{0}")]
    InvalidId(String),
    #[error("Authentication required!")]
    Unauthenticated,
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Usecase(e) => match e {
                UsecaseError::NotFound(_) => StatusCode::NOT_FOUND,
                UsecaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                UsecaseError::Validation(_) => StatusCode::BAD_REQUEST,
                UsecaseError::Conflict(_) => StatusCode::CONFLICT,
                UsecaseError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidId(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Usecase(UsecaseError::Repository(e)) => {
                tracing::error!("repository failure: {}", e);
                "Something went wrong, please try again later!".to_string()
            },
            e => e.to_string(),
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}
