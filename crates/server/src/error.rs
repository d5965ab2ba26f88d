//! API error type for the HTTP boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pipeline::RecommendationError;
use thiserror::Error;

use crate::models::ErrorResponse;

pub type ApiResult<T> = Result<T, ApiError>;

/// Any pipeline error; always rendered as 400 with an [`ErrorResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub RecommendationError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::from(self.0))).into_response()
    }
}
