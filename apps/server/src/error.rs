use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use depotbook_core::errors::Error as CoreError;
use depotbook_core::DepotError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

/// HTTP status for a core failure.
pub fn core_status(error: &CoreError) -> StatusCode {
    match error {
        CoreError::Depot(e) if e.is_not_found() => StatusCode::NOT_FOUND,
        CoreError::Depot(DepotError::DuplicateName(_))
        | CoreError::Depot(DepotError::OverlappingSavingsPlan { .. }) => StatusCode::CONFLICT,
        CoreError::Depot(_) | CoreError::Calculation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => (core_status(e), e.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", msg);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DepotError> for ApiError {
    fn from(err: DepotError) -> Self {
        ApiError::Core(err.into())
    }
}
