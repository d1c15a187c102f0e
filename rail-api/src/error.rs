use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rail_core::validation::ValidationResult;
use rail_core::CoreError;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Route not found: {0}")]
    RouteNotFound(String),
    #[error("Passenger records are incomplete")]
    InvalidPassengers(Vec<ValidationResult>),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            AppError::Core(CoreError::ValidationError(field)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field": field }),
            ),
            AppError::Core(CoreError::InvariantViolation(_)) => {
                (StatusCode::CONFLICT, json!({ "error": message }))
            }
            AppError::Core(CoreError::NetworkError(_)) => {
                tracing::error!("Backend call failed: {}", message);
                (StatusCode::BAD_GATEWAY, json!({ "error": message }))
            }
            AppError::SessionNotFound(_) | AppError::RouteNotFound(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            AppError::InvalidPassengers(records) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "records": records }),
            ),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
        };

        (status, Json(body)).into_response()
    }
}
