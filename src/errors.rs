use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("payment provider error: {0}")]
    Payment(String),

    #[error("payment not completed (status: {0})")]
    PaymentDeclined(String),

    #[error("email error: {0}")]
    Mail(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Payment(_) | AppError::Mail(_) => StatusCode::BAD_GATEWAY,
            AppError::PaymentDeclined(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        };

        // Internal detail stays in the logs, not in the response body.
        let body = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                serde_json::json!({ "error": "internal server error" })
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                serde_json::json!({ "error": "internal server error" })
            }
            AppError::PaymentDeclined(status) => {
                serde_json::json!({ "success": false, "error": self.to_string(), "status": status })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
