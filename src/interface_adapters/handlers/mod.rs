pub mod appointments;
pub mod exercise_plans;
pub mod guests;
pub mod ledger;
pub mod packages;

use axum::{http::StatusCode, Json};

use crate::interface_adapters::protocol::{ErrorResponse, MessageResponse};

// Liveness check.
pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "backend is running".to_string(),
    })
}

// Helper to build a JSON error response.
pub fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}
