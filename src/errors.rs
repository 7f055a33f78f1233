// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the planning engine and its service shell

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Engine errors (EmptyCatalog, UnresolvedOrigin,
/// UnknownPlanLabel) plus the service-level failures of the shell.
/// Each variant maps to an HTTP status code and error code.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("No places found for city: {0}")]
    EmptyCatalog(String),

    #[error("Traveler coordinates could not be resolved from the request or the profile")]
    UnresolvedOrigin,

    #[error("Selected plan not found or has no places: {0}")]
    UnknownPlanLabel(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl PlannerError {
    fn code(&self) -> &'static str {
        match self {
            PlannerError::EmptyCatalog(_) => "EMPTY_CATALOG",
            PlannerError::UnresolvedOrigin => "UNRESOLVED_ORIGIN",
            PlannerError::UnknownPlanLabel(_) => "UNKNOWN_PLAN_LABEL",
            PlannerError::NotFound(_) => "NOT_FOUND",
            PlannerError::DatabaseError(_) => "DATABASE_ERROR",
            PlannerError::InvalidInput(_) => "INVALID_INPUT",
            PlannerError::ValidationError(_) => "VALIDATION_ERROR",
        }
    }
}

/// Convert PlannerError to HTTP response
impl ResponseError for PlannerError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PlannerError::EmptyCatalog(_) => StatusCode::NOT_FOUND,
            PlannerError::UnresolvedOrigin => StatusCode::BAD_REQUEST,
            PlannerError::UnknownPlanLabel(_) => StatusCode::BAD_REQUEST,
            PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
            PlannerError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlannerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlannerError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            PlannerError::EmptyCatalog("Rivertown".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PlannerError::UnresolvedOrigin.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PlannerError::UnknownPlanLabel("Hybrid".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PlannerError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_carries_code() {
        let response = PlannerError::UnresolvedOrigin.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(PlannerError::UnresolvedOrigin.code(), "UNRESOLVED_ORIGIN");
    }
}
