// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum GymsError {
    #[error("Gym not found with id: {0}")]
    NotFound(String),

    #[error("Gym already exists: {0}")]
    #[allow(dead_code)]
    AlreadyExists(String),

    #[error("Place-search provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Store read failed: {0}")]
    StoreQueryFailed(String),

    #[error("Store write failed: {0}")]
    StoreWriteFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationFailed(String),

    #[error("Sign-in required")]
    Unauthenticated,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Convert GymsError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for GymsError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            GymsError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            GymsError::AlreadyExists(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            GymsError::ProviderUnavailable(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_UNAVAILABLE"),
            GymsError::StoreQueryFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_QUERY_FAILED")
            }
            GymsError::StoreWriteFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_WRITE_FAILED")
            }
            GymsError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            GymsError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            GymsError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            GymsError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            GymsError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GymsError::NotFound(_) => StatusCode::NOT_FOUND,
            GymsError::AlreadyExists(_) => StatusCode::CONFLICT,
            GymsError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            GymsError::StoreQueryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GymsError::StoreWriteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GymsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GymsError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            GymsError::Unauthenticated => StatusCode::UNAUTHORIZED,
            GymsError::Forbidden => StatusCode::FORBIDDEN,
            GymsError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GymsError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GymsError::ValidationFailed("daily_price".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GymsError::ProviderUnavailable("credential".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GymsError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
