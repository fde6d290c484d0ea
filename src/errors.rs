// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for discovery and its HTTP surface

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure the discovery flow can report.
/// Under the masking fallback policy only InvalidInput, ValidationError,
/// Unauthorized and Superseded ever reach a caller.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Discovery request {generation} was superseded by a newer request")]
    Superseded { generation: u64 },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Malformed external API response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error")]
    InternalError,
}

impl DiscoveryError {
    /// Stable machine-readable code used in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            DiscoveryError::InvalidInput(_) => "INVALID_INPUT",
            DiscoveryError::ValidationError(_) => "VALIDATION_ERROR",
            DiscoveryError::Unauthorized => "UNAUTHORIZED",
            DiscoveryError::Superseded { .. } => "SUPERSEDED",
            DiscoveryError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            DiscoveryError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            DiscoveryError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            DiscoveryError::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error came from the places provider side.
    /// These are the failures the fallback policy is allowed to mask.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DiscoveryError::RateLimitExceeded
                | DiscoveryError::ExternalApiError(_)
                | DiscoveryError::MalformedResponse(_)
        )
    }
}

/// Convert DiscoveryError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for DiscoveryError {
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
            DiscoveryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DiscoveryError::ValidationError(_) => StatusCode::BAD_REQUEST,
            DiscoveryError::Unauthorized => StatusCode::UNAUTHORIZED,
            DiscoveryError::Superseded { .. } => StatusCode::CONFLICT,
            DiscoveryError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            DiscoveryError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            DiscoveryError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            DiscoveryError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
