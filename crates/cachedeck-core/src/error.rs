//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for CacheDeck.
///
/// Absence of a cache or an entry on the read paths is not an error; those
/// operations return `Option`. The variants below cover everything that
/// should surface to a caller as a failed request.
#[derive(Error, Debug)]
pub enum CacheDeckError {
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backing store (Redis) error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Backing store unreachable
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Value (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheDeckError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Unavailable(_) => 503,
            Self::Configuration(_)
            | Self::Cache(_)
            | Self::Serialization(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error originates from the backing store.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::Cache(_) | Self::Unavailable(_))
    }
}

impl From<serde_json::Error> for CacheDeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `CacheDeckError`.
    #[must_use]
    pub fn from_error(error: &CacheDeckError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&CacheDeckError> for ErrorResponse {
    fn from(error: &CacheDeckError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(CacheDeckError::not_found("Cache", "orders").status_code(), 404);
        assert_eq!(CacheDeckError::validation("empty name").status_code(), 400);
        assert_eq!(CacheDeckError::cache("connection reset").status_code(), 500);
        assert_eq!(CacheDeckError::configuration("bad").status_code(), 500);
        assert_eq!(
            CacheDeckError::Unavailable("redis down".to_string()).status_code(),
            503
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CacheDeckError::not_found("Cache", "x").error_code(), "NOT_FOUND");
        assert_eq!(CacheDeckError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(CacheDeckError::cache("x").error_code(), "CACHE_ERROR");
        assert_eq!(
            CacheDeckError::Serialization("x".to_string()).error_code(),
            "SERIALIZATION_ERROR"
        );
        assert_eq!(CacheDeckError::internal("x").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_store_failures() {
        assert!(CacheDeckError::cache("timeout").is_store_failure());
        assert!(CacheDeckError::Unavailable("down".to_string()).is_store_failure());
        assert!(!CacheDeckError::validation("bad").is_store_failure());
        assert!(!CacheDeckError::not_found("Cache", "x").is_store_failure());
    }

    #[test]
    fn test_serde_json_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let converted = CacheDeckError::from(err);
        assert_eq!(converted.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_error_response_from_error() {
        let err = CacheDeckError::not_found("Cache", "orders");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(response.message.contains("orders"));
    }

    #[test]
    fn test_error_response_serializes_code_and_message() {
        let response = ErrorResponse::from(&CacheDeckError::cache("boom"));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["code"], "CACHE_ERROR");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
