//! Error types for the mirror.
//!
//! This module defines the `MirrorError` enum which represents the failures
//! that storage adapters and mirror queries can surface.

use thiserror::Error;

/// The main error type for mirror operations.
#[derive(Debug, Error)]
pub enum MirrorError {
    // ==================== Storage Errors ====================
    /// A storage operation failed.
    #[error("Database error: {message}")]
    Database { message: String },

    /// The requested record was not found.
    #[error("Record not found: {entity} with {key}={value}")]
    NotFound {
        entity: String,
        key: String,
        value: String,
    },

    /// A unique index was violated (e.g., duplicate external id).
    #[error("Duplicate entry: {entity} with {field}={value} already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    // ==================== Access Errors ====================
    /// No authenticated caller identity is available.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The caller is authenticated but not allowed to perform the operation.
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    // ==================== Validation Errors ====================
    /// A field value is invalid.
    #[error("Invalid field value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    // ==================== Configuration Errors ====================
    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ==================== Internal Errors ====================
    /// Serialization/deserialization failed.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MirrorError {
    /// Creates a new database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a new duplicate entry error.
    pub fn duplicate(entity: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new forbidden error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Creates a new invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by the caller rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::InvalidField { .. }
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Duplicate { .. } => 409,
            Self::InvalidField { .. } => 422,
            _ => 500,
        }
    }
}

/// A Result type alias using MirrorError.
pub type MirrorResult<T> = Result<T, MirrorError>;

impl From<serde_json::Error> for MirrorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MirrorError::not_found("user", "externalId", "user_123");
        assert_eq!(
            err.to_string(),
            "Record not found: user with externalId=user_123"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(MirrorError::Unauthenticated.status_code(), 401);
        assert_eq!(MirrorError::forbidden("nope").status_code(), 403);
        assert_eq!(MirrorError::duplicate("role", "externalId", "r").status_code(), 409);
        assert_eq!(MirrorError::database("down").status_code(), 500);
    }

    #[test]
    fn test_is_user_error() {
        assert!(MirrorError::Unauthenticated.is_user_error());
        assert!(!MirrorError::internal("boom").is_user_error());
    }
}
