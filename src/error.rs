//! Custom error types for the back office
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for back-office operations
#[derive(Error, Debug)]
pub enum BackofficeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A client cannot be removed while service orders point at it
    #[error("Client '{client}' cannot be deleted: {count} linked service order(s) exist")]
    LinkedServiceOrders { client: String, count: usize },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackofficeError {
    /// Create a "not found" error for clients
    pub fn client_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Client",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for service orders
    pub fn service_order_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Service order",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for purchases
    pub fn purchase_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Purchase",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was raised by the referential integrity guard
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::LinkedServiceOrders { .. })
    }
}

impl From<std::io::Error> for BackofficeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackofficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for BackofficeError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for back-office operations
pub type BackofficeResult<T> = Result<T, BackofficeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackofficeError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BackofficeError::client_not_found("cli-7");
        assert_eq!(err.to_string(), "Client not found: cli-7");
        assert!(err.is_not_found());
        assert!(!err.is_integrity());
    }

    #[test]
    fn test_linked_orders_error() {
        let err = BackofficeError::LinkedServiceOrders {
            client: "Oficina Silva".into(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Client 'Oficina Silva' cannot be deleted: 2 linked service order(s) exist"
        );
        assert!(err.is_integrity());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackofficeError = io_err.into();
        assert!(matches!(err, BackofficeError::Io(_)));
    }
}
