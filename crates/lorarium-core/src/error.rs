//! Error types for the Lorarium catalog core.
//!
//! Classification and search queries are infallible by design; the only
//! fallible surface is constructing a classifier from a host-supplied
//! marker rule table.

use thiserror::Error;

/// Main error type for the catalog core.
#[derive(Debug, Error)]
pub enum CatalogError {
    // Rule table errors
    #[error("Invalid marker rule: {message}")]
    InvalidRule { message: String },
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::InvalidRule {
            message: "empty token".into(),
        };
        assert_eq!(err.to_string(), "Invalid marker rule: empty token");
    }
}
