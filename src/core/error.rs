//! Grant matching error types

use thiserror::Error;

/// Errors raised at the edges of the matcher (stores, config, strict decoding)
///
/// The matching predicates themselves are total and never produce these.
#[derive(Error, Debug)]
pub enum GrantError {
    /// Locator could not be decoded under strict rules
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    /// Record store failed to read or write
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GrantError {
    /// Create an invalid locator error
    pub fn invalid_locator(msg: impl Into<String>) -> Self {
        GrantError::InvalidLocator(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        GrantError::Store(msg.into())
    }

    /// Create a configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        GrantError::InvalidConfig(msg.into())
    }
}

/// Result type alias for grant operations
pub type GrantResult<T> = Result<T, GrantError>;
