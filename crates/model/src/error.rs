//! Error types for the item model layer
//!
//! Every failure is reported to the caller at the point of misuse. Nothing in
//! this crate retries or silently coerces, since a swallowed error in fixture
//! code hides a broken test.

use thiserror::Error;

use crate::attribute::AttributeKind;

/// Result type alias for item model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for item model operations
#[derive(Debug, Error)]
pub enum ModelError {
    /// An operation was invoked on an item that was not fabricated in memory
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The item's context cannot host the requested binding
    #[error("Invalid context: {message}")]
    InvalidContext { message: String },

    /// The item type could not be constructed from a context
    #[error("Failed to instantiate item type '{item_type}': {source}")]
    Instantiation {
        item_type: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A locale code did not parse
    #[error("Invalid locale: '{value}'")]
    InvalidLocale { value: String },

    /// The item's context lacks the requested capability
    #[error("Unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    /// Plain/localized mismatch on attribute access
    #[error("Attribute '{key}' is {actual} but was accessed as {expected}")]
    InvalidAttributeKind {
        key: String,
        expected: AttributeKind,
        actual: AttributeKind,
    },

    /// Serialization/deserialization error on typed attribute access
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ModelError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ModelError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_context(message: impl Into<String>) -> Self {
        ModelError::InvalidContext {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        ModelError::UnsupportedOperation {
            message: message.into(),
        }
    }

    /// Wrap a construction failure for the given item type
    pub fn instantiation<E>(item_type: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ModelError::Instantiation {
            item_type: item_type.into(),
            source: source.into(),
        }
    }

    pub fn invalid_attribute_kind(
        key: impl Into<String>,
        expected: AttributeKind,
        actual: AttributeKind,
    ) -> Self {
        ModelError::InvalidAttributeKind {
            key: key.into(),
            expected,
            actual,
        }
    }
}
