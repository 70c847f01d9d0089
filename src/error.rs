//! Error types for xmltyped
//!
//! Conversion failures carry the converter's original message unchanged;
//! they abort the enclosing parse with no partial result. Namespace
//! detection never produces an error at all - a prefix that cannot be
//! resolved is simply absent.

use thiserror::Error;

/// Result type alias using the xmltyped Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xmltyped operations
#[derive(Error, Debug)]
pub enum Error {
    /// A registered converter rejected its input text
    #[error("conversion error: {0}")]
    Conversion(String),

    /// XML tokenizer failure while building the tree
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Create a conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }

    /// Create an XML error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }
}
