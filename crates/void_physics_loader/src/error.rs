//! Error types for document loading

use thiserror::Error;
use void_physics2d::PhysicsError;

/// Errors that abort a load
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A required attribute is absent
    #[error("missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// The element that should have the attribute
        element: String,
        /// The missing attribute name
        attribute: String,
    },

    /// A numeric attribute does not parse as its expected type
    #[error("malformed number in '{attribute}' on <{element}>: expected {expected}, got \"{value}\"")]
    MalformedNumber {
        /// The element containing the attribute
        element: String,
        /// The attribute with the bad value
        attribute: String,
        /// The raw text
        value: String,
        /// Expected type name
        expected: &'static str,
    },

    /// A boolean attribute is neither `true` nor `false`
    #[error("malformed flag in '{attribute}' on <{element}>: expected true or false, got \"{value}\"")]
    MalformedFlag {
        /// The element containing the attribute
        element: String,
        /// The attribute with the bad value
        attribute: String,
        /// The raw text
        value: String,
    },

    /// A filter value does not fit into 16 bits
    #[error(
        "too many bits in '{attribute}' on <{element}>: {value} does not fit into 16 bits; \
         you probably provided too many category or mask bits"
    )]
    FilterBitsOverflow {
        /// The element containing the attribute
        element: String,
        /// The filter attribute
        attribute: String,
        /// The parsed value
        value: i64,
    },

    /// An element appeared where it has nothing to attach to
    #[error("unexpected <{element}>: {reason}")]
    StructuralAnomaly {
        /// The offending element
        element: String,
        /// What was missing
        reason: &'static str,
    },

    /// The document is not well-formed XML
    #[error("XML error at byte {position}: {message}")]
    Xml {
        /// Byte offset in the document
        position: u64,
        /// Decoder message
        message: String,
    },

    /// The loader configuration cannot be used
    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),

    /// Reading the document failed
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Resolved asset path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The physics engine rejected a body or collider
    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),
}

impl LoaderError {
    /// Create a missing-attribute error
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// Create a structural error
    pub fn structural(element: &str, reason: &'static str) -> Self {
        Self::StructuralAnomaly {
            element: element.to_string(),
            reason,
        }
    }

    /// Whether this is the filter overflow failure
    pub fn is_bit_overflow(&self) -> bool {
        matches!(self, Self::FilterBitsOverflow { .. })
    }
}

/// Result type for loading
pub type Result<T> = std::result::Result<T, LoaderError>;
