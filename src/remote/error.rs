//! Error types for the remote core

use thiserror::Error;

/// Reasons an inbound remote message could not be turned into an action.
///
/// Decode errors never stop the controller: the message is logged and dropped
/// and the current selection stays untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload is not a JSON object
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// A field the active encoding relies on is absent
    #[error("Missing field `{0}`")]
    MissingField(&'static str),

    /// A field is present but has an unusable value
    #[error("Invalid value for `{field}`: {value}")]
    InvalidField { field: &'static str, value: String },

    /// Host encoding message arrived before any level name list was seen
    #[error("Level name table has not been built yet")]
    TableNotBuilt,

    /// Host encoding level with no entry in the level name table
    #[error("No level name for level {0}")]
    UnknownLevel(i64),
}

/// Failures reported by the transport for a single outgoing operation.
///
/// Each message in a fan-out batch is independent; one failure does not abort
/// or roll back the others.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to publish to {topic}: {reason}")]
    Publish { topic: String, reason: String },

    #[error("Failed to subscribe to {topic}: {reason}")]
    Subscribe { topic: String, reason: String },
}
