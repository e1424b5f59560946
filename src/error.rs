//! Error types
//!
//! Every failure is surfaced to the caller immediately; nothing here is
//! retried or recovered locally.
//!
//! # Error Categories
//!
//! - [`Error::DoesNotExist`]: a read whose request did not succeed
//! - [`ValidationError`]: malformed payloads, bad field values and
//!   rejected create/update requests
//! - Misuse variants: local contract violations that never touch the network

use crate::resource::fields::FieldType;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error for every client, entity and manager operation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote service did not return a success status for a read
    #[error("resource does not exist: {path} (HTTP {status})")]
    DoesNotExist { path: String, status: u16 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Only persisted entities can be assigned to a relation
    #[error("you can assign only saved {target} instances")]
    UnsavedRelation { target: &'static str },

    #[error("{field} is read-only: list it with all()/list() and add to it with create()")]
    ReadOnlyRelation { field: &'static str },

    #[error("cannot delete a {entity} without resource_uri assigned")]
    MissingLocator { entity: &'static str },

    #[error("{entity} has no collection uri and cannot be created directly")]
    NoCollection { entity: &'static str },

    #[error("{entity}.{field} is not set, relation cannot be resolved")]
    MissingRelationUri {
        entity: &'static str,
        field: &'static str,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot sign request: {0}")]
    Signing(String),
}

/// Payload and request validation failures
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("incorrect data type for {entity}, expected object, received: {found}")]
    NotAnObject {
        entity: &'static str,
        found: &'static str,
    },

    #[error("incorrect type for {entity}: {field} ({source})")]
    InvalidField {
        entity: &'static str,
        field: String,
        #[source]
        source: CoercionError,
    },

    #[error("{entity} has no field named {field}")]
    UnknownField { entity: &'static str, field: String },

    /// Create or update refused by the remote service
    #[error("request to {path} was rejected with HTTP {status}: {body}")]
    Rejected {
        path: String,
        status: u16,
        body: String,
    },

    #[error("listing at {path} is not an array, received: {found}")]
    UnexpectedListing { path: String, found: &'static str },
}

/// Why a raw JSON value could not be turned into a declared field type
#[derive(Debug, thiserror::Error)]
pub enum CoercionError {
    #[error("expected {expected}, received {found}")]
    UnexpectedType {
        expected: FieldType,
        found: &'static str,
    },

    #[error("{value:?} does not match format {format:?}: {source}")]
    Format {
        value: String,
        format: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<CoercionError>,
    },
}

/// Human-readable JSON type name for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
