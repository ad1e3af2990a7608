//! tfplug core wire layer
//!
//! This crate provides the untyped-but-type-annotated value tree that the
//! protocol layer exchanges with a provider:
//!
//! - **Wire types**: the recursive type descriptor (`wire::WireType`)
//! - **Wire values**: tri-state values carrying an optional wire type (`wire::WireValue`)
//! - **Path steps**: the wire-level attribute path steps (`wire::AttributePathStep`)
//! - **JSON codec**: decoding and encoding wire values as JSON
//!
//! The typed collection layer lives in `tfplug-types` and consumes this crate.

pub mod wire;

pub use wire::{AttributePathStep, WireKind, WirePayload, WireState, WireType, WireValue};

/// Result type for wire operations
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while building, decoding or encoding wire values
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum WireError {
    /// Payload is not of the requested kind
    #[error("can't decode {value} as {expected}")]
    NotDecodable { expected: WireKind, value: String },

    /// Payload kind differs from the declared type
    #[error("payload of kind {actual} does not match wire type {expected}")]
    PayloadMismatch { expected: WireType, actual: WireKind },

    /// Child value does not carry the declared element type
    #[error("element of type {actual} does not match element type {expected}")]
    ElementMismatch { expected: WireType, actual: String },

    /// Unknown values have no JSON form
    #[error("unknown values cannot be encoded as JSON")]
    UnknownNotEncodable,

    /// NaN and infinities have no JSON form
    #[error("number {value} cannot be represented in JSON")]
    InvalidNumber { value: f64 },

    /// Malformed JSON input
    #[error("JSON error: {message}")]
    Json { message: String },
}

impl From<serde_json::Error> for WireError {
    fn from(err: serde_json::Error) -> Self {
        WireError::Json {
            message: err.to_string(),
        }
    }
}

/// Version information for the tfplug-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
