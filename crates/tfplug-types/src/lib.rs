//! Collection attribute types for tfplug providers
//!
//! This crate provides the typed layer on top of the wire representation in
//! `tfplug-core`:
//!
//! - **Types**: the closed element-type family [`AttrType`] with the
//!   collection shapes [`ListType`], [`MapType`] and [`SetType`]
//! - **Values**: tri-state ([`State`]) typed values mirroring each type
//! - **Paths**: attribute paths addressing members for diagnostics
//! - **Diagnostics**: accumulated, path-addressed validation results
//!
//! Conversion errors are returned as [`TypeError`]; validation problems are
//! accumulated as [`Diagnostics`].

pub mod attr;
pub mod config;
pub mod diag;
pub mod list;
pub mod map;
pub mod path;
mod scalar;
pub mod set;
pub mod state;

pub use attr::{AttrType, AttrValue, CustomType, CustomValue, ValidateType};
pub use config::{ConversionConfig, Walk};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use list::{ListType, ListValue};
pub use map::{MapType, MapValue};
pub use path::{Path, PathStep};
pub use set::{SetType, SetValue};
pub use state::State;

pub use tfplug_core::{AttributePathStep, WireError, WireKind, WireType, WireValue};

use std::fmt;

/// Result type for conversions between wire and typed values
pub type TypeResult<T> = Result<T, TypeError>;

/// The three collection shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Ordered, index-addressed
    List,
    /// String-keyed
    Map,
    /// Unordered, value-addressed
    Set,
}

impl Shape {
    /// Wire kind a value of this shape must have
    pub fn wire_kind(self) -> WireKind {
        match self {
            Shape::List => WireKind::List,
            Shape::Map => WireKind::Map,
            Shape::Set => WireKind::Set,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::List => write!(f, "List"),
            Shape::Map => write!(f, "Map"),
            Shape::Set => write!(f, "Set"),
        }
    }
}

/// Errors returned by type conversion and type-level queries
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    /// Wire value's type differs from the receiving type's wire type
    #[error("can't use {value} as value of {target}, can only use {expected} values")]
    TypeMismatch {
        /// Offending wire value
        value: String,
        /// Receiving type
        target: String,
        /// Wire type the receiving type accepts
        expected: WireType,
    },

    /// Collection type constructed without an element type
    #[error("{shape}Type has no element type")]
    MissingElementType {
        /// Collection shape
        shape: Shape,
    },

    /// Path step not applicable to the type
    #[error("cannot apply step {step} to {ty}")]
    InvalidPathStep {
        /// Kind of step
        step: &'static str,
        /// Type the step was applied to
        ty: String,
    },

    /// Value built from elements of the wrong type
    #[error("{shape} element {position} has type {actual}, expected {expected}")]
    ElementTypeMismatch {
        /// Collection shape
        shape: Shape,
        /// Index or key of the element
        position: String,
        /// Declared element type
        expected: String,
        /// Element's own type
        actual: String,
    },

    /// Nesting deeper than [`ConversionConfig::max_depth`]
    #[error("value nesting exceeds the limit of {limit} levels")]
    DepthExceeded {
        /// Configured limit
        limit: usize,
    },

    /// Malformed wire payload
    #[error(transparent)]
    Wire(#[from] WireError),
}

#[cfg(test)]
mod tests;
