//! Tri-state value model and its mapping from wire determinacy
//!
//! A typed value is exactly one of Known, Null or Unknown. A wire value has
//! four relevant conditions instead: no type at all, not yet known, null, or
//! decodable. [`determine`] and [`determine_for_validation`] are the only
//! places where the two are related; every shape goes through them.

use crate::diag::Diagnostic;
use crate::path::Path;
use crate::{Shape, TypeError, TypeResult};
use std::fmt;
use tfplug_core::{WireType, WireValue};
use tracing::{debug, trace};

/// A typed value's state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum State<T> {
    /// Explicitly absent
    #[default]
    Null,
    /// Not yet determined
    Unknown,
    /// Concrete content
    Known(T),
}

impl<T> State<T> {
    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, State::Null)
    }

    /// Whether the value is not yet determined
    pub fn is_unknown(&self) -> bool {
        matches!(self, State::Unknown)
    }

    /// Whether the value is known
    pub fn is_known(&self) -> bool {
        matches!(self, State::Known(_))
    }

    /// Known content, if any
    pub fn known(&self) -> Option<&T> {
        match self {
            State::Known(value) => Some(value),
            State::Null | State::Unknown => None,
        }
    }

    /// Transform the known content, keeping Null and Unknown
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> State<U> {
        match self {
            State::Null => State::Null,
            State::Unknown => State::Unknown,
            State::Known(value) => State::Known(f(value)),
        }
    }
}

impl<T: fmt::Display> fmt::Display for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Null => write!(f, "<null>"),
            State::Unknown => write!(f, "<unknown>"),
            State::Known(value) => write!(f, "{}", value),
        }
    }
}

/// How a wire value should be treated by conversion or validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Determinacy {
    /// The wire value carries no type
    Absent,
    /// Not yet known
    Unknown,
    /// Known to be null
    Null,
    /// Known and non-null; the payload may be decoded
    Decodable,
}

impl Determinacy {
    /// The typed state this maps to, when no decoding is needed
    pub(crate) fn empty_state<T>(self) -> Option<State<T>> {
        match self {
            Determinacy::Absent | Determinacy::Null => Some(State::Null),
            Determinacy::Unknown => Some(State::Unknown),
            Determinacy::Decodable => None,
        }
    }
}

/// Classify a wire value for conversion into a type expecting `expected`.
///
/// `target` describes the receiving type in the mismatch error.
pub(crate) fn determine(
    input: &WireValue,
    expected: &WireType,
    target: impl FnOnce() -> String,
) -> TypeResult<Determinacy> {
    let Some(actual) = input.wire_type() else {
        trace!(%expected, "wire value has no type, converting to null");
        return Ok(Determinacy::Absent);
    };
    if actual != expected {
        debug!(%expected, %actual, "wire type mismatch");
        return Err(TypeError::TypeMismatch {
            value: input.to_string(),
            target: target(),
            expected: expected.clone(),
        });
    }
    if !input.is_known() {
        trace!(%expected, "wire value not known, converting to unknown");
        return Ok(Determinacy::Unknown);
    }
    if input.is_null() {
        return Ok(Determinacy::Null);
    }
    Ok(Determinacy::Decodable)
}

/// Classify a wire value for validation as a collection of `shape`.
///
/// Only the structural kind is checked; a kind mismatch is a provider bug and
/// is reported as a diagnostic at `path`.
pub(crate) fn determine_for_validation(
    input: &WireValue,
    shape: Shape,
    path: &Path,
) -> Result<Determinacy, Diagnostic> {
    let Some(actual) = input.wire_type() else {
        return Ok(Determinacy::Absent);
    };
    if !actual.is(shape.wire_kind()) {
        return Err(Diagnostic::provider_bug(
            path,
            shape,
            format_args!("expected {shape} value, received {input}"),
        ));
    }
    if !input.is_known() {
        return Ok(Determinacy::Unknown);
    }
    if input.is_null() {
        return Ok(Determinacy::Null);
    }
    Ok(Determinacy::Decodable)
}
