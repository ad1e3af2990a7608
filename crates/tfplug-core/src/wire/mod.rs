//! Wire representation
//!
//! A wire value is a tree whose nodes carry an optional [`WireType`] and a
//! determinacy state: not yet known, null, or a concrete payload. The typed
//! layer maps these onto its own Known / Null / Unknown model.

mod json;
mod step;
mod types;
mod value;

pub use step::AttributePathStep;
pub use types::{WireKind, WireType};
pub use value::{WirePayload, WireState, WireValue};
