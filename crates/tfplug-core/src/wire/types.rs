//! Wire type descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural kind of a wire type, ignoring any element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireKind {
    /// String primitive
    String,
    /// Number primitive
    Number,
    /// Bool primitive
    Bool,
    /// Ordered list
    List,
    /// String-keyed map
    Map,
    /// Unordered set
    Set,
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireKind::String => write!(f, "String"),
            WireKind::Number => write!(f, "Number"),
            WireKind::Bool => write!(f, "Bool"),
            WireKind::List => write!(f, "List"),
            WireKind::Map => write!(f, "Map"),
            WireKind::Set => write!(f, "Set"),
        }
    }
}

/// Recursive wire type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    /// String primitive
    String,
    /// Number primitive
    Number,
    /// Bool primitive
    Bool,
    /// Ordered list of the element type
    List(Box<WireType>),
    /// String-keyed map of the element type
    Map(Box<WireType>),
    /// Unordered set of the element type
    Set(Box<WireType>),
}

impl WireType {
    /// Create a list type
    pub fn list(element: WireType) -> Self {
        WireType::List(Box::new(element))
    }

    /// Create a map type
    pub fn map(element: WireType) -> Self {
        WireType::Map(Box::new(element))
    }

    /// Create a set type
    pub fn set(element: WireType) -> Self {
        WireType::Set(Box::new(element))
    }

    /// Structural kind of this type
    pub fn kind(&self) -> WireKind {
        match self {
            WireType::String => WireKind::String,
            WireType::Number => WireKind::Number,
            WireType::Bool => WireKind::Bool,
            WireType::List(_) => WireKind::List,
            WireType::Map(_) => WireKind::Map,
            WireType::Set(_) => WireKind::Set,
        }
    }

    /// Check the structural kind, ignoring the element type
    pub fn is(&self, kind: WireKind) -> bool {
        self.kind() == kind
    }

    /// Declared element type of a list, map or set
    pub fn element_type(&self) -> Option<&WireType> {
        match self {
            WireType::List(elem) | WireType::Map(elem) | WireType::Set(elem) => Some(elem),
            WireType::String | WireType::Number | WireType::Bool => None,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element_type() {
            Some(elem) => write!(f, "{}[{}]", self.kind(), elem),
            None => write!(f, "{}", self.kind()),
        }
    }
}
