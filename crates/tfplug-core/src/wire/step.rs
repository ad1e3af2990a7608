//! Wire-level attribute path steps

use super::WireValue;
use std::fmt;

/// One step of a wire attribute path
#[derive(Debug, Clone, PartialEq)]
pub enum AttributePathStep {
    /// Named attribute of an object or block
    AttributeName(String),
    /// String key of a map
    ElementKeyString(String),
    /// Position in a list
    ElementKeyInt(i64),
    /// Member of a set, addressed by its value
    ElementKeyValue(WireValue),
}

impl AttributePathStep {
    /// Short name of the step kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributePathStep::AttributeName(_) => "AttributeName",
            AttributePathStep::ElementKeyString(_) => "ElementKeyString",
            AttributePathStep::ElementKeyInt(_) => "ElementKeyInt",
            AttributePathStep::ElementKeyValue(_) => "ElementKeyValue",
        }
    }
}

impl fmt::Display for AttributePathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributePathStep::AttributeName(name) => write!(f, "AttributeName({:?})", name),
            AttributePathStep::ElementKeyString(key) => write!(f, "ElementKeyString({:?})", key),
            AttributePathStep::ElementKeyInt(index) => write!(f, "ElementKeyInt({})", index),
            AttributePathStep::ElementKeyValue(value) => write!(f, "ElementKeyValue({})", value),
        }
    }
}
