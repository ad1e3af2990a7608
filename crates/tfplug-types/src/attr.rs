//! The element-type family and its values
//!
//! [`AttrType`] is a closed set of shapes. Collections are parameterized by
//! another `AttrType`, which allows arbitrary nesting. [`CustomType`] is the
//! extension point for provider-defined types that wrap a base type and may
//! add their own validation.

use crate::config::{ConversionConfig, Walk};
use crate::diag::Diagnostics;
use crate::list::{ListType, ListValue};
use crate::map::{MapType, MapValue};
use crate::path::Path;
use crate::scalar;
use crate::set::{SetType, SetValue};
use crate::state::State;
use crate::{TypeError, TypeResult};
use std::fmt;
use std::sync::Arc;
use tfplug_core::{AttributePathStep, WireType, WireValue};

/// Optional validation capability of a type.
///
/// Collection types always provide it; scalar types never do; custom types
/// decide through [`CustomType::validator`].
pub trait ValidateType {
    /// Validate a fully-known wire value addressed at `path`
    fn validate_wire(&self, input: &WireValue, path: &Path, walk: Walk) -> Diagnostics;
}

/// A provider-defined type wrapping a base type
pub trait CustomType: fmt::Debug + Send + Sync {
    /// Name shown in type descriptions, e.g. `HostnameType`
    fn name(&self) -> &str;

    /// Type that wire conversion delegates to
    fn base_type(&self) -> &AttrType;

    /// Extra validation, if the type has any
    fn validator(&self) -> Option<&dyn ValidateType> {
        None
    }
}

fn custom_equal(a: &dyn CustomType, b: &dyn CustomType) -> bool {
    a.name() == b.name() && a.base_type().equal(b.base_type())
}

/// Any type participating in attribute conversion
#[derive(Debug, Clone)]
pub enum AttrType {
    /// String scalar
    String,
    /// Number scalar
    Number,
    /// Bool scalar
    Bool,
    /// Ordered collection
    List(ListType),
    /// String-keyed collection
    Map(MapType),
    /// Unordered collection
    Set(SetType),
    /// Provider-defined wrapper
    Custom(Arc<dyn CustomType>),
}

impl AttrType {
    /// List of the given element type
    pub fn list(element: AttrType) -> Self {
        AttrType::List(ListType::new(element))
    }

    /// Map of the given element type
    pub fn map(element: AttrType) -> Self {
        AttrType::Map(MapType::new(element))
    }

    /// Set of the given element type
    pub fn set(element: AttrType) -> Self {
        AttrType::Set(SetType::new(element))
    }

    /// Wrap a provider-defined type
    pub fn custom(custom: impl CustomType + 'static) -> Self {
        AttrType::Custom(Arc::new(custom))
    }

    /// Wire type values of this type are exchanged as
    pub fn terraform_type(&self) -> TypeResult<WireType> {
        match self {
            AttrType::String => Ok(WireType::String),
            AttrType::Number => Ok(WireType::Number),
            AttrType::Bool => Ok(WireType::Bool),
            AttrType::List(list) => list.terraform_type(),
            AttrType::Map(map) => map.terraform_type(),
            AttrType::Set(set) => set.terraform_type(),
            AttrType::Custom(custom) => custom.base_type().terraform_type(),
        }
    }

    /// Convert a wire value into a typed value
    pub fn value_from_wire(&self, input: &WireValue) -> TypeResult<AttrValue> {
        self.value_from_wire_with(input, &ConversionConfig::default())
    }

    /// Convert a wire value into a typed value under the given limits
    pub fn value_from_wire_with(
        &self,
        input: &WireValue,
        config: &ConversionConfig,
    ) -> TypeResult<AttrValue> {
        self.convert(input, Walk::new(config))
    }

    pub(crate) fn convert(&self, input: &WireValue, walk: Walk) -> TypeResult<AttrValue> {
        match self {
            AttrType::String => scalar::convert_string(input).map(AttrValue::String),
            AttrType::Number => scalar::convert_number(input).map(AttrValue::Number),
            AttrType::Bool => scalar::convert_bool(input).map(AttrValue::Bool),
            AttrType::List(list) => list.convert(input, walk).map(AttrValue::List),
            AttrType::Map(map) => map.convert(input, walk).map(AttrValue::Map),
            AttrType::Set(set) => set.convert(input, walk).map(AttrValue::Set),
            AttrType::Custom(custom) => {
                let inner = custom.base_type().convert(input, walk)?;
                Ok(AttrValue::Custom(CustomValue::new(Arc::clone(custom), inner)))
            }
        }
    }

    /// Structural type equality
    pub fn equal(&self, other: &AttrType) -> bool {
        match (self, other) {
            (AttrType::String, AttrType::String)
            | (AttrType::Number, AttrType::Number)
            | (AttrType::Bool, AttrType::Bool) => true,
            (AttrType::List(a), AttrType::List(b)) => a.equal(b),
            (AttrType::Map(a), AttrType::Map(b)) => a.equal(b),
            (AttrType::Set(a), AttrType::Set(b)) => a.equal(b),
            (AttrType::Custom(a), AttrType::Custom(b)) => custom_equal(a.as_ref(), b.as_ref()),
            _ => false,
        }
    }

    /// Type addressed by one further path step
    pub fn apply_path_step(&self, step: &AttributePathStep) -> TypeResult<AttrType> {
        match self {
            AttrType::List(list) => list.apply_path_step(step),
            AttrType::Map(map) => map.apply_path_step(step),
            AttrType::Set(set) => set.apply_path_step(step),
            AttrType::Custom(custom) => custom.base_type().apply_path_step(step),
            AttrType::String | AttrType::Number | AttrType::Bool => {
                Err(TypeError::InvalidPathStep {
                    step: step.kind_name(),
                    ty: self.to_string(),
                })
            }
        }
    }

    /// Validation capability, if this type has one
    pub fn validator(&self) -> Option<&dyn ValidateType> {
        match self {
            AttrType::List(list) => Some(list),
            AttrType::Map(map) => Some(map),
            AttrType::Set(set) => Some(set),
            AttrType::Custom(custom) => custom.validator(),
            AttrType::String | AttrType::Number | AttrType::Bool => None,
        }
    }

    /// Element type of a collection
    pub fn element_type(&self) -> Option<&AttrType> {
        match self {
            AttrType::List(list) => list.element_type(),
            AttrType::Map(map) => map.element_type(),
            AttrType::Set(set) => set.element_type(),
            AttrType::String | AttrType::Number | AttrType::Bool | AttrType::Custom(_) => None,
        }
    }

    /// Placeholder value carrying only type information
    pub fn value_type(&self) -> AttrValue {
        match self {
            AttrType::String => AttrValue::String(State::Null),
            AttrType::Number => AttrValue::Number(State::Null),
            AttrType::Bool => AttrValue::Bool(State::Null),
            AttrType::List(list) => AttrValue::List(list.value_type()),
            AttrType::Map(map) => AttrValue::Map(map.value_type()),
            AttrType::Set(set) => AttrValue::Set(set.value_type()),
            AttrType::Custom(custom) => AttrValue::Custom(CustomValue::new(
                Arc::clone(custom),
                custom.base_type().value_type(),
            )),
        }
    }
}

impl PartialEq for AttrType {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrType::String => write!(f, "StringType"),
            AttrType::Number => write!(f, "NumberType"),
            AttrType::Bool => write!(f, "BoolType"),
            AttrType::List(list) => write!(f, "{}", list),
            AttrType::Map(map) => write!(f, "{}", map),
            AttrType::Set(set) => write!(f, "{}", set),
            AttrType::Custom(custom) => write!(f, "{}", custom.name()),
        }
    }
}

impl From<ListType> for AttrType {
    fn from(list: ListType) -> Self {
        AttrType::List(list)
    }
}

impl From<MapType> for AttrType {
    fn from(map: MapType) -> Self {
        AttrType::Map(map)
    }
}

impl From<SetType> for AttrType {
    fn from(set: SetType) -> Self {
        AttrType::Set(set)
    }
}

/// Value produced by a [`CustomType`]
#[derive(Debug, Clone)]
pub struct CustomValue {
    ty: Arc<dyn CustomType>,
    inner: Box<AttrValue>,
}

impl CustomValue {
    /// Wrap a value of the custom type's base type
    pub fn new(ty: Arc<dyn CustomType>, inner: AttrValue) -> Self {
        CustomValue {
            ty,
            inner: Box::new(inner),
        }
    }

    /// The custom type
    pub fn custom_type(&self) -> &Arc<dyn CustomType> {
        &self.ty
    }

    /// The wrapped base value
    pub fn inner(&self) -> &AttrValue {
        &self.inner
    }

    /// Unwrap the base value
    pub fn into_inner(self) -> AttrValue {
        *self.inner
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        custom_equal(self.ty.as_ref(), other.ty.as_ref()) && self.inner == other.inner
    }
}

/// A typed value of any [`AttrType`]
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// String scalar
    String(State<String>),
    /// Number scalar
    Number(State<f64>),
    /// Bool scalar
    Bool(State<bool>),
    /// List
    List(ListValue),
    /// Map
    Map(MapValue),
    /// Set
    Set(SetValue),
    /// Custom wrapper
    Custom(CustomValue),
}

impl AttrValue {
    /// Known string
    pub fn string(s: impl Into<String>) -> Self {
        AttrValue::String(State::Known(s.into()))
    }

    /// Known number
    pub fn number(n: f64) -> Self {
        AttrValue::Number(State::Known(n))
    }

    /// Known bool
    pub fn bool(b: bool) -> Self {
        AttrValue::Bool(State::Known(b))
    }

    /// Type of this value
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrValue::String(_) => AttrType::String,
            AttrValue::Number(_) => AttrType::Number,
            AttrValue::Bool(_) => AttrType::Bool,
            AttrValue::List(list) => AttrType::List(list.attr_type()),
            AttrValue::Map(map) => AttrType::Map(map.attr_type()),
            AttrValue::Set(set) => AttrType::Set(set.attr_type()),
            AttrValue::Custom(custom) => AttrType::Custom(Arc::clone(&custom.ty)),
        }
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        match self {
            AttrValue::String(state) => state.is_null(),
            AttrValue::Number(state) => state.is_null(),
            AttrValue::Bool(state) => state.is_null(),
            AttrValue::List(list) => list.is_null(),
            AttrValue::Map(map) => map.is_null(),
            AttrValue::Set(set) => set.is_null(),
            AttrValue::Custom(custom) => custom.inner.is_null(),
        }
    }

    /// Whether the value is not yet determined
    pub fn is_unknown(&self) -> bool {
        match self {
            AttrValue::String(state) => state.is_unknown(),
            AttrValue::Number(state) => state.is_unknown(),
            AttrValue::Bool(state) => state.is_unknown(),
            AttrValue::List(list) => list.is_unknown(),
            AttrValue::Map(map) => map.is_unknown(),
            AttrValue::Set(set) => set.is_unknown(),
            AttrValue::Custom(custom) => custom.inner.is_unknown(),
        }
    }

    /// Encode back into a wire value
    pub fn to_wire(&self) -> TypeResult<WireValue> {
        match self {
            AttrValue::String(state) => Ok(scalar::string_to_wire(state)),
            AttrValue::Number(state) => Ok(scalar::number_to_wire(state)),
            AttrValue::Bool(state) => Ok(scalar::bool_to_wire(state)),
            AttrValue::List(list) => list.to_wire(),
            AttrValue::Map(map) => map.to_wire(),
            AttrValue::Set(set) => set.to_wire(),
            AttrValue::Custom(custom) => custom.inner.to_wire(),
        }
    }

    /// The list, if this is one
    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            AttrValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// The map, if this is one
    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            AttrValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The set, if this is one
    pub fn as_set(&self) -> Option<&SetValue> {
        match self {
            AttrValue::Set(set) => Some(set),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(State::Known(s)) => write!(f, "{:?}", s),
            AttrValue::String(state) => write!(f, "{}", state),
            AttrValue::Number(state) => write!(f, "{}", state),
            AttrValue::Bool(state) => write!(f, "{}", state),
            AttrValue::List(list) => write!(f, "{}", list),
            AttrValue::Map(map) => write!(f, "{}", map),
            AttrValue::Set(set) => write!(f, "{}", set),
            AttrValue::Custom(custom) => write!(f, "{}", custom.inner),
        }
    }
}

impl From<ListValue> for AttrValue {
    fn from(list: ListValue) -> Self {
        AttrValue::List(list)
    }
}

impl From<MapValue> for AttrValue {
    fn from(map: MapValue) -> Self {
        AttrValue::Map(map)
    }
}

impl From<SetValue> for AttrValue {
    fn from(set: SetValue) -> Self {
        AttrValue::Set(set)
    }
}

/// Write a known collection's members separated by commas
pub(crate) fn write_members<I, T>(f: &mut fmt::Formatter<'_>, members: I) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    for (i, member) in members.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", member)?;
    }
    Ok(())
}
