//! List type and value
//!
//! An ordered, index-addressed collection whose elements all share one
//! element type.

use crate::attr::{write_members, AttrType, AttrValue, ValidateType};
use crate::config::{ConversionConfig, Walk};
use crate::diag::{Diagnostic, Diagnostics};
use crate::path::Path;
use crate::state::{determine, determine_for_validation, Determinacy, State};
use crate::{Shape, TypeError, TypeResult};
use std::fmt;
use std::sync::Arc;
use tfplug_core::{AttributePathStep, WirePayload, WireType, WireValue};
use tracing::trace;

/// Type of an ordered list.
///
/// `ListType::default()` has no element type. Such a type is a configuration
/// bug: it equals nothing, itself included, and cannot convert values.
#[derive(Debug, Clone, Default)]
pub struct ListType {
    elem_type: Option<Arc<AttrType>>,
}

impl ListType {
    /// Create a list type of the given element type
    pub fn new(element: AttrType) -> Self {
        ListType {
            elem_type: Some(Arc::new(element)),
        }
    }

    /// Declared element type
    pub fn element_type(&self) -> Option<&AttrType> {
        self.elem_type.as_deref()
    }

    /// Same list type with a different element type
    pub fn with_element_type(&self, element: AttrType) -> Self {
        ListType::new(element)
    }

    fn elem(&self) -> TypeResult<&Arc<AttrType>> {
        self.elem_type
            .as_ref()
            .ok_or(TypeError::MissingElementType { shape: Shape::List })
    }

    /// Wire type: a list of the element's wire type
    pub fn terraform_type(&self) -> TypeResult<WireType> {
        Ok(WireType::list(self.elem()?.terraform_type()?))
    }

    /// Convert a wire value into a list value
    pub fn value_from_wire(&self, input: &WireValue) -> TypeResult<AttrValue> {
        self.value_from_wire_with(input, &ConversionConfig::default())
    }

    /// Convert a wire value into a list value under the given limits
    pub fn value_from_wire_with(
        &self,
        input: &WireValue,
        config: &ConversionConfig,
    ) -> TypeResult<AttrValue> {
        self.convert(input, Walk::new(config)).map(AttrValue::List)
    }

    pub(crate) fn convert(&self, input: &WireValue, walk: Walk) -> TypeResult<ListValue> {
        let elem = self.elem()?;
        let expected = self.terraform_type()?;
        let determinacy = determine(input, &expected, || {
            format!("List with ElementType {}", elem)
        })?;
        if let Some(state) = determinacy.empty_state() {
            return Ok(ListValue::with_state(Some(Arc::clone(elem)), state));
        }

        let walk = walk.descend()?;
        let elements = input
            .as_list()?
            .iter()
            .map(|child| elem.convert(child, walk))
            .collect::<TypeResult<Vec<_>>>()?;
        trace!(len = elements.len(), "converted list");
        Ok(ListValue::with_state(
            Some(Arc::clone(elem)),
            State::Known(elements),
        ))
    }

    /// Whether `other` is a list type with an equal element type
    pub fn equal(&self, other: &ListType) -> bool {
        match (&self.elem_type, &other.elem_type) {
            (Some(a), Some(b)) => a.equal(b),
            _ => false,
        }
    }

    /// Element type for an index step; any other step is rejected.
    ///
    /// Bounds are not checked here.
    pub fn apply_path_step(&self, step: &AttributePathStep) -> TypeResult<AttrType> {
        match step {
            AttributePathStep::ElementKeyInt(_) => Ok(self.elem()?.as_ref().clone()),
            _ => Err(TypeError::InvalidPathStep {
                step: step.kind_name(),
                ty: self.to_string(),
            }),
        }
    }

    /// Validate every fully-known element with the element type's validator
    pub fn validate(&self, input: &WireValue, path: &Path) -> Diagnostics {
        self.validate_with(input, path, &ConversionConfig::default())
    }

    /// Validate under the given limits
    pub fn validate_with(
        &self,
        input: &WireValue,
        path: &Path,
        config: &ConversionConfig,
    ) -> Diagnostics {
        self.validate_wire(input, path, Walk::new(config))
    }

    /// Placeholder value carrying only the element type
    pub fn value_type(&self) -> ListValue {
        ListValue::with_state(self.elem_type.clone(), State::Null)
    }

    /// Hook for wrapping list values into provider-facing values
    pub fn value_from_list(&self, list: ListValue) -> Result<AttrValue, Diagnostics> {
        Ok(AttrValue::List(list))
    }
}

impl ValidateType for ListType {
    fn validate_wire(&self, input: &WireValue, path: &Path, walk: Walk) -> Diagnostics {
        let mut diags = Diagnostics::new();

        match determine_for_validation(input, Shape::List, path) {
            Ok(Determinacy::Decodable) => {}
            Ok(_) => return diags,
            Err(diag) => {
                diags.add(diag);
                return diags;
            }
        }

        let elems = match input.as_list() {
            Ok(elems) => elems,
            Err(err) => {
                diags.add(Diagnostic::provider_bug(path, Shape::List, err));
                return diags;
            }
        };

        let Some(validator) = self.element_type().and_then(AttrType::validator) else {
            return diags;
        };

        let walk = match walk.descend() {
            Ok(walk) => walk,
            Err(err) => {
                diags.add(Diagnostic::nesting_too_deep(path, err));
                return diags;
            }
        };

        for (index, elem) in elems.iter().enumerate() {
            if !elem.is_fully_known() {
                trace!(index, "skipping list element that is not fully known");
                continue;
            }
            diags.append(validator.validate_wire(elem, &path.at_list_index(index), walk));
        }

        diags
    }
}

impl PartialEq for ListType {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.elem_type {
            Some(elem) => write!(f, "ListType[{}]", elem),
            None => write!(f, "ListType[missing]"),
        }
    }
}

/// Value of a [`ListType`]
#[derive(Debug, Clone)]
pub struct ListValue {
    element_type: Option<Arc<AttrType>>,
    state: State<Vec<AttrValue>>,
}

impl ListValue {
    /// Create a known list, checking every element against the element type
    pub fn new(element_type: AttrType, elements: Vec<AttrValue>) -> TypeResult<Self> {
        for (index, elem) in elements.iter().enumerate() {
            let actual = elem.attr_type();
            if !actual.equal(&element_type) {
                return Err(TypeError::ElementTypeMismatch {
                    shape: Shape::List,
                    position: index.to_string(),
                    expected: element_type.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(ListValue::with_state(
            Some(Arc::new(element_type)),
            State::Known(elements),
        ))
    }

    /// Create a null list
    pub fn null(element_type: AttrType) -> Self {
        ListValue::with_state(Some(Arc::new(element_type)), State::Null)
    }

    /// Create an unknown list
    pub fn unknown(element_type: AttrType) -> Self {
        ListValue::with_state(Some(Arc::new(element_type)), State::Unknown)
    }

    pub(crate) fn with_state(
        element_type: Option<Arc<AttrType>>,
        state: State<Vec<AttrValue>>,
    ) -> Self {
        ListValue {
            element_type,
            state,
        }
    }

    /// Declared element type
    pub fn element_type(&self) -> Option<&AttrType> {
        self.element_type.as_deref()
    }

    /// Tri-state content
    pub fn state(&self) -> &State<Vec<AttrValue>> {
        &self.state
    }

    /// Whether the list is null
    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    /// Whether the list is unknown
    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }

    /// Elements in order; empty unless known
    pub fn elements(&self) -> &[AttrValue] {
        self.state.known().map_or(&[], Vec::as_slice)
    }

    /// Number of elements; zero unless known
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    /// Type of this value
    pub fn attr_type(&self) -> ListType {
        ListType {
            elem_type: self.element_type.clone(),
        }
    }

    /// Encode back into a wire value, preserving order
    pub fn to_wire(&self) -> TypeResult<WireValue> {
        let ty = self.attr_type().terraform_type()?;
        Ok(match &self.state {
            State::Null => WireValue::null(ty),
            State::Unknown => WireValue::unknown(ty),
            State::Known(elements) => {
                let items = elements
                    .iter()
                    .map(AttrValue::to_wire)
                    .collect::<TypeResult<Vec<_>>>()?;
                WireValue::new(ty, WirePayload::List(items))
            }
        })
    }
}

impl PartialEq for ListValue {
    fn eq(&self, other: &Self) -> bool {
        let types_equal = match (&self.element_type, &other.element_type) {
            (Some(a), Some(b)) => a.equal(b),
            _ => false,
        };
        types_equal && self.state == other.state
    }
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Known(elements) => {
                write!(f, "[")?;
                write_members(f, elements)?;
                write!(f, "]")
            }
            State::Null => write!(f, "<null>"),
            State::Unknown => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<WireValue> {
        items.iter().map(|s| WireValue::string(*s)).collect()
    }

    fn string_list() -> ListType {
        ListType::new(AttrType::String)
    }

    #[test]
    fn test_terraform_type() {
        assert_eq!(
            string_list().terraform_type().unwrap(),
            WireType::list(WireType::String)
        );
        assert_eq!(
            ListType::default().terraform_type(),
            Err(TypeError::MissingElementType { shape: Shape::List })
        );
    }

    #[test]
    fn test_convert_preserves_order() {
        let input = WireValue::list(WireType::String, strings(&["a", "b", "c"]));
        let value = string_list().value_from_wire(&input).unwrap();
        let list = value.as_list().unwrap();

        assert_eq!(
            list.elements(),
            &[
                AttrValue::string("a"),
                AttrValue::string("b"),
                AttrValue::string("c")
            ]
        );
        assert_eq!(list.to_wire().unwrap(), input);
    }

    #[test]
    fn test_convert_determinacy() {
        let ty = WireType::list(WireType::String);

        let unknown = string_list().value_from_wire(&WireValue::unknown(ty.clone())).unwrap();
        assert!(unknown.is_unknown());

        let null = string_list().value_from_wire(&WireValue::null(ty)).unwrap();
        assert!(null.is_null());

        let absent = string_list().value_from_wire(&WireValue::untyped()).unwrap();
        assert_eq!(absent, AttrValue::List(ListValue::null(AttrType::String)));
    }

    #[test]
    fn test_convert_rejects_other_element_type() {
        let input = WireValue::list(WireType::Number, vec![WireValue::number(1.0)]);
        let err = string_list().value_from_wire(&input).unwrap_err();
        assert!(matches!(err, TypeError::TypeMismatch { .. }));
        assert!(err.to_string().contains("can only use List[String] values"));
    }

    #[test]
    fn test_convert_aborts_on_element_error() {
        // Outer type matches, but the payload smuggles in a number.
        let input = WireValue::new(
            WireType::list(WireType::String),
            WirePayload::List(vec![WireValue::string("a"), WireValue::number(2.0)]),
        );
        let err = string_list().value_from_wire(&input).unwrap_err();
        assert!(matches!(err, TypeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_equality() {
        assert_eq!(string_list(), ListType::new(AttrType::String));
        assert_ne!(string_list(), ListType::new(AttrType::Number));
        assert_ne!(ListType::default(), ListType::default());
        assert_ne!(ListType::default(), string_list());
    }

    #[test]
    fn test_value_equality_is_ordered() {
        let ab = ListValue::new(
            AttrType::String,
            vec![AttrValue::string("a"), AttrValue::string("b")],
        )
        .unwrap();
        let ba = ListValue::new(
            AttrType::String,
            vec![AttrValue::string("b"), AttrValue::string("a")],
        )
        .unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
        assert_ne!(ListValue::null(AttrType::String), ListValue::unknown(AttrType::String));
    }

    #[test]
    fn test_new_checks_element_types() {
        let err = ListValue::new(
            AttrType::String,
            vec![AttrValue::string("a"), AttrValue::number(1.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TypeError::ElementTypeMismatch {
                shape: Shape::List,
                position: "1".to_string(),
                expected: "StringType".to_string(),
                actual: "NumberType".to_string(),
            }
        );
    }

    #[test]
    fn test_path_step() {
        let ty = string_list();
        assert_eq!(
            ty.apply_path_step(&AttributePathStep::ElementKeyInt(1_000)).unwrap(),
            AttrType::String
        );
        assert!(matches!(
            ty.apply_path_step(&AttributePathStep::ElementKeyString("x".into())),
            Err(TypeError::InvalidPathStep { step: "ElementKeyString", .. })
        ));
    }

    #[test]
    fn test_with_element_type() {
        let numbers = string_list().with_element_type(AttrType::Number);
        assert_eq!(numbers.element_type(), Some(&AttrType::Number));
        assert_eq!(string_list().element_type(), Some(&AttrType::String));
    }

    #[test]
    fn test_validate_kind_mismatch() {
        let input = WireValue::map(WireType::String, [("a", WireValue::string("x"))]);
        let diags = string_list().validate(&input, &Path::root("tags"));
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().summary(),
            "List Type Validation Error"
        );
    }

    #[test]
    fn test_validate_malformed_payload() {
        let input = WireValue::new(WireType::list(WireType::String), WirePayload::Bool(true));
        let diags = string_list().validate(&input, &Path::root("tags"));
        assert_eq!(diags.len(), 1);
        assert!(diags.has_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(string_list().to_string(), "ListType[StringType]");
        assert_eq!(ListType::default().to_string(), "ListType[missing]");

        let value = ListValue::new(AttrType::Number, vec![AttrValue::number(1.0)]).unwrap();
        assert_eq!(value.to_string(), "[1]");
    }
}
