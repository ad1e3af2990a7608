//! Map type and value
//!
//! A collection keyed by strings whose values all share one element type.
//! Entry order is kept for display and iteration but ignored by equality.

use crate::attr::{write_members, AttrType, AttrValue, ValidateType};
use crate::config::{ConversionConfig, Walk};
use crate::diag::{Diagnostic, Diagnostics};
use crate::path::Path;
use crate::state::{determine, determine_for_validation, Determinacy, State};
use crate::{Shape, TypeError, TypeResult};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tfplug_core::{AttributePathStep, WirePayload, WireType, WireValue};
use tracing::trace;

/// Type of a string-keyed map
#[derive(Debug, Clone, Default)]
pub struct MapType {
    elem_type: Option<Arc<AttrType>>,
}

impl MapType {
    /// Create a map type of the given element type
    pub fn new(element: AttrType) -> Self {
        MapType {
            elem_type: Some(Arc::new(element)),
        }
    }

    /// Declared element type
    pub fn element_type(&self) -> Option<&AttrType> {
        self.elem_type.as_deref()
    }

    /// Same map type with a different element type
    pub fn with_element_type(&self, element: AttrType) -> Self {
        MapType::new(element)
    }

    fn elem(&self) -> TypeResult<&Arc<AttrType>> {
        self.elem_type
            .as_ref()
            .ok_or(TypeError::MissingElementType { shape: Shape::Map })
    }

    /// Wire type: a map of the element's wire type
    pub fn terraform_type(&self) -> TypeResult<WireType> {
        Ok(WireType::map(self.elem()?.terraform_type()?))
    }

    /// Convert a wire value into a map value
    pub fn value_from_wire(&self, input: &WireValue) -> TypeResult<AttrValue> {
        self.value_from_wire_with(input, &ConversionConfig::default())
    }

    /// Convert a wire value into a map value under the given limits
    pub fn value_from_wire_with(
        &self,
        input: &WireValue,
        config: &ConversionConfig,
    ) -> TypeResult<AttrValue> {
        self.convert(input, Walk::new(config)).map(AttrValue::Map)
    }

    pub(crate) fn convert(&self, input: &WireValue, walk: Walk) -> TypeResult<MapValue> {
        let elem = self.elem()?;
        let expected = self.terraform_type()?;
        let determinacy = determine(input, &expected, || {
            format!("Map with ElementType {}", elem)
        })?;
        if let Some(state) = determinacy.empty_state() {
            return Ok(MapValue::with_state(Some(Arc::clone(elem)), state));
        }

        let walk = walk.descend()?;
        let entries = input
            .as_map()?
            .iter()
            .map(|(key, child)| Ok((key.clone(), elem.convert(child, walk)?)))
            .collect::<TypeResult<IndexMap<_, _>>>()?;
        trace!(len = entries.len(), "converted map");
        Ok(MapValue::with_state(
            Some(Arc::clone(elem)),
            State::Known(entries),
        ))
    }

    /// Whether `other` is a map type with an equal element type
    pub fn equal(&self, other: &MapType) -> bool {
        match (&self.elem_type, &other.elem_type) {
            (Some(a), Some(b)) => a.equal(b),
            _ => false,
        }
    }

    /// Element type for a string key step; any other step is rejected.
    ///
    /// Key presence is not checked here.
    pub fn apply_path_step(&self, step: &AttributePathStep) -> TypeResult<AttrType> {
        match step {
            AttributePathStep::ElementKeyString(_) => Ok(self.elem()?.as_ref().clone()),
            _ => Err(TypeError::InvalidPathStep {
                step: step.kind_name(),
                ty: self.to_string(),
            }),
        }
    }

    /// Validate every fully-known entry with the element type's validator
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
    pub fn value_type(&self) -> MapValue {
        MapValue::with_state(self.elem_type.clone(), State::Null)
    }

    /// Hook for wrapping map values into provider-facing values
    pub fn value_from_map(&self, map: MapValue) -> Result<AttrValue, Diagnostics> {
        Ok(AttrValue::Map(map))
    }
}

impl ValidateType for MapType {
    fn validate_wire(&self, input: &WireValue, path: &Path, walk: Walk) -> Diagnostics {
        let mut diags = Diagnostics::new();

        match determine_for_validation(input, Shape::Map, path) {
            Ok(Determinacy::Decodable) => {}
            Ok(_) => return diags,
            Err(diag) => {
                diags.add(diag);
                return diags;
            }
        }

        let entries = match input.as_map() {
            Ok(entries) => entries,
            Err(err) => {
                diags.add(Diagnostic::provider_bug(path, Shape::Map, err));
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

        // BTreeMap iteration keeps the diagnostic order stable across runs.
        for (key, elem) in entries {
            if !elem.is_fully_known() {
                trace!(%key, "skipping map entry that is not fully known");
                continue;
            }
            diags.append(validator.validate_wire(elem, &path.at_map_key(key.as_str()), walk));
        }

        diags
    }
}

impl PartialEq for MapType {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.elem_type {
            Some(elem) => write!(f, "MapType[{}]", elem),
            None => write!(f, "MapType[missing]"),
        }
    }
}

/// Value of a [`MapType`]
#[derive(Debug, Clone)]
pub struct MapValue {
    element_type: Option<Arc<AttrType>>,
    state: State<IndexMap<String, AttrValue>>,
}

impl MapValue {
    /// Create a known map, checking every entry against the element type
    pub fn new<K, I>(element_type: AttrType, entries: I) -> TypeResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AttrValue)>,
    {
        let mut checked = IndexMap::new();
        for (key, elem) in entries {
            let key = key.into();
            let actual = elem.attr_type();
            if !actual.equal(&element_type) {
                return Err(TypeError::ElementTypeMismatch {
                    shape: Shape::Map,
                    position: format!("{:?}", key),
                    expected: element_type.to_string(),
                    actual: actual.to_string(),
                });
            }
            if let Some(previous) = checked.insert(key, elem) {
                trace!(%previous, "map entry replaced by later entry with the same key");
            }
        }
        Ok(MapValue::with_state(
            Some(Arc::new(element_type)),
            State::Known(checked),
        ))
    }

    /// Create a null map
    pub fn null(element_type: AttrType) -> Self {
        MapValue::with_state(Some(Arc::new(element_type)), State::Null)
    }

    /// Create an unknown map
    pub fn unknown(element_type: AttrType) -> Self {
        MapValue::with_state(Some(Arc::new(element_type)), State::Unknown)
    }

    pub(crate) fn with_state(
        element_type: Option<Arc<AttrType>>,
        state: State<IndexMap<String, AttrValue>>,
    ) -> Self {
        MapValue {
            element_type,
            state,
        }
    }

    /// Declared element type
    pub fn element_type(&self) -> Option<&AttrType> {
        self.element_type.as_deref()
    }

    /// Tri-state content
    pub fn state(&self) -> &State<IndexMap<String, AttrValue>> {
        &self.state
    }

    /// Whether the map is null
    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    /// Whether the map is unknown
    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }

    /// Entries, if known
    pub fn elements(&self) -> Option<&IndexMap<String, AttrValue>> {
        self.state.known()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.elements()?.get(key)
    }

    /// Entries in insertion order; empty unless known
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.elements()
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Keys in insertion order; empty unless known
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    /// Number of entries; zero unless known
    pub fn len(&self) -> usize {
        self.elements().map_or(0, IndexMap::len)
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type of this value
    pub fn attr_type(&self) -> MapType {
        MapType {
            elem_type: self.element_type.clone(),
        }
    }

    /// Encode back into a wire value
    pub fn to_wire(&self) -> TypeResult<WireValue> {
        let ty = self.attr_type().terraform_type()?;
        Ok(match &self.state {
            State::Null => WireValue::null(ty),
            State::Unknown => WireValue::unknown(ty),
            State::Known(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.to_wire()?)))
                    .collect::<TypeResult<BTreeMap<_, _>>>()?;
                WireValue::new(ty, WirePayload::Map(entries))
            }
        })
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        let types_equal = match (&self.element_type, &other.element_type) {
            (Some(a), Some(b)) => a.equal(b),
            _ => false,
        };
        // IndexMap equality ignores insertion order.
        types_equal && self.state == other.state
    }
}

impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Known(entries) => {
                write!(f, "{{")?;
                write_members(
                    f,
                    entries.iter().map(|(k, v)| format!("{:?}: {}", k, v)),
                )?;
                write!(f, "}}")
            }
            State::Null => write!(f, "<null>"),
            State::Unknown => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_map() -> MapType {
        MapType::new(AttrType::Number)
    }

    #[test]
    fn test_convert_by_key() {
        let input = WireValue::map(
            WireType::Number,
            [("b", WireValue::number(2.0)), ("a", WireValue::number(1.0))],
        );
        let value = number_map().value_from_wire(&input).unwrap();
        let map = value.as_map().unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&AttrValue::number(1.0)));
        assert_eq!(map.get("b"), Some(&AttrValue::number(2.0)));
        assert_eq!(map.get("c"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.to_wire().unwrap(), input);
    }

    #[test]
    fn test_convert_determinacy() {
        let ty = WireType::map(WireType::Number);
        assert!(number_map()
            .value_from_wire(&WireValue::unknown(ty.clone()))
            .unwrap()
            .is_unknown());
        assert!(number_map()
            .value_from_wire(&WireValue::null(ty))
            .unwrap()
            .is_null());
        assert!(number_map()
            .value_from_wire(&WireValue::untyped())
            .unwrap()
            .is_null());
    }

    #[test]
    fn test_convert_mismatch() {
        let input = WireValue::list(WireType::Number, vec![]);
        let err = number_map().value_from_wire(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "can't use List[Number]<> as value of Map with ElementType NumberType, \
             can only use Map[Number] values"
        );
    }

    #[test]
    fn test_value_equality_ignores_order() {
        let ab = MapValue::new(
            AttrType::Number,
            [("a", AttrValue::number(1.0)), ("b", AttrValue::number(2.0))],
        )
        .unwrap();
        let ba = MapValue::new(
            AttrType::Number,
            [("b", AttrValue::number(2.0)), ("a", AttrValue::number(1.0))],
        )
        .unwrap();
        assert_eq!(ab, ba);

        let other = MapValue::new(AttrType::Number, [("a", AttrValue::number(1.0))]).unwrap();
        assert_ne!(ab, other);
    }

    #[test]
    fn test_new_checks_element_types() {
        let err = MapValue::new(AttrType::Number, [("x", AttrValue::string("1"))]).unwrap_err();
        assert!(matches!(
            err,
            TypeError::ElementTypeMismatch { shape: Shape::Map, ref position, .. } if position == "\"x\""
        ));
    }

    #[test]
    fn test_path_step() {
        let ty = number_map();
        assert_eq!(
            ty.apply_path_step(&AttributePathStep::ElementKeyString("anything".into()))
                .unwrap(),
            AttrType::Number
        );
        assert!(ty
            .apply_path_step(&AttributePathStep::ElementKeyInt(0))
            .is_err());
        assert!(ty
            .apply_path_step(&AttributePathStep::AttributeName("a".into()))
            .is_err());
    }

    #[test]
    fn test_equality() {
        assert_eq!(number_map(), MapType::new(AttrType::Number));
        assert_ne!(number_map(), MapType::new(AttrType::String));
        assert_ne!(MapType::default(), MapType::default());
        assert!(!AttrType::map(AttrType::Number).equal(&AttrType::list(AttrType::Number)));
    }

    #[test]
    fn test_display() {
        assert_eq!(number_map().to_string(), "MapType[NumberType]");
        let value = MapValue::new(AttrType::String, [("k", AttrValue::string("v"))]).unwrap();
        assert_eq!(value.to_string(), r#"{"k": "v"}"#);
        assert_eq!(MapValue::unknown(AttrType::String).to_string(), "<unknown>");
    }
}
