//! Wire values

use super::{WireKind, WireType};
use crate::{WireError, WireResult};
use std::collections::BTreeMap;
use std::fmt;

/// Concrete content of a known wire value
#[derive(Debug, Clone)]
pub enum WirePayload {
    /// String primitive
    String(String),
    /// Number primitive
    Number(f64),
    /// Bool primitive
    Bool(bool),
    /// Ordered children
    List(Vec<WireValue>),
    /// Unordered children
    Set(Vec<WireValue>),
    /// String-keyed children, iterated in key order
    Map(BTreeMap<String, WireValue>),
}

impl WirePayload {
    /// Structural kind of this payload
    pub fn kind(&self) -> WireKind {
        match self {
            WirePayload::String(_) => WireKind::String,
            WirePayload::Number(_) => WireKind::Number,
            WirePayload::Bool(_) => WireKind::Bool,
            WirePayload::List(_) => WireKind::List,
            WirePayload::Set(_) => WireKind::Set,
            WirePayload::Map(_) => WireKind::Map,
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = &WireValue> + '_> {
        match self {
            WirePayload::List(items) | WirePayload::Set(items) => Box::new(items.iter()),
            WirePayload::Map(entries) => Box::new(entries.values()),
            WirePayload::String(_) | WirePayload::Number(_) | WirePayload::Bool(_) => {
                Box::new(std::iter::empty())
            }
        }
    }
}

fn check_payload(ty: &WireType, payload: &WirePayload) -> WireResult<()> {
    if payload.kind() != ty.kind() {
        return Err(WireError::PayloadMismatch {
            expected: ty.clone(),
            actual: payload.kind(),
        });
    }
    let Some(elem) = ty.element_type() else {
        return Ok(());
    };
    for child in payload.children() {
        if child.ty.as_ref() != Some(elem) {
            return Err(WireError::ElementMismatch {
                expected: elem.clone(),
                actual: child
                    .ty
                    .as_ref()
                    .map_or_else(|| "untyped".to_string(), ToString::to_string),
            });
        }
        if let WireState::Known(inner) = &child.state {
            check_payload(elem, inner)?;
        }
    }
    Ok(())
}

impl PartialEq for WirePayload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (WirePayload::String(a), WirePayload::String(b)) => a == b,
            (WirePayload::Number(a), WirePayload::Number(b)) => a == b,
            (WirePayload::Bool(a), WirePayload::Bool(b)) => a == b,
            (WirePayload::List(a), WirePayload::List(b)) => a == b,
            (WirePayload::Map(a), WirePayload::Map(b)) => a == b,
            (WirePayload::Set(a), WirePayload::Set(b)) => unordered_eq(a, b),
            _ => false,
        }
    }
}

/// Order-independent comparison; members are not hashable in general.
fn unordered_eq(a: &[WireValue], b: &[WireValue]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|left| {
        let found = (0..b.len()).find(|&i| !used[i] && *left == b[i]);
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

/// Determinacy of a wire value
#[derive(Debug, Clone, PartialEq)]
pub enum WireState {
    /// Not yet known
    Unknown,
    /// Explicitly absent
    Null,
    /// Concrete content
    Known(WirePayload),
}

/// A node of the wire value tree
#[derive(Debug, Clone, PartialEq)]
pub struct WireValue {
    ty: Option<WireType>,
    state: WireState,
}

impl WireValue {
    /// Create a known value without checking the payload against the type
    pub fn new(ty: WireType, payload: WirePayload) -> Self {
        WireValue {
            ty: Some(ty),
            state: WireState::Known(payload),
        }
    }

    /// Create a known value, checking the payload against the type recursively
    pub fn checked(ty: WireType, payload: WirePayload) -> WireResult<Self> {
        check_payload(&ty, &payload)?;
        Ok(WireValue::new(ty, payload))
    }

    /// Create a null value of the given type
    pub fn null(ty: WireType) -> Self {
        WireValue {
            ty: Some(ty),
            state: WireState::Null,
        }
    }

    /// Create a not-yet-known value of the given type
    pub fn unknown(ty: WireType) -> Self {
        WireValue {
            ty: Some(ty),
            state: WireState::Unknown,
        }
    }

    /// Create a value with no type at all
    pub fn untyped() -> Self {
        WireValue {
            ty: None,
            state: WireState::Null,
        }
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        WireValue::new(WireType::String, WirePayload::String(s.into()))
    }

    /// Create a number value
    pub fn number(n: f64) -> Self {
        WireValue::new(WireType::Number, WirePayload::Number(n))
    }

    /// Create a bool value
    pub fn bool(b: bool) -> Self {
        WireValue::new(WireType::Bool, WirePayload::Bool(b))
    }

    /// Create a list value of the given element type
    pub fn list(element: WireType, items: Vec<WireValue>) -> Self {
        WireValue::new(WireType::list(element), WirePayload::List(items))
    }

    /// Create a set value of the given element type
    pub fn set(element: WireType, items: Vec<WireValue>) -> Self {
        WireValue::new(WireType::set(element), WirePayload::Set(items))
    }

    /// Create a map value of the given element type
    pub fn map<K, I>(element: WireType, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, WireValue)>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        WireValue::new(WireType::map(element), WirePayload::Map(entries))
    }

    /// Declared wire type, if any
    pub fn wire_type(&self) -> Option<&WireType> {
        self.ty.as_ref()
    }

    /// Determinacy state
    pub fn state(&self) -> &WireState {
        &self.state
    }

    /// Known payload, if any
    pub fn payload(&self) -> Option<&WirePayload> {
        match &self.state {
            WireState::Known(payload) => Some(payload),
            WireState::Unknown | WireState::Null => None,
        }
    }

    /// Whether the value itself is determined (it may still contain unknown children)
    pub fn is_known(&self) -> bool {
        !matches!(self.state, WireState::Unknown)
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self.state, WireState::Null)
    }

    /// Whether the value and every nested child are determined
    pub fn is_fully_known(&self) -> bool {
        match &self.state {
            WireState::Unknown => false,
            WireState::Null => true,
            WireState::Known(payload) => payload.children().all(WireValue::is_fully_known),
        }
    }

    /// Decode ordered list children
    pub fn as_list(&self) -> WireResult<&[WireValue]> {
        match self.payload() {
            Some(WirePayload::List(items)) => Ok(items),
            _ => Err(self.not_decodable(WireKind::List)),
        }
    }

    /// Decode unordered set children
    pub fn as_set(&self) -> WireResult<&[WireValue]> {
        match self.payload() {
            Some(WirePayload::Set(items)) => Ok(items),
            _ => Err(self.not_decodable(WireKind::Set)),
        }
    }

    /// Decode string-keyed map children
    pub fn as_map(&self) -> WireResult<&BTreeMap<String, WireValue>> {
        match self.payload() {
            Some(WirePayload::Map(entries)) => Ok(entries),
            _ => Err(self.not_decodable(WireKind::Map)),
        }
    }

    /// Decode a string
    pub fn as_string(&self) -> WireResult<&str> {
        match self.payload() {
            Some(WirePayload::String(s)) => Ok(s),
            _ => Err(self.not_decodable(WireKind::String)),
        }
    }

    /// Decode a number
    pub fn as_number(&self) -> WireResult<f64> {
        match self.payload() {
            Some(WirePayload::Number(n)) => Ok(*n),
            _ => Err(self.not_decodable(WireKind::Number)),
        }
    }

    /// Decode a bool
    pub fn as_bool(&self) -> WireResult<bool> {
        match self.payload() {
            Some(WirePayload::Bool(b)) => Ok(*b),
            _ => Err(self.not_decodable(WireKind::Bool)),
        }
    }

    fn not_decodable(&self, expected: WireKind) -> WireError {
        WireError::NotDecodable {
            expected,
            value: self.to_string(),
        }
    }
}

impl fmt::Display for WirePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WirePayload::String(s) => write!(f, "{:?}", s),
            WirePayload::Number(n) => write!(f, "{}", n),
            WirePayload::Bool(b) => write!(f, "{}", b),
            WirePayload::List(items) | WirePayload::Set(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            WirePayload::Map(entries) => {
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}:{}", key, item)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{}", ty)?,
            None => write!(f, "untyped")?,
        }
        match &self.state {
            WireState::Unknown => write!(f, "<unknown>"),
            WireState::Null => write!(f, "<null>"),
            WireState::Known(payload) => write!(f, "<{}>", payload),
        }
    }
}
