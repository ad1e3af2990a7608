//! Set type and value
//!
//! An unordered collection addressed by member value. Conversion keeps
//! duplicate members as received; validation is what reports them.

use crate::attr::{write_members, AttrType, AttrValue, ValidateType};
use crate::config::{ConversionConfig, Walk};
use crate::diag::{Diagnostic, Diagnostics};
use crate::path::Path;
use crate::state::{determine, determine_for_validation, Determinacy, State};
use crate::{Shape, TypeError, TypeResult};
use std::fmt;
use std::sync::Arc;
use tfplug_core::{AttributePathStep, WirePayload, WireType, WireValue};
use tracing::{debug, trace};

/// Type of an unordered set
#[derive(Debug, Clone, Default)]
pub struct SetType {
    elem_type: Option<Arc<AttrType>>,
}

impl SetType {
    /// Create a set type of the given element type
    pub fn new(element: AttrType) -> Self {
        SetType {
            elem_type: Some(Arc::new(element)),
        }
    }

    /// Declared element type
    pub fn element_type(&self) -> Option<&AttrType> {
        self.elem_type.as_deref()
    }

    /// Same set type with a different element type
    pub fn with_element_type(&self, element: AttrType) -> Self {
        SetType::new(element)
    }

    fn elem(&self) -> TypeResult<&Arc<AttrType>> {
        self.elem_type
            .as_ref()
            .ok_or(TypeError::MissingElementType { shape: Shape::Set })
    }

    /// Wire type: a set of the element's wire type
    pub fn terraform_type(&self) -> TypeResult<WireType> {
        Ok(WireType::set(self.elem()?.terraform_type()?))
    }

    /// Convert a wire value into a set value
    pub fn value_from_wire(&self, input: &WireValue) -> TypeResult<AttrValue> {
        self.value_from_wire_with(input, &ConversionConfig::default())
    }

    /// Convert a wire value into a set value under the given limits
    pub fn value_from_wire_with(
        &self,
        input: &WireValue,
        config: &ConversionConfig,
    ) -> TypeResult<AttrValue> {
        self.convert(input, Walk::new(config)).map(AttrValue::Set)
    }

    pub(crate) fn convert(&self, input: &WireValue, walk: Walk) -> TypeResult<SetValue> {
        let elem = self.elem()?;
        let expected = self.terraform_type()?;
        let determinacy = determine(input, &expected, || {
            format!("Set with ElementType {}", elem)
        })?;
        if let Some(state) = determinacy.empty_state() {
            return Ok(SetValue::with_state(Some(Arc::clone(elem)), state));
        }

        let walk = walk.descend()?;
        let members = input
            .as_set()?
            .iter()
            .map(|child| elem.convert(child, walk))
            .collect::<TypeResult<Vec<_>>>()?;
        trace!(len = members.len(), "converted set");
        Ok(SetValue::with_state(
            Some(Arc::clone(elem)),
            State::Known(members),
        ))
    }

    /// Whether `other` is a set type with an equal element type
    pub fn equal(&self, other: &SetType) -> bool {
        match (&self.elem_type, &other.elem_type) {
            (Some(a), Some(b)) => a.equal(b),
            _ => false,
        }
    }

    /// Element type for a value step; any other step is rejected.
    ///
    /// Membership is not checked here.
    pub fn apply_path_step(&self, step: &AttributePathStep) -> TypeResult<AttrType> {
        match step {
            AttributePathStep::ElementKeyValue(_) => Ok(self.elem()?.as_ref().clone()),
            _ => Err(TypeError::InvalidPathStep {
                step: step.kind_name(),
                ty: self.to_string(),
            }),
        }
    }

    /// Validate members and report duplicates.
    ///
    /// Each fully-known member is validated at `path[Value(member)]`, then
    /// compared against every later fully-known member. Each equal pair
    /// yields one "Duplicate Set Element" error.
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
    pub fn value_type(&self) -> SetValue {
        SetValue::with_state(self.elem_type.clone(), State::Null)
    }

    /// Hook for wrapping set values into provider-facing values
    pub fn value_from_set(&self, set: SetValue) -> Result<AttrValue, Diagnostics> {
        Ok(AttrValue::Set(set))
    }
}

impl ValidateType for SetType {
    fn validate_wire(&self, input: &WireValue, path: &Path, walk: Walk) -> Diagnostics {
        let mut diags = Diagnostics::new();

        match determine_for_validation(input, Shape::Set, path) {
            Ok(Determinacy::Decodable) => {}
            Ok(_) => return diags,
            Err(diag) => {
                diags.add(diag);
                return diags;
            }
        }

        let members = match input.as_set() {
            Ok(members) => members,
            Err(err) => {
                diags.add(Diagnostic::provider_bug(path, Shape::Set, err));
                return diags;
            }
        };

        let elem = match self.elem() {
            Ok(elem) => elem,
            Err(err) => {
                diags.add(Diagnostic::provider_bug(path, Shape::Set, err));
                return diags;
            }
        };
        let validator = elem.validator();

        let walk = match walk.descend() {
            Ok(walk) => walk,
            Err(err) => {
                diags.add(Diagnostic::nesting_too_deep(path, err));
                return diags;
            }
        };

        for (index, outer) in members.iter().enumerate() {
            if !outer.is_fully_known() {
                trace!(index, "skipping set member that is not fully known");
                continue;
            }

            // A member that fails to convert is reported and still takes part
            // in the duplicate scan, addressed at the set itself.
            let member_path = match elem.convert(outer, walk) {
                Ok(converted) => {
                    let member_path = path.at_set_value(converted);
                    if let Some(validator) = validator {
                        diags.append(validator.validate_wire(outer, &member_path, walk));
                    }
                    member_path
                }
                Err(err) => {
                    diags.add(conversion_failure(path, err));
                    path.clone()
                }
            };

            for inner in &members[index + 1..] {
                if !inner.is_fully_known() || inner != outer {
                    continue;
                }
                debug!(%member_path, "duplicate set element");
                diags.add_attribute_error(
                    member_path.clone(),
                    "Duplicate Set Element",
                    format!("This attribute contains duplicate values of: {}", inner),
                );
            }
        }

        diags
    }
}

fn conversion_failure(path: &Path, err: TypeError) -> Diagnostic {
    match err {
        TypeError::DepthExceeded { .. } => Diagnostic::nesting_too_deep(path, err),
        err => Diagnostic::provider_bug(path, Shape::Set, err),
    }
}

impl PartialEq for SetType {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.elem_type {
            Some(elem) => write!(f, "SetType[{}]", elem),
            None => write!(f, "SetType[missing]"),
        }
    }
}

/// Value of a [`SetType`]
#[derive(Debug, Clone)]
pub struct SetValue {
    element_type: Option<Arc<AttrType>>,
    state: State<Vec<AttrValue>>,
}

impl SetValue {
    /// Create a known set, checking every member against the element type.
    ///
    /// Duplicate members are kept.
    pub fn new(element_type: AttrType, members: Vec<AttrValue>) -> TypeResult<Self> {
        for (index, member) in members.iter().enumerate() {
            let actual = member.attr_type();
            if !actual.equal(&element_type) {
                return Err(TypeError::ElementTypeMismatch {
                    shape: Shape::Set,
                    position: index.to_string(),
                    expected: element_type.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(SetValue::with_state(
            Some(Arc::new(element_type)),
            State::Known(members),
        ))
    }

    /// Create a null set
    pub fn null(element_type: AttrType) -> Self {
        SetValue::with_state(Some(Arc::new(element_type)), State::Null)
    }

    /// Create an unknown set
    pub fn unknown(element_type: AttrType) -> Self {
        SetValue::with_state(Some(Arc::new(element_type)), State::Unknown)
    }

    pub(crate) fn with_state(
        element_type: Option<Arc<AttrType>>,
        state: State<Vec<AttrValue>>,
    ) -> Self {
        SetValue {
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

    /// Whether the set is null
    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    /// Whether the set is unknown
    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }

    /// Members in decode order; empty unless known
    pub fn elements(&self) -> &[AttrValue] {
        self.state.known().map_or(&[], Vec::as_slice)
    }

    /// Whether `value` is a member
    pub fn contains(&self, value: &AttrValue) -> bool {
        self.elements().contains(value)
    }

    /// Number of members, duplicates included; zero unless known
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Whether there are no members
    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    /// Type of this value
    pub fn attr_type(&self) -> SetType {
        SetType {
            elem_type: self.element_type.clone(),
        }
    }

    /// Encode back into a wire value
    pub fn to_wire(&self) -> TypeResult<WireValue> {
        let ty = self.attr_type().terraform_type()?;
        Ok(match &self.state {
            State::Null => WireValue::null(ty),
            State::Unknown => WireValue::unknown(ty),
            State::Known(members) => {
                let items = members
                    .iter()
                    .map(AttrValue::to_wire)
                    .collect::<TypeResult<Vec<_>>>()?;
                WireValue::new(ty, WirePayload::Set(items))
            }
        })
    }
}

fn same_members(a: &[AttrValue], b: &[AttrValue]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|left| {
        match (0..b.len()).find(|&i| !used[i] && *left == b[i]) {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        let types_equal = match (&self.element_type, &other.element_type) {
            (Some(a), Some(b)) => a.equal(b),
            _ => false,
        };
        if !types_equal {
            return false;
        }
        match (&self.state, &other.state) {
            (State::Known(a), State::Known(b)) => same_members(a, b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Known(members) => {
                write!(f, "[")?;
                write_members(f, members)?;
                write!(f, "]")
            }
            State::Null => write!(f, "<null>"),
            State::Unknown => write!(f, "<unknown>"),
        }
    }
}
