//! Property-based tests for type equality and conversion

use crate::{AttrType, ListType, MapType, SetType, State};
use proptest::prelude::*;
use tfplug_core::{WireType, WireValue};

/// Generate nested element types up to a few levels deep
fn arb_attr_type() -> impl Strategy<Value = AttrType> {
    let leaf = prop_oneof![
        Just(AttrType::String),
        Just(AttrType::Number),
        Just(AttrType::Bool),
    ];
    leaf.prop_recursive(4, 16, 1, |inner| {
        prop_oneof![
            inner.clone().prop_map(AttrType::list),
            inner.clone().prop_map(AttrType::map),
            inner.prop_map(AttrType::set),
        ]
    })
}

/// Generate a known wire value of the given wire type
fn arb_wire_value(ty: WireType) -> BoxedStrategy<WireValue> {
    match ty {
        WireType::String => "[a-z]{0,4}".prop_map(WireValue::string).boxed(),
        WireType::Number => (-1000i32..1000)
            .prop_map(|n| WireValue::number(f64::from(n)))
            .boxed(),
        WireType::Bool => any::<bool>().prop_map(WireValue::bool).boxed(),
        WireType::List(elem) => prop::collection::vec(arb_wire_value(*elem.clone()), 0..4)
            .prop_map(move |items| WireValue::list(*elem.clone(), items))
            .boxed(),
        WireType::Set(elem) => prop::collection::vec(arb_wire_value(*elem.clone()), 0..4)
            .prop_map(move |items| WireValue::set(*elem.clone(), items))
            .boxed(),
        WireType::Map(elem) => {
            prop::collection::btree_map("[a-z]{1,3}", arb_wire_value(*elem.clone()), 0..4)
                .prop_map(move |entries| WireValue::map(*elem.clone(), entries))
                .boxed()
        }
    }
}

fn arb_typed_value() -> impl Strategy<Value = (AttrType, WireValue)> {
    arb_attr_type().prop_flat_map(|ty| {
        let wire = ty.terraform_type().unwrap_or(WireType::String);
        arb_wire_value(wire).prop_map(move |value| (ty.clone(), value))
    })
}

proptest! {
    /// Every well-formed type equals itself
    #[test]
    fn prop_equality_reflexive(ty in arb_attr_type()) {
        prop_assert!(ty.equal(&ty));
        prop_assert!(ty.equal(&ty.clone()));
    }

    /// Equality does not depend on argument order
    #[test]
    fn prop_equality_symmetric(a in arb_attr_type(), b in arb_attr_type()) {
        prop_assert_eq!(a.equal(&b), b.equal(&a));
    }

    /// Wrapping in the same shape preserves equality either way
    #[test]
    fn prop_equality_compositional(a in arb_attr_type(), b in arb_attr_type()) {
        let inner = a.equal(&b);
        prop_assert_eq!(AttrType::list(a.clone()).equal(&AttrType::list(b.clone())), inner);
        prop_assert_eq!(AttrType::map(a.clone()).equal(&AttrType::map(b.clone())), inner);
        prop_assert_eq!(AttrType::set(a.clone()).equal(&AttrType::set(b.clone())), inner);
        prop_assert!(!AttrType::list(a.clone()).equal(&AttrType::set(b.clone())));
        prop_assert!(!AttrType::map(a).equal(&AttrType::list(b)));
    }

    /// Type equality agrees with wire type equality for built-in types
    #[test]
    fn prop_equality_matches_wire_type(a in arb_attr_type(), b in arb_attr_type()) {
        let wire_equal = a.terraform_type().ok() == b.terraform_type().ok();
        prop_assert_eq!(a.equal(&b), wire_equal);
    }

    /// A collection without an element type equals nothing
    #[test]
    fn prop_missing_element_never_equal(ty in arb_attr_type()) {
        let missing = [
            AttrType::List(ListType::default()),
            AttrType::Map(MapType::default()),
            AttrType::Set(SetType::default()),
        ];
        for m in &missing {
            prop_assert!(!m.equal(m));
            prop_assert!(!m.equal(&ty));
            prop_assert!(!ty.equal(m));
        }
    }

    /// Converting a known value and encoding it again is lossless
    #[test]
    fn prop_convert_then_encode((ty, wire) in arb_typed_value()) {
        let value = ty.value_from_wire(&wire).unwrap();
        prop_assert_eq!(value.attr_type(), ty);
        prop_assert_eq!(value.to_wire().unwrap(), wire);
    }

    /// Unknown and null wire values never fail conversion
    #[test]
    fn prop_determinacy_preserved(ty in arb_attr_type()) {
        let wire = ty.terraform_type().unwrap();

        let unknown = ty.value_from_wire(&WireValue::unknown(wire.clone())).unwrap();
        prop_assert!(unknown.is_unknown());

        let null = ty.value_from_wire(&WireValue::null(wire)).unwrap();
        prop_assert!(null.is_null());

        let absent = ty.value_from_wire(&WireValue::untyped()).unwrap();
        prop_assert!(absent.is_null());
    }
}

#[test]
fn test_state_map_keeps_determinacy() {
    assert_eq!(State::<i32>::Null.map(|n| n + 1), State::Null);
    assert_eq!(State::<i32>::Unknown.map(|n| n + 1), State::Unknown);
    assert_eq!(State::Known(1).map(|n| n + 1), State::Known(2));
}
