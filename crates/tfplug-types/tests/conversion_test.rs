/// Conversion tests: JSON documents through the wire layer into typed values
use serde_json::json;
use tfplug_core::WirePayload;
use tfplug_types::{
    AttrType, AttrValue, AttributePathStep, ConversionConfig, CustomType, ListType, ListValue,
    MapType, SetType, SetValue, State, TypeError, WireError, WireType, WireValue,
};

#[derive(Debug)]
struct Hostname {
    base: AttrType,
}

fn hostname() -> AttrType {
    AttrType::custom(Hostname {
        base: AttrType::String,
    })
}

impl CustomType for Hostname {
    fn name(&self) -> &str {
        "HostnameType"
    }

    fn base_type(&self) -> &AttrType {
        &self.base
    }
}

#[test]
fn test_json_list_to_typed_value() {
    let ty = AttrType::list(AttrType::String);
    let wire = WireValue::from_json(&ty.terraform_type().unwrap(), &json!(["c", "a", "b"])).unwrap();

    let value = ty.value_from_wire(&wire).unwrap();
    let list = value.as_list().unwrap();
    let items: Vec<String> = list.elements().iter().map(ToString::to_string).collect();
    assert_eq!(items, vec![r#""c""#, r#""a""#, r#""b""#]);

    assert_eq!(value.to_wire().unwrap().to_json().unwrap(), json!(["c", "a", "b"]));
}

#[test]
fn test_json_map_with_null_entry() {
    let ty = AttrType::map(AttrType::Number);
    let wire = WireValue::from_json_str(
        &ty.terraform_type().unwrap(),
        r#"{"cpu": 2, "memory": 512, "disk": null}"#,
    )
    .unwrap();

    let value = ty.value_from_wire(&wire).unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("cpu"), Some(&AttrValue::number(2.0)));
    assert_eq!(map.get("disk"), Some(&AttrValue::Number(State::Null)));
}

#[test]
fn test_nested_set_of_lists() {
    let ty = AttrType::set(AttrType::list(AttrType::Number));
    let wire = WireValue::from_json(&ty.terraform_type().unwrap(), &json!([[1, 2], [3]])).unwrap();

    let value = ty.value_from_wire(&wire).unwrap();
    let set = value.as_set().unwrap();
    assert_eq!(set.len(), 2);

    let three = ListValue::new(AttrType::Number, vec![AttrValue::number(3.0)]).unwrap();
    assert!(set.contains(&AttrValue::List(three)));
}

#[test]
fn test_set_equality_from_json_is_unordered() {
    let ty = SetType::new(AttrType::String);
    let wire_ty = ty.terraform_type().unwrap();
    let a = ty
        .value_from_wire(&WireValue::from_json(&wire_ty, &json!(["x", "y"])).unwrap())
        .unwrap();
    let b = ty
        .value_from_wire(&WireValue::from_json(&wire_ty, &json!(["y", "x"])).unwrap())
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_wire_type_mismatch() {
    let ty = ListType::new(AttrType::String);
    let input = WireValue::set(WireType::String, vec![WireValue::string("a")]);

    let err = ty.value_from_wire(&input).unwrap_err();
    assert_eq!(
        err,
        TypeError::TypeMismatch {
            value: r#"Set[String]<String<"a">>"#.to_string(),
            target: "List with ElementType StringType".to_string(),
            expected: WireType::list(WireType::String),
        }
    );
}

#[test]
fn test_malformed_payload_surfaces_wire_error() {
    let input = WireValue::new(WireType::map(WireType::String), WirePayload::List(vec![]));
    let err = MapType::new(AttrType::String).value_from_wire(&input).unwrap_err();
    assert!(matches!(err, TypeError::Wire(WireError::NotDecodable { .. })));
}

#[test]
fn test_missing_element_type() {
    let ty = AttrType::List(ListType::default());
    assert_eq!(
        ty.terraform_type(),
        Err(TypeError::MissingElementType {
            shape: tfplug_types::Shape::List
        })
    );
    assert!(ty.value_from_wire(&WireValue::untyped()).is_err());
    assert!(!ty.equal(&ty));
}

#[test]
fn test_depth_limit() {
    let ty = AttrType::list(AttrType::list(AttrType::list(AttrType::Bool)));
    let wire = WireValue::from_json(&ty.terraform_type().unwrap(), &json!([[[true]]])).unwrap();

    let config = ConversionConfig { max_depth: 2 };
    assert_eq!(
        ty.value_from_wire_with(&wire, &config),
        Err(TypeError::DepthExceeded { limit: 2 })
    );

    let config: ConversionConfig = serde_json::from_value(json!({ "max_depth": 3 })).unwrap();
    assert!(ty.value_from_wire_with(&wire, &config).is_ok());
}

#[test]
fn test_custom_element_type() {
    let ty = AttrType::list(hostname());
    let wire = WireValue::from_json(&ty.terraform_type().unwrap(), &json!(["example.com"])).unwrap();

    let value = ty.value_from_wire(&wire).unwrap();
    let list = value.as_list().unwrap();
    assert_eq!(list.element_type().unwrap().to_string(), "HostnameType");

    let AttrValue::Custom(custom) = &list.elements()[0] else {
        panic!("expected custom value, got {}", list.elements()[0]);
    };
    assert_eq!(custom.inner(), &AttrValue::string("example.com"));
    assert_eq!(value.to_wire().unwrap(), wire);

    assert!(hostname().equal(&hostname()));
    assert!(!hostname().equal(&AttrType::String));
    assert_eq!(ty.to_string(), "ListType[HostnameType]");
}

#[test]
fn test_path_steps_per_shape() {
    let index = AttributePathStep::ElementKeyInt(7);
    let key = AttributePathStep::ElementKeyString("k".to_string());
    let value = AttributePathStep::ElementKeyValue(WireValue::string("v"));
    let name = AttributePathStep::AttributeName("attr".to_string());

    let list = AttrType::list(AttrType::Bool);
    let map = AttrType::map(AttrType::Bool);
    let set = AttrType::set(AttrType::Bool);

    assert_eq!(list.apply_path_step(&index).unwrap(), AttrType::Bool);
    assert_eq!(map.apply_path_step(&key).unwrap(), AttrType::Bool);
    assert_eq!(set.apply_path_step(&value).unwrap(), AttrType::Bool);

    for step in [&key, &value, &name] {
        assert!(list.apply_path_step(step).is_err());
    }
    for step in [&index, &value, &name] {
        assert!(map.apply_path_step(step).is_err());
    }
    for step in [&index, &key, &name] {
        assert!(set.apply_path_step(step).is_err());
    }

    let err = set.apply_path_step(&index).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot apply step ElementKeyInt to SetType[BoolType]"
    );

    let nested = AttrType::map(AttrType::list(hostname()));
    let elem = nested.apply_path_step(&key).unwrap();
    assert_eq!(elem.apply_path_step(&index).unwrap(), hostname());
}

#[test]
fn test_value_type_and_hooks() {
    let ty = SetType::new(AttrType::Number);
    let placeholder = ty.value_type();
    assert!(placeholder.is_null());
    assert_eq!(placeholder.attr_type(), ty);

    let set = SetValue::new(AttrType::Number, vec![AttrValue::number(1.0)]).unwrap();
    assert_eq!(
        ty.value_from_set(set.clone()).unwrap(),
        AttrValue::Set(set)
    );

    let list = ListType::new(AttrType::Bool);
    assert_eq!(
        list.value_from_list(ListValue::unknown(AttrType::Bool)).unwrap(),
        AttrValue::List(ListValue::unknown(AttrType::Bool))
    );
}
