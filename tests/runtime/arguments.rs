//! Arguments objects and their link to parameter bindings

use super::{create_test_runtime, num, str_val};
use barista::{
    DeclarativeScope, JsError, JsObjectRef, JsString, JsValue, PropertyAttributes, PropertyDescriptor,
    Runtime,
};

fn make_call(
    rt: &mut Runtime,
    params: &[&str],
    values: &[JsValue],
    strict: bool,
) -> (JsObjectRef, DeclarativeScope, JsObjectRef) {
    let callee = rt.create_native_function("f", params.len(), |_, _, _| Ok(JsValue::Undefined)).unwrap();
    let names: Vec<JsString> = params.iter().map(|p| JsString::from(*p)).collect();
    let scope = DeclarativeScope::for_parameters(&names, values);
    let arguments = rt
        .create_arguments_object(&callee, &names, &scope, values, strict)
        .unwrap();
    (arguments, scope, callee)
}

#[test]
fn test_arguments_aliasing_with_duplicate_parameters() {
    let mut rt = create_test_runtime();
    let (arguments, scope, _) = make_call(&mut rt, &["a", "a"], &[num(1.0), num(2.0)], false);

    assert_eq!(scope.get("a"), Some(num(2.0)));
    assert_eq!(arguments.get_index(&mut rt, 0).unwrap(), num(1.0));
    assert_eq!(arguments.get_index(&mut rt, 1).unwrap(), num(2.0));

    scope.set("a", num(9.0)).unwrap();
    assert_eq!(arguments.get_index(&mut rt, 1).unwrap(), num(9.0));
    assert_eq!(arguments.get_index(&mut rt, 0).unwrap(), num(1.0));
}

#[test]
fn test_mapped_index_writes_through_to_parameter() {
    let mut rt = create_test_runtime();
    let (arguments, scope, _) = make_call(&mut rt, &["a", "b"], &[num(1.0), num(2.0)], false);

    arguments.set_index(&mut rt, 0, num(5.0), true).unwrap();
    assert_eq!(scope.get("a"), Some(num(5.0)));

    scope.set("b", str_val("changed")).unwrap();
    assert_eq!(arguments.get_index(&mut rt, 1).unwrap(), str_val("changed"));
}

#[test]
fn test_delete_severs_mapping_but_keeps_value() {
    let mut rt = create_test_runtime();
    let (arguments, scope, _) = make_call(&mut rt, &["a"], &[num(1.0)], false);
    scope.set("a", num(3.0)).unwrap();

    assert!(arguments.delete_index(0, true).unwrap());
    assert!(arguments.has_own_property("0"));
    assert_eq!(arguments.get_index(&mut rt, 0).unwrap(), num(3.0));

    scope.set("a", num(4.0)).unwrap();
    assert_eq!(arguments.get_index(&mut rt, 0).unwrap(), num(3.0));
    arguments.set_index(&mut rt, 0, num(8.0), true).unwrap();
    assert_eq!(scope.get("a"), Some(num(4.0)));

    assert!(arguments.delete_index(0, true).unwrap());
    assert!(!arguments.has_own_property("0"));
}

#[test]
fn test_redefined_index_no_longer_aliases_parameter() {
    let mut rt = create_test_runtime();
    let (arguments, scope, _) = make_call(&mut rt, &["a"], &[num(1.0)], false);

    arguments
        .define_property("0", PropertyDescriptor::data(num(42.0), PropertyAttributes::FULL_ACCESS), true)
        .unwrap();
    scope.set("a", num(7.0)).unwrap();
    assert_eq!(arguments.get_index(&mut rt, 0).unwrap(), num(42.0));

    assert!(arguments.delete_index(0, true).unwrap());
    assert!(!arguments.has_own_property("0"));
    assert_eq!(scope.get("a"), Some(num(7.0)));
}

#[test]
fn test_redefined_sealed_index_cannot_be_deleted() {
    let mut rt = create_test_runtime();
    let (arguments, _scope, _) = make_call(&mut rt, &["a"], &[num(1.0)], false);

    arguments
        .define_property("0", PropertyDescriptor::data(num(42.0), PropertyAttributes::SEALED), true)
        .unwrap();

    assert!(matches!(
        arguments.delete_index(0, true),
        Err(JsError::NonConfigurable { .. })
    ));
    assert!(!arguments.delete_index(0, false).unwrap());
    assert_eq!(arguments.get_index(&mut rt, 0).unwrap(), num(42.0));
    assert!(!arguments.get_own_property_descriptor("0").unwrap().is_configurable());
}

#[test]
fn test_extra_values_are_plain_properties() {
    let mut rt = create_test_runtime();
    let (arguments, scope, _) = make_call(&mut rt, &["a"], &[num(1.0), num(2.0)], false);
    assert_eq!(arguments.get(&mut rt, "length").unwrap(), num(2.0));
    assert_eq!(arguments.get_index(&mut rt, 1).unwrap(), num(2.0));
    assert!(!arguments.get_own_property_descriptor("1").unwrap().is_accessor());
    assert!(arguments.get_own_property_descriptor("0").unwrap().is_accessor());
    assert!(!scope.has("1"));
}

#[test]
fn test_missing_values_are_not_indexed() {
    let mut rt = create_test_runtime();
    let (arguments, scope, _) = make_call(&mut rt, &["a", "b"], &[num(1.0)], false);
    assert_eq!(arguments.get(&mut rt, "length").unwrap(), num(1.0));
    assert!(!arguments.has_own_property("1"));
    assert_eq!(scope.get("b"), Some(JsValue::Undefined));
}

#[test]
fn test_non_strict_callee_and_length_attributes() {
    let mut rt = create_test_runtime();
    let (arguments, _, callee) = make_call(&mut rt, &["a"], &[num(1.0)], false);
    assert_eq!(arguments.get(&mut rt, "callee").unwrap(), JsValue::Object(callee));
    for name in ["callee", "length"] {
        let desc = arguments.get_own_property_descriptor(name).unwrap();
        assert!(!desc.is_enumerable());
        assert!(desc.is_writable());
        assert!(desc.is_configurable());
    }
    assert_eq!(
        arguments.call_member(&mut rt, "toString", &[]).unwrap(),
        str_val("[object Arguments]")
    );
}

#[test]
fn test_strict_arguments_poison_caller_and_callee() {
    let mut rt = create_test_runtime();
    let (arguments, scope, _) = make_call(&mut rt, &["a"], &[num(1.0)], true);

    assert!(matches!(
        arguments.get(&mut rt, "callee"),
        Err(JsError::StrictModeViolation { .. })
    ));
    assert!(matches!(
        arguments.set(&mut rt, "caller", num(1.0), true),
        Err(JsError::StrictModeViolation { .. })
    ));
    assert!(!arguments.delete("callee", false).unwrap());

    arguments.set_index(&mut rt, 0, num(5.0), true).unwrap();
    assert_eq!(scope.get("a"), Some(num(1.0)));
    scope.set("a", num(7.0)).unwrap();
    assert_eq!(arguments.get_index(&mut rt, 0).unwrap(), num(5.0));
}
