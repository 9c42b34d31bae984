//! Own-property get/set/delete/define tests

use std::rc::Rc;

use super::{create_test_runtime, is_kind, num, str_val};
use barista::{
    JsError, JsObjectRef, JsValue, MissingPropertyHook, PrimitiveHint, PropertyAttributes,
    PropertyDescriptor, Runtime,
};

#[test]
fn test_set_creates_full_access_property() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set(&mut rt, "a", num(1.0), true).unwrap();
    let desc = obj.get_own_property_descriptor("a").unwrap();
    assert!(desc.is_writable() && desc.is_enumerable() && desc.is_configurable());
    assert_eq!(desc.value(), Some(&num(1.0)));
}

#[test]
fn test_index_access_uses_string_key() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set_index(&mut rt, 0, str_val("zero"), true).unwrap();
    assert!(obj.has_own_property("0"));
    assert_eq!(obj.get(&mut rt, "0").unwrap(), str_val("zero"));
    obj.set(&mut rt, "1", str_val("one"), true).unwrap();
    assert_eq!(obj.get_index(&mut rt, 1).unwrap(), str_val("one"));
}

#[test]
fn test_delete_absent_property_is_true() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    assert!(obj.delete("never-there", true).unwrap());
}

#[test]
fn test_non_configurable_delete() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.define_property(
        "z",
        PropertyDescriptor::data(num(3.0), PropertyAttributes::WRITABLE | PropertyAttributes::ENUMERABLE),
        true,
    )
    .unwrap();

    assert!(!obj.delete("z", false).unwrap());
    assert_eq!(obj.get(&mut rt, "z").unwrap(), num(3.0));

    let err = obj.delete("z", true).unwrap_err();
    assert!(matches!(err, JsError::NonConfigurable { .. }));
    assert_eq!(obj.get(&mut rt, "z").unwrap(), num(3.0));
}

#[test]
fn test_non_configurable_index_delete() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.define_property("4", PropertyDescriptor::data(num(4.0), PropertyAttributes::SEALED), true)
        .unwrap();
    assert!(!obj.delete_index(4, false).unwrap());
    assert!(obj.delete_index(4, true).is_err());
    assert_eq!(obj.get_index(&mut rt, 4).unwrap(), num(4.0));
}

#[test]
fn test_define_non_configurable_allows_writable_value_change() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.define_property("w", PropertyDescriptor::data(num(1.0), PropertyAttributes::WRITABLE), true)
        .unwrap();
    assert!(obj
        .define_property("w", PropertyDescriptor::data(num(2.0), PropertyAttributes::WRITABLE), true)
        .unwrap());
    assert_eq!(obj.get(&mut rt, "w").unwrap(), num(2.0));

    let changed = PropertyDescriptor::data(num(2.0), PropertyAttributes::WRITABLE | PropertyAttributes::ENUMERABLE);
    assert!(!obj.define_property("w", changed.clone(), false).unwrap());
    assert!(is_kind(obj.define_property("w", changed, true), "TypeError"));
}

#[test]
fn test_define_sealed_accepts_only_same_value() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.define_property("s", PropertyDescriptor::data(num(1.0), PropertyAttributes::SEALED), true)
        .unwrap();
    assert!(obj
        .define_property("s", PropertyDescriptor::data(num(1.0), PropertyAttributes::SEALED), true)
        .unwrap());
    assert!(!obj
        .define_property("s", PropertyDescriptor::data(num(2.0), PropertyAttributes::SEALED), false)
        .unwrap());
    assert_eq!(obj.get(&mut rt, "s").unwrap(), num(1.0));
}

#[test]
fn test_define_configurable_converts_data_to_accessor() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set(&mut rt, "p", num(1.0), true).unwrap();
    let getter = rt.create_native_function("p", 0, |_, _, _| Ok(JsValue::from("computed"))).unwrap();
    obj.define_property(
        "p",
        PropertyDescriptor::accessor(Some(getter), None, PropertyAttributes::FULL_ACCESS),
        true,
    )
    .unwrap();
    assert_eq!(obj.get(&mut rt, "p").unwrap(), str_val("computed"));
    let desc = obj.get_own_property_descriptor("p").unwrap();
    assert!(desc.is_accessor());
    assert!(!desc.is_writable());
}

#[test]
fn test_read_only_write_silent_or_throws() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.define_property("r", PropertyDescriptor::data(num(1.0), PropertyAttributes::CONFIGURABLE), true)
        .unwrap();
    assert!(obj.set_if_exists(&mut rt, "r", num(2.0), false).unwrap());
    assert_eq!(obj.get(&mut rt, "r").unwrap(), num(1.0));
    assert!(matches!(
        obj.set_if_exists(&mut rt, "r", num(2.0), true),
        Err(JsError::ReadOnlyProperty { .. })
    ));
}

#[test]
fn test_set_if_exists_reports_absence() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    assert!(!obj.set_if_exists(&mut rt, "missing", num(1.0), true).unwrap());
    assert!(!obj.has_own_property("missing"));
}

#[test]
fn test_own_keys_follow_insertion_order() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    for name in ["b", "a", "c"] {
        obj.set(&mut rt, name, JsValue::Null, true).unwrap();
    }
    obj.delete("a", true).unwrap();
    obj.set(&mut rt, "a", JsValue::Null, true).unwrap();
    let keys: Vec<String> = obj.own_keys().iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["b", "c", "a"]);
    assert_eq!(obj.properties().len(), 3);
}

#[test]
fn test_call_member_errors() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set(&mut rt, "notFn", num(1.0), true).unwrap();
    assert!(matches!(
        obj.call_member(&mut rt, "nothing", &[]),
        Err(JsError::NoSuchMethod { .. })
    ));
    assert!(matches!(
        obj.call_member(&mut rt, "notFn", &[]),
        Err(JsError::NotAFunction { .. })
    ));
    assert_eq!(obj.try_call_member(&mut rt, "notFn", &[]).unwrap(), None);
}

#[test]
fn test_call_member_binds_this() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set(&mut rt, "v", num(21.0), true).unwrap();
    let double = rt
        .create_native_function("double", 0, |rt, this, _| {
            let v = this.as_object().map(|o| o.get(rt, "v")).transpose()?.unwrap_or_default();
            Ok(JsValue::Number(v.to_number() * 2.0))
        })
        .unwrap();
    obj.set(&mut rt, "double", JsValue::Object(double), true).unwrap();
    assert_eq!(obj.call_member(&mut rt, "double", &[]).unwrap(), num(42.0));
}

#[test]
fn test_to_primitive_order() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    assert_eq!(
        obj.to_primitive(&mut rt, PrimitiveHint::Number).unwrap(),
        str_val("[object Object]")
    );

    let value_of = rt.create_native_function("valueOf", 0, |_, _, _| Ok(JsValue::Number(42.0))).unwrap();
    obj.set(&mut rt, "valueOf", JsValue::Object(value_of), true).unwrap();
    assert_eq!(obj.to_primitive(&mut rt, PrimitiveHint::Default).unwrap(), num(42.0));
    assert_eq!(
        obj.to_primitive(&mut rt, PrimitiveHint::String).unwrap(),
        str_val("[object Object]")
    );
}

#[test]
fn test_to_primitive_fails_without_conversions() {
    let mut rt = create_test_runtime();
    let raw = rt.create_object_with_prototype(None);
    assert!(is_kind(raw.to_primitive(&mut rt, PrimitiveHint::Default), "TypeError"));
}

#[test]
fn test_array_length_tracks_and_truncates() {
    let mut rt = create_test_runtime();
    let arr = rt.create_array(vec![num(1.0), num(2.0), num(3.0)]).unwrap();
    assert_eq!(arr.get(&mut rt, "length").unwrap(), num(3.0));

    arr.set(&mut rt, "length", num(1.0), true).unwrap();
    assert_eq!(arr.array_length(), Some(1));
    assert!(!arr.has_own_property("1"));
    assert!(!arr.has_own_property("2"));
    assert_eq!(arr.get_index(&mut rt, 0).unwrap(), num(1.0));

    arr.set_index(&mut rt, 9, num(9.0), true).unwrap();
    assert_eq!(arr.get(&mut rt, "length").unwrap(), num(10.0));
}

#[test]
fn test_array_length_rejects_fractions() {
    let mut rt = create_test_runtime();
    let arr = rt.create_array(Vec::new()).unwrap();
    let err = arr.set(&mut rt, "length", num(1.5), true).unwrap_err();
    assert!(matches!(err, JsError::RangeError { .. }));
    assert!(is_kind(arr.set(&mut rt, "length", num(-1.0), true), "RangeError"));
}

#[test]
fn test_array_length_rejects_near_integers() {
    let mut rt = create_test_runtime();
    let arr = rt.create_array(vec![num(1.0)]).unwrap();
    assert!(is_kind(arr.set(&mut rt, "length", num(1e-17), true), "RangeError"));
    assert!(is_kind(arr.set(&mut rt, "length", num(1.0 + f64::EPSILON), true), "RangeError"));
    assert_eq!(arr.array_length(), Some(1));
    assert_eq!(arr.get_index(&mut rt, 0).unwrap(), num(1.0));
}

#[test]
fn test_array_length_descriptor_is_synthesized() {
    let mut rt = create_test_runtime();
    let arr = rt.create_array(vec![JsValue::Null; 4]).unwrap();
    let desc = arr.get_own_property_descriptor("length").unwrap();
    assert_eq!(desc.value(), Some(&num(4.0)));
    assert!(desc.is_writable());
    assert!(!desc.is_enumerable());
    assert!(!desc.is_configurable());
    assert!(!arr.delete("length", false).unwrap());
}

struct EchoMissing;

impl MissingPropertyHook for EchoMissing {
    fn missing_property(
        &self,
        _rt: &mut Runtime,
        receiver: &JsObjectRef,
        name: &str,
    ) -> Result<JsValue, JsError> {
        Ok(JsValue::from(format!("{}:{}", receiver.class_name(), name)))
    }
}

struct Silent;

impl MissingPropertyHook for Silent {}

#[test]
fn test_missing_property_hook_synthesizes_values() {
    let mut rt = create_test_runtime();
    let parent = rt.create_object();
    parent.set_missing_property_hook(Rc::new(EchoMissing));
    let child = rt.create_object_with_prototype(Some(parent));
    assert_eq!(child.get(&mut rt, "anything").unwrap(), str_val("Object:anything"));
    assert!(!child.has_property("anything"));
}

#[test]
fn test_default_missing_property_hook_is_undefined() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set_missing_property_hook(Rc::new(Silent));
    assert_eq!(obj.get(&mut rt, "nope").unwrap(), JsValue::Undefined);
}
