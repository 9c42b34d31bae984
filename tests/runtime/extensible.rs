//! The extensible flag only ever latches off

use super::{create_test_runtime, num};
use barista::{JsError, PropertyAttributes, PropertyDescriptor};

#[test]
fn test_extensibility_latch() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set(&mut rt, "kept", num(1.0), true).unwrap();
    obj.set_extensible(false).unwrap();

    assert!(matches!(
        obj.set(&mut rt, "new", num(1.0), true),
        Err(JsError::NotExtensible { .. })
    ));
    assert!(!obj.has_own_property("new"));

    assert!(matches!(
        obj.set_extensible(true),
        Err(JsError::InvalidState { .. })
    ));
    assert!(!obj.is_extensible());
}

#[test]
fn test_non_extensible_silent_mode() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.prevent_extensions();
    obj.set(&mut rt, "new", num(1.0), false).unwrap();
    assert!(obj.own_keys().is_empty());
    assert!(!obj
        .define_property("new", PropertyDescriptor::data(num(1.0), PropertyAttributes::FULL_ACCESS), false)
        .unwrap());
}

#[test]
fn test_existing_properties_stay_mutable() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set(&mut rt, "kept", num(1.0), true).unwrap();
    obj.prevent_extensions();

    obj.set(&mut rt, "kept", num(2.0), true).unwrap();
    assert_eq!(obj.get(&mut rt, "kept").unwrap(), num(2.0));
    assert!(obj.delete("kept", true).unwrap());
    assert!(matches!(
        obj.set(&mut rt, "kept", num(3.0), true),
        Err(JsError::NotExtensible { .. })
    ));
}

#[test]
fn test_latching_is_idempotent() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set_extensible(true).unwrap();
    assert!(obj.is_extensible());
    obj.set_extensible(false).unwrap();
    obj.set_extensible(false).unwrap();
    assert!(!obj.is_extensible());
}

#[test]
fn test_non_extensible_child_cannot_shadow() {
    let mut rt = create_test_runtime();
    let parent = rt.create_object();
    parent.set(&mut rt, "x", num(1.0), true).unwrap();
    let child = rt.create_object_with_prototype(Some(parent.clone()));
    child.prevent_extensions();

    assert!(child.set(&mut rt, "x", num(2.0), true).is_err());
    assert_eq!(child.get(&mut rt, "x").unwrap(), num(1.0));
    assert_eq!(parent.get(&mut rt, "x").unwrap(), num(1.0));
}

#[test]
fn test_prevent_extensions_latches_like_set_extensible() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.prevent_extensions();
    obj.prevent_extensions();
    assert!(!obj.is_extensible());
    assert!(matches!(
        obj.set_extensible(true),
        Err(JsError::InvalidState { .. })
    ));
    assert!(matches!(
        obj.set(&mut rt, "new", num(1.0), true),
        Err(JsError::NotExtensible { .. })
    ));
}
