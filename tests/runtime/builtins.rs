//! Object.prototype and Function.prototype members

use super::{create_test_runtime, is_kind, num, str_val};
use barista::JsValue;
use barista::builtins::function::MAX_APPLY_ARGUMENTS;

#[test]
fn test_has_own_property() {
    let mut rt = create_test_runtime();
    let parent = rt.create_object();
    parent.set(&mut rt, "inherited", num(1.0), true).unwrap();
    let child = rt.create_object_with_prototype(Some(parent));
    child.set(&mut rt, "own", num(2.0), true).unwrap();

    assert_eq!(
        child.call_member(&mut rt, "hasOwnProperty", &[str_val("own")]).unwrap(),
        JsValue::Boolean(true)
    );
    assert_eq!(
        child.call_member(&mut rt, "hasOwnProperty", &[str_val("inherited")]).unwrap(),
        JsValue::Boolean(false)
    );
}

#[test]
fn test_is_prototype_of() {
    let mut rt = create_test_runtime();
    let parent = rt.create_object();
    let child = rt.create_object_with_prototype(Some(parent.clone()));
    assert_eq!(
        parent
            .call_member(&mut rt, "isPrototypeOf", &[JsValue::Object(child.clone())])
            .unwrap(),
        JsValue::Boolean(true)
    );
    assert_eq!(
        child.call_member(&mut rt, "isPrototypeOf", &[JsValue::Object(parent)]).unwrap(),
        JsValue::Boolean(false)
    );
    assert_eq!(
        child.call_member(&mut rt, "isPrototypeOf", &[num(1.0)]).unwrap(),
        JsValue::Boolean(false)
    );
}

#[test]
fn test_property_is_enumerable() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    obj.set(&mut rt, "visible", num(1.0), true).unwrap();
    assert_eq!(
        obj.call_member(&mut rt, "propertyIsEnumerable", &[str_val("visible")]).unwrap(),
        JsValue::Boolean(true)
    );
    assert_eq!(
        obj.call_member(&mut rt, "propertyIsEnumerable", &[str_val("toString")]).unwrap(),
        JsValue::Boolean(false)
    );
}

#[test]
fn test_intrinsic_members_are_not_enumerable() {
    let rt = create_test_runtime();
    for (key, desc) in rt.object_prototype().properties() {
        assert!(!desc.is_enumerable(), "{} should not be enumerable", key);
    }
    for (key, desc) in rt.function_prototype().properties() {
        assert!(!desc.is_enumerable(), "{} should not be enumerable", key);
    }
}

#[test]
fn test_to_string_tags() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    let arr = rt.create_array(Vec::new()).unwrap();
    let f = rt.create_native_function("f", 0, |_, _, _| Ok(JsValue::Undefined)).unwrap();

    assert_eq!(obj.call_member(&mut rt, "toString", &[]).unwrap(), str_val("[object Object]"));
    assert_eq!(arr.call_member(&mut rt, "toString", &[]).unwrap(), str_val("[object Array]"));
    assert_eq!(f.call_member(&mut rt, "toString", &[]).unwrap(), str_val("[object Function]"));

    let to_string = obj.get(&mut rt, "toString").unwrap();
    assert_eq!(
        rt.call_function(&to_string, JsValue::Null, &[]).unwrap(),
        str_val("[object Null]")
    );
    assert_eq!(
        rt.call_function(&to_string, num(3.0), &[]).unwrap(),
        str_val("[object Number]")
    );
}

#[test]
fn test_to_locale_string_uses_override() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    let custom = rt.create_native_function("toString", 0, |_, _, _| Ok(JsValue::from("custom"))).unwrap();
    obj.set(&mut rt, "toString", JsValue::Object(custom), true).unwrap();
    assert_eq!(obj.call_member(&mut rt, "toLocaleString", &[]).unwrap(), str_val("custom"));
}

#[test]
fn test_value_of_returns_receiver() {
    let mut rt = create_test_runtime();
    let obj = rt.create_object();
    assert_eq!(
        obj.call_member(&mut rt, "valueOf", &[]).unwrap(),
        JsValue::Object(obj.clone())
    );
}

#[test]
fn test_function_call_forwards_receiver_and_arguments() {
    let mut rt = create_test_runtime();
    let receiver = rt.create_object();
    receiver.set(&mut rt, "base", num(100.0), true).unwrap();
    let sum = rt
        .create_native_function("sum", 2, |rt, this, args| {
            let base = match this.as_object() {
                Some(obj) => obj.get(rt, "base")?.to_number(),
                None => 0.0,
            };
            Ok(JsValue::Number(base + args.iter().map(JsValue::to_number).sum::<f64>()))
        })
        .unwrap();

    let result = sum
        .call_member(
            &mut rt,
            "call",
            &[JsValue::Object(receiver.clone()), num(1.0), num(2.0), num(3.0)],
        )
        .unwrap();
    assert_eq!(result, num(106.0));
}

#[test]
fn test_function_apply_reads_array_like() {
    let mut rt = create_test_runtime();
    let count = rt
        .create_native_function("count", 0, |_, _, args| Ok(JsValue::Number(args.len() as f64)))
        .unwrap();
    let list = rt.create_array(vec![num(1.0), num(2.0), num(3.0)]).unwrap();

    assert_eq!(
        count
            .call_member(&mut rt, "apply", &[JsValue::Null, JsValue::Object(list)])
            .unwrap(),
        num(3.0)
    );
    assert_eq!(
        count.call_member(&mut rt, "apply", &[JsValue::Null]).unwrap(),
        num(0.0)
    );

    let array_like = rt.create_object();
    array_like.set(&mut rt, "length", num(2.0), true).unwrap();
    assert_eq!(
        count
            .call_member(&mut rt, "apply", &[JsValue::Null, JsValue::Object(array_like)])
            .unwrap(),
        num(2.0)
    );

    assert!(is_kind(
        count.call_member(&mut rt, "apply", &[JsValue::Null, num(1.0)]),
        "TypeError"
    ));
}

#[test]
fn test_function_apply_rejects_huge_length() {
    let mut rt = create_test_runtime();
    let count = rt
        .create_native_function("count", 0, |_, _, args| Ok(JsValue::Number(args.len() as f64)))
        .unwrap();
    let array_like = rt.create_object();
    array_like.set(&mut rt, "length", num(4_294_967_295.0), true).unwrap();
    assert!(is_kind(
        count.call_member(&mut rt, "apply", &[JsValue::Null, JsValue::Object(array_like.clone())]),
        "RangeError"
    ));

    array_like.set(&mut rt, "length", num(f64::from(MAX_APPLY_ARGUMENTS)), true).unwrap();
    assert_eq!(
        count
            .call_member(&mut rt, "apply", &[JsValue::Null, JsValue::Object(array_like)])
            .unwrap(),
        num(f64::from(MAX_APPLY_ARGUMENTS))
    );
}

#[test]
fn test_call_on_non_function_is_type_error() {
    let mut rt = create_test_runtime();
    let function_prototype = rt.function_prototype().clone();
    let call = function_prototype.get(&mut rt, "call").unwrap();
    let plain = rt.create_object();
    assert!(is_kind(rt.call_function(&call, JsValue::Object(plain), &[]), "TypeError"));
}
