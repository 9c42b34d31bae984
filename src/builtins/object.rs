//! Object.prototype methods

use crate::binding::MemberDecl;
use crate::error::JsError;
use crate::function::MethodFlags;
use crate::runtime::Runtime;
use crate::value::{JsString, JsValue};

const BUILTIN: MethodFlags = MethodFlags::NULL_AS_UNDEFINED;

pub static OBJECT_PROTOTYPE_MEMBERS: &[MemberDecl] = &[
    MemberDecl::method("hasOwnProperty", object_has_own_property, 1).with_flags(BUILTIN),
    MemberDecl::method("isPrototypeOf", object_is_prototype_of, 1).with_flags(BUILTIN),
    MemberDecl::method("propertyIsEnumerable", object_property_is_enumerable, 1)
        .with_flags(BUILTIN),
    MemberDecl::method("toString", object_to_string, 0).with_flags(BUILTIN),
    MemberDecl::method("toLocaleString", object_to_locale_string, 0).with_flags(BUILTIN),
    MemberDecl::method("valueOf", object_value_of, 0).with_flags(BUILTIN),
];

fn property_name(args: &[JsValue]) -> JsString {
    args.first().cloned().unwrap_or_default().to_js_string()
}

pub fn object_has_own_property(
    _rt: &mut Runtime,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let JsValue::Object(obj) = this else {
        return Ok(JsValue::Boolean(false));
    };
    let name = property_name(args);
    Ok(JsValue::Boolean(obj.has_own_property(name.as_str())))
}

/// Object.prototype.isPrototypeOf
/// True if this object is on the prototype chain of the argument.
pub fn object_is_prototype_of(
    _rt: &mut Runtime,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let (JsValue::Object(this_obj), Some(JsValue::Object(other))) = (&this, args.first()) else {
        return Ok(JsValue::Boolean(false));
    };
    Ok(JsValue::Boolean(this_obj.is_prototype_of(other)))
}

pub fn object_property_is_enumerable(
    _rt: &mut Runtime,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let JsValue::Object(obj) = this else {
        return Ok(JsValue::Boolean(false));
    };
    let name = property_name(args);
    let enumerable = obj
        .get_own_property_descriptor(name.as_str())
        .is_some_and(|desc| desc.is_enumerable());
    Ok(JsValue::Boolean(enumerable))
}

/// Object.prototype.toString
/// Returns "[object Type]" based on the internal class of the value.
pub fn object_to_string(
    _rt: &mut Runtime,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let tag = match &this {
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        JsValue::Boolean(_) => "Boolean",
        JsValue::Number(_) => "Number",
        JsValue::String(_) => "String",
        JsValue::Object(obj) => obj.class_name(),
    };
    Ok(JsValue::from(format!("[object {}]", tag)))
}

/// Object.prototype.toLocaleString()
/// Calls this.toString() so overrides on the receiver are honored.
pub fn object_to_locale_string(
    rt: &mut Runtime,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    match &this {
        JsValue::Object(obj) => obj.call_member(rt, "toString", &[]),
        _ => object_to_string(rt, this, args),
    }
}

pub fn object_value_of(
    _rt: &mut Runtime,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(this)
}
