//! Function.prototype methods (call, apply)

use crate::binding::MemberDecl;
use crate::error::JsError;
use crate::function::MethodFlags;
use crate::runtime::Runtime;
use crate::value::{JsValue, to_uint32};

/// Upper bound on the number of arguments `apply` will unpack
pub const MAX_APPLY_ARGUMENTS: u32 = 65_536;

pub static FUNCTION_PROTOTYPE_MEMBERS: &[MemberDecl] = &[
    MemberDecl::method("call", function_call, 1)
        .with_flags(MethodFlags::VARIADIC.union(MethodFlags::NULL_AS_UNDEFINED)),
    MemberDecl::method("apply", function_apply, 2).with_flags(MethodFlags::NULL_AS_UNDEFINED),
];

// Function.prototype.call - `this` is the function, args[0] the receiver
pub fn function_call(
    rt: &mut Runtime,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let this_arg = args.first().cloned().unwrap_or_default();
    let call_args: Vec<JsValue> = args.iter().skip(1).cloned().collect();
    rt.call_function(&this, this_arg, &call_args)
}

// Function.prototype.apply - arguments come from an array-like object
pub fn function_apply(
    rt: &mut Runtime,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let this_arg = args.first().cloned().unwrap_or_default();
    let call_args = match args.get(1) {
        Some(JsValue::Object(list)) => {
            let length = to_uint32(list.get(rt, "length")?.to_number());
            if length > MAX_APPLY_ARGUMENTS {
                return Err(JsError::range_error("Too many arguments in function call"));
            }
            let mut values = Vec::with_capacity(length as usize);
            for index in 0..length {
                values.push(list.get_index(rt, index)?);
            }
            values
        }
        None | Some(JsValue::Undefined) | Some(JsValue::Null) => Vec::new(),
        Some(_) => {
            return Err(JsError::type_error(
                "The second parameter of apply() must be an array or an array-like object.",
            ));
        }
    };
    rt.call_function(&this, this_arg, &call_args)
}
