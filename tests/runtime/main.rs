//! Integration tests for the object model, organized by feature
//!
//! Everything here goes through the public API the way a host embedding the
//! runtime would.

mod arguments;
mod builtins;
mod extensible;
mod object;

use std::cell::RefCell;
use std::rc::Rc;

use barista::{JsError, JsObjectRef, JsValue, PropertyAttributes, PropertyDescriptor, Runtime};

/// Create a runtime with default configuration
#[allow(clippy::expect_used)]
pub fn create_test_runtime() -> Runtime {
    Runtime::new().expect("runtime construction failed")
}

pub fn num(n: f64) -> JsValue {
    JsValue::Number(n)
}

pub fn str_val(s: &str) -> JsValue {
    JsValue::from(s)
}

/// Calls observed by a recording setter: `(this, value)`
pub type SetterLog = Rc<RefCell<Vec<(JsValue, JsValue)>>>;

/// Define `name` on `target` as an accessor whose getter returns `this.tag`
/// and whose setter records every call in the returned log
#[allow(clippy::expect_used)]
pub fn define_recording_accessor(rt: &mut Runtime, target: &JsObjectRef, name: &str) -> SetterLog {
    let log: SetterLog = Rc::new(RefCell::new(Vec::new()));
    let getter = rt
        .create_native_function("get", 0, |rt, this, _args| match this {
            JsValue::Object(obj) => obj.get(rt, "tag"),
            _ => Ok(JsValue::Undefined),
        })
        .expect("getter");
    let recorded = log.clone();
    let setter = rt
        .create_native_function("set", 1, move |_rt, this, args| {
            let value = args.first().cloned().unwrap_or_default();
            recorded.borrow_mut().push((this, value));
            Ok(JsValue::Undefined)
        })
        .expect("setter");
    target
        .define_property(
            name,
            PropertyDescriptor::accessor(Some(getter), Some(setter), PropertyAttributes::FULL_ACCESS),
            true,
        )
        .expect("define accessor");
    log
}

/// Check that an error is of the given script-visible kind
pub fn is_kind(result: Result<impl std::fmt::Debug, JsError>, kind: &str) -> bool {
    match result {
        Err(e) => e.kind() == kind,
        Ok(_) => false,
    }
}
