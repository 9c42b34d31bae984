//! Arguments objects.
//!
//! In sloppy mode each index below the parameter count is an accessor pair
//! whose getter and setter read and write the parameter's binding in the
//! call's [`DeclarativeScope`], so `arguments[i]` and the named parameter
//! alias each other. A repeated parameter name keeps only its last
//! occurrence linked; earlier indices hold the value that was passed.
//! Deleting a linked index freezes the current value into a plain data
//! property.
//!
//! Strict mode copies the values and guards `caller`/`callee` with
//! accessors that always fail.

use std::fmt;

use crate::error::JsError;
use crate::function::JsFunction;
use crate::object::{JsObjectRef, ObjectKind, PropertyDescriptor, Slot};
use crate::prelude::FxHashMap;
use crate::runtime::Runtime;
use crate::schema::PropertyAttributes;
use crate::scope::DeclarativeScope;
use crate::value::{CheapClone, JsString, JsValue};

/// Per-object linkage state
pub struct ArgumentsData {
    scope: DeclarativeScope,
    parameter_names: Vec<JsString>,
    /// `mapped[i]` is true while index `i` aliases its parameter
    mapped: Vec<bool>,
}

impl ArgumentsData {
    pub fn is_mapped(&self, index: u32) -> bool {
        self.mapped.get(index as usize).copied().unwrap_or(false)
    }

    /// Drop the link for `index` without reading the parameter
    pub(crate) fn release(&mut self, index: u32) {
        if let Some(linked) = self.mapped.get_mut(index as usize) {
            *linked = false;
        }
    }

    /// Sever index `index`, returning the parameter's current value if it was linked
    pub(crate) fn unmap(&mut self, index: u32) -> Option<JsValue> {
        let linked = self.mapped.get_mut(index as usize)?;
        if !*linked {
            return None;
        }
        *linked = false;
        let name = self.parameter_names.get(index as usize)?;
        Some(self.scope.get(name.as_str()).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorRole {
    Get,
    Set,
}

/// Body of the getter or setter behind one mapped index
#[derive(Clone)]
pub struct ArgumentAccessor {
    scope: DeclarativeScope,
    name: JsString,
    role: AccessorRole,
}

impl ArgumentAccessor {
    pub fn arity(&self) -> usize {
        match self.role {
            AccessorRole::Get => 0,
            AccessorRole::Set => 1,
        }
    }

    pub(crate) fn invoke(&self, args: &[JsValue]) -> Result<JsValue, JsError> {
        match self.role {
            AccessorRole::Get => Ok(self.scope.get(self.name.as_str()).unwrap_or_default()),
            AccessorRole::Set => {
                if let Some(value) = args.first() {
                    self.scope.set(self.name.as_str(), value.clone())?;
                }
                Ok(JsValue::Undefined)
            }
        }
    }
}

impl fmt::Debug for ArgumentAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgumentAccessor({:?}, {})", self.role, self.name)
    }
}

/// Create the arguments object for one call.
///
/// `scope` must already hold the parameter bindings (see
/// [`DeclarativeScope::for_parameters`]).
pub fn create_arguments_object(
    rt: &mut Runtime,
    callee: &JsObjectRef,
    parameter_names: &[JsString],
    scope: &DeclarativeScope,
    values: &[JsValue],
    strict: bool,
) -> Result<JsObjectRef, JsError> {
    let data = ArgumentsData {
        scope: scope.cheap_clone(),
        parameter_names: parameter_names.to_vec(),
        mapped: vec![false; values.len()],
    };
    let prototype = rt.object_prototype().cheap_clone();
    let arguments = rt.create_object_with_kind(Some(prototype), ObjectKind::Arguments(data));

    let length = rt.intern("length");
    arguments.fast_set_property(
        length.as_str(),
        Slot::Value(JsValue::Number(values.len() as f64)),
        PropertyAttributes::NON_ENUMERABLE,
        false,
    )?;

    if strict {
        for (i, value) in values.iter().enumerate() {
            define_plain(&arguments, i, value.clone())?;
        }
        for name in ["caller", "callee"] {
            let name = rt.intern(name);
            let thrower = rt.create_function_object(JsFunction::ThrowTypeError(name.cheap_clone()))?;
            arguments.define_property(
                name.as_str(),
                PropertyDescriptor::accessor(
                    Some(thrower.cheap_clone()),
                    Some(thrower),
                    PropertyAttributes::SEALED,
                ),
                false,
            )?;
        }
        log::debug!("created strict arguments object with {} values", values.len());
        return Ok(arguments);
    }

    let callee_name = rt.intern("callee");
    arguments.fast_set_property(
        callee_name.as_str(),
        Slot::Value(JsValue::Object(callee.cheap_clone())),
        PropertyAttributes::NON_ENUMERABLE,
        false,
    )?;

    let mut linked_names: FxHashMap<JsString, usize> = FxHashMap::default();
    for (i, value) in values.iter().enumerate() {
        let Some(name) = parameter_names.get(i) else {
            define_plain(&arguments, i, value.clone())?;
            continue;
        };

        if let Some(previous) = linked_names.insert(name.cheap_clone(), i) {
            let frozen = values.get(previous).cloned().unwrap_or_default();
            define_plain(&arguments, previous, frozen)?;
            set_mapped(&arguments, previous, false);
        }

        let getter = rt.create_function_object(JsFunction::ArgumentAccessor(ArgumentAccessor {
            scope: scope.cheap_clone(),
            name: name.cheap_clone(),
            role: AccessorRole::Get,
        }))?;
        let setter = rt.create_function_object(JsFunction::ArgumentAccessor(ArgumentAccessor {
            scope: scope.cheap_clone(),
            name: name.cheap_clone(),
            role: AccessorRole::Set,
        }))?;
        arguments.define_property(
            &i.to_string(),
            PropertyDescriptor::accessor(Some(getter), Some(setter), PropertyAttributes::FULL_ACCESS),
            false,
        )?;
        set_mapped(&arguments, i, true);
    }

    log::debug!(
        "created arguments object with {} values, {} linked",
        values.len(),
        linked_names.len()
    );
    Ok(arguments)
}

fn define_plain(arguments: &JsObjectRef, index: usize, value: JsValue) -> Result<bool, JsError> {
    arguments.define_property(
        &index.to_string(),
        PropertyDescriptor::data(value, PropertyAttributes::FULL_ACCESS),
        false,
    )
}

fn set_mapped(arguments: &JsObjectRef, index: usize, linked: bool) {
    if let ObjectKind::Arguments(data) = &mut arguments.borrow_mut().kind
        && let Some(flag) = data.mapped.get_mut(index)
    {
        *flag = linked;
    }
}
