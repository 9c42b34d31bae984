//! Host bindings.
//!
//! A host type describes what it exposes to scripts with a static table of
//! [`MemberDecl`]s. [`populate`] turns such a table into properties on an
//! object exactly once, at construction time:
//!
//! - methods sharing a name become one [`BoundMethodGroup`]; every overload
//!   must agree on the declared `length` and on the property attributes
//! - properties become accessor pairs whose getter (arity 0) and setter
//!   (arity 1) are bound methods; a property without a setter is read-only
//! - fields become sealed data properties unless declared otherwise
//!
//! Objects populated from the same table end up sharing one schema.
//!
//! ```ignore
//! static MEMBERS: &[MemberDecl] = &[
//!     MemberDecl::method("increment", increment, 0),
//!     MemberDecl::property("count", Some(count), None).enumerable(),
//!     MemberDecl::field("kind", FieldValue::String("counter")),
//! ];
//! ```

use std::any::Any;
use std::rc::Rc;

use crate::error::JsError;
use crate::function::{BinderMethod, BoundMethodGroup, HostFn, JsFunction, MethodFlags};
use crate::object::{AccessorPair, JsObjectRef, PropertyDescriptor, Slot};
use crate::prelude::{FxHashSet, IndexMap, index_map_new};
use crate::runtime::Runtime;
use crate::schema::PropertyAttributes;
use crate::value::{CheapClone, JsValue};

/// Constant value of a field member
#[derive(Debug, Clone, Copy)]
pub enum FieldValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(&'static str),
}

impl FieldValue {
    pub fn to_value(self) -> JsValue {
        match self {
            FieldValue::Undefined => JsValue::Undefined,
            FieldValue::Null => JsValue::Null,
            FieldValue::Boolean(b) => JsValue::Boolean(b),
            FieldValue::Number(n) => JsValue::Number(n),
            FieldValue::String(s) => JsValue::from(s),
        }
    }
}

#[derive(Clone, Copy)]
pub enum MemberKind {
    Method {
        method: BinderMethod,
        /// Script-visible `length`; the largest arity when unset
        length: Option<usize>,
        attributes: PropertyAttributes,
    },
    Property {
        getter: Option<HostFn>,
        setter: Option<HostFn>,
        enumerable: bool,
        configurable: bool,
    },
    Field {
        value: FieldValue,
        attributes: PropertyAttributes,
    },
}

/// One exposed member of a host type
#[derive(Clone, Copy)]
pub struct MemberDecl {
    pub name: &'static str,
    pub kind: MemberKind,
}

impl MemberDecl {
    /// A method overload: non-enumerable, writable, configurable
    pub const fn method(name: &'static str, handler: HostFn, arity: usize) -> Self {
        Self {
            name,
            kind: MemberKind::Method {
                method: BinderMethod::new(handler, arity),
                length: None,
                attributes: PropertyAttributes::NON_ENUMERABLE,
            },
        }
    }

    /// An accessor property: configurable, not enumerable
    pub const fn property(name: &'static str, getter: Option<HostFn>, setter: Option<HostFn>) -> Self {
        Self {
            name,
            kind: MemberKind::Property {
                getter,
                setter,
                enumerable: false,
                configurable: true,
            },
        }
    }

    /// A constant field: sealed
    pub const fn field(name: &'static str, value: FieldValue) -> Self {
        Self {
            name,
            kind: MemberKind::Field {
                value,
                attributes: PropertyAttributes::SEALED,
            },
        }
    }

    pub const fn with_length(mut self, length: usize) -> Self {
        if let MemberKind::Method { length: declared, .. } = &mut self.kind {
            *declared = Some(length);
        }
        self
    }

    pub const fn with_flags(mut self, flags: MethodFlags) -> Self {
        if let MemberKind::Method { method, .. } = &mut self.kind {
            method.flags = flags;
        }
        self
    }

    /// Attributes of a method or field
    pub const fn with_attributes(mut self, attributes: PropertyAttributes) -> Self {
        match &mut self.kind {
            MemberKind::Method { attributes: a, .. } | MemberKind::Field { attributes: a, .. } => {
                *a = attributes;
            }
            MemberKind::Property { .. } => {}
        }
        self
    }

    pub const fn enumerable(mut self) -> Self {
        if let MemberKind::Property { enumerable, .. } = &mut self.kind {
            *enumerable = true;
        }
        self
    }

    pub const fn non_configurable(mut self) -> Self {
        if let MemberKind::Property { configurable, .. } = &mut self.kind {
            *configurable = false;
        }
        self
    }
}

/// A host type that can be wrapped into a script object
pub trait HostBinding: Any {
    /// Reported by `Object.prototype.toString`
    const CLASS_NAME: &'static str;

    fn members() -> &'static [MemberDecl];
}

struct MethodDraft {
    overloads: Vec<BinderMethod>,
    length: Option<usize>,
    attributes: PropertyAttributes,
}

/// Define the declared members on `target`.
///
/// Fails with [`JsError::BindingConfiguration`] when the table is
/// inconsistent or when `target` was already populated.
pub fn populate(rt: &mut Runtime, target: &JsObjectRef, members: &[MemberDecl]) -> Result<(), JsError> {
    if target.borrow().populated {
        return Err(JsError::binding_configuration(format!(
            "{} object has already been populated",
            target.class_name()
        )));
    }

    let mut methods: IndexMap<&'static str, MethodDraft> = index_map_new();
    let mut others: FxHashSet<&'static str> = FxHashSet::default();
    for decl in members {
        match decl.kind {
            MemberKind::Method {
                method,
                length,
                attributes,
            } => {
                if others.contains(decl.name) {
                    return Err(duplicate_member(decl.name));
                }
                match methods.get_mut(decl.name) {
                    Some(draft) => {
                        if draft.length != length {
                            return Err(JsError::binding_configuration(format!(
                                "Inconsistent length values for overloads of '{}'",
                                decl.name
                            )));
                        }
                        if draft.attributes != attributes {
                            return Err(JsError::binding_configuration(format!(
                                "Inconsistent property attributes for overloads of '{}'",
                                decl.name
                            )));
                        }
                        draft.overloads.push(method);
                    }
                    None => {
                        methods.insert(
                            decl.name,
                            MethodDraft {
                                overloads: vec![method],
                                length,
                                attributes,
                            },
                        );
                    }
                }
            }
            MemberKind::Property { .. } | MemberKind::Field { .. } => {
                if methods.contains_key(decl.name) || !others.insert(decl.name) {
                    return Err(duplicate_member(decl.name));
                }
            }
        }
    }

    let method_count = methods.len();
    for (name, draft) in methods {
        let group = BoundMethodGroup::new(rt.intern(name), draft.overloads, draft.length)?;
        let function = rt.create_function_object(JsFunction::MethodGroup(Rc::new(group)))?;
        target.fast_set_property(name, Slot::Value(JsValue::Object(function)), draft.attributes, false)?;
    }

    let mut property_count = 0;
    for decl in members {
        let MemberKind::Property {
            getter,
            setter,
            enumerable,
            configurable,
        } = decl.kind
        else {
            continue;
        };
        let getter = getter
            .map(|handler| bound_function(rt, decl.name, BinderMethod::new(handler, 0)))
            .transpose()?;
        let setter = setter
            .map(|handler| bound_function(rt, decl.name, BinderMethod::new(handler, 1)))
            .transpose()?;
        let mut attributes = PropertyAttributes::SEALED;
        if enumerable {
            attributes = attributes | PropertyAttributes::ENUMERABLE;
        }
        if configurable {
            attributes = attributes | PropertyAttributes::CONFIGURABLE;
        }
        let descriptor = PropertyDescriptor::accessor(getter.clone(), setter.clone(), attributes);
        target.fast_set_property(
            decl.name,
            Slot::Accessor(AccessorPair::new(getter, setter)),
            descriptor.attributes(),
            false,
        )?;
        property_count += 1;
    }

    let mut field_count = 0;
    for decl in members {
        if let MemberKind::Field { value, attributes } = decl.kind {
            target.fast_set_property(decl.name, Slot::Value(value.to_value()), attributes, false)?;
            field_count += 1;
        }
    }

    target.borrow_mut().populated = true;
    log::debug!(
        "populated {} object: {} methods, {} properties, {} fields",
        target.class_name(),
        method_count,
        property_count,
        field_count
    );
    Ok(())
}

fn bound_function(rt: &mut Runtime, name: &str, method: BinderMethod) -> Result<JsObjectRef, JsError> {
    let group = BoundMethodGroup::new(rt.intern(name), vec![method], None)?;
    rt.create_function_object(JsFunction::MethodGroup(Rc::new(group)))
}

fn duplicate_member(name: &str) -> JsError {
    JsError::binding_configuration(format!("Member '{}' is declared more than once", name))
}

/// Recover the host value behind `this` inside a member handler
pub fn this_host<T: HostBinding>(this: &JsValue) -> Result<Rc<T>, JsError> {
    this.as_object()
        .and_then(|object| object.host_data::<T>())
        .ok_or_else(|| {
            JsError::type_error(format!(
                "The method must be called on a {} object",
                T::CLASS_NAME
            ))
        })
}

/// Create a script object around `value` and populate it from `T`'s table
pub fn wrap_host<T: HostBinding>(rt: &mut Runtime, value: T) -> Result<JsObjectRef, JsError> {
    let prototype = rt.object_prototype().cheap_clone();
    let object = rt.create_object_with_kind(
        Some(prototype),
        crate::object::ObjectKind::Host {
            class_name: T::CLASS_NAME,
            data: Rc::new(value),
        },
    );
    populate(rt, &object, T::members())?;
    Ok(object)
}
