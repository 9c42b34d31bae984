//! Script-visible objects.
//!
//! # Storage model
//!
//! A [`JsObject`] splits its properties in two: the *shape* (names, slot
//! indices, attribute bits) lives in a shared [`SchemaRef`], and the *values*
//! live in the object's own `slots` vector at the indices the schema assigns.
//! Slots hold either a plain value or a getter/setter pair. The `length` of an
//! array-like object has a schema entry flagged [`PropertyAttributes::IS_LENGTH`]
//! and is computed from the object's array state instead of being stored.
//!
//! # Prototype chain
//!
//! The prototype link is fixed when the object is created, so a chain can
//! only ever point at objects that already existed and cannot loop.
//! Lookups walk it iteratively and always pass the original receiver along,
//! which is what getters and setters see as `this`.
//!
//! # Reentrancy
//!
//! Getters and setters run arbitrary code that may touch the object being
//! accessed. No `RefCell` borrow is held while one runs: every operation copies
//! what it needs out of the object, releases the borrow, then calls out.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::arguments::ArgumentsData;
use crate::error::JsError;
use crate::function::JsFunction;
use crate::runtime::Runtime;
use crate::schema::{PropertyAttributes, SchemaRef, SlotInfo};
use crate::value::{CheapClone, JsString, JsValue, parse_array_index, to_uint32};

/// Contents of one value slot
#[derive(Clone, Default)]
pub enum Slot {
    /// Deleted, or the synthesized `length` slot
    #[default]
    Empty,
    Value(JsValue),
    Accessor(AccessorPair),
}

/// Getter and setter of an accessor property; either half may be absent
#[derive(Clone, Default)]
pub struct AccessorPair {
    pub getter: Option<JsObjectRef>,
    pub setter: Option<JsObjectRef>,
}

impl AccessorPair {
    pub fn new(getter: Option<JsObjectRef>, setter: Option<JsObjectRef>) -> Self {
        Self { getter, setter }
    }

    /// Run the getter with `this` bound to `receiver`; no getter reads as undefined
    pub fn get(&self, rt: &mut Runtime, receiver: &JsObjectRef) -> Result<JsValue, JsError> {
        match &self.getter {
            Some(getter) => rt.call(getter, JsValue::Object(receiver.cheap_clone()), &[]),
            None => Ok(JsValue::Undefined),
        }
    }

    /// Run the setter with `this` bound to `receiver`.
    ///
    /// A missing setter is the ordinary read-only condition.
    pub fn set(
        &self,
        rt: &mut Runtime,
        receiver: &JsObjectRef,
        name: &str,
        value: JsValue,
        throw_on_error: bool,
    ) -> Result<(), JsError> {
        match &self.setter {
            Some(setter) => {
                rt.call(setter, JsValue::Object(receiver.cheap_clone()), &[value])?;
                Ok(())
            }
            None if throw_on_error => Err(JsError::read_only(name)),
            None => Ok(()),
        }
    }

    fn same_functions(&self, other: &AccessorPair) -> bool {
        fn same(a: &Option<JsObjectRef>, b: &Option<JsObjectRef>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a.ptr_eq(b),
                (None, None) => true,
                _ => false,
            }
        }
        same(&self.getter, &other.getter) && same(&self.setter, &other.setter)
    }
}

#[derive(Clone)]
enum DescriptorKind {
    Data(JsValue),
    Accessor(AccessorPair),
}

/// A property's value (or accessor pair) together with its attributes
#[derive(Clone)]
pub struct PropertyDescriptor {
    kind: DescriptorKind,
    attributes: PropertyAttributes,
}

impl PropertyDescriptor {
    /// A data property. Accessor and length bits in `attributes` are ignored.
    pub fn data(value: JsValue, attributes: PropertyAttributes) -> Self {
        Self {
            kind: DescriptorKind::Data(value),
            attributes: attributes
                .without(PropertyAttributes::IS_ACCESSOR | PropertyAttributes::IS_LENGTH),
        }
    }

    /// An accessor property. It is writable exactly when it has a setter.
    pub fn accessor(
        getter: Option<JsObjectRef>,
        setter: Option<JsObjectRef>,
        attributes: PropertyAttributes,
    ) -> Self {
        let mut attributes = attributes
            .without(PropertyAttributes::WRITABLE | PropertyAttributes::IS_LENGTH)
            | PropertyAttributes::IS_ACCESSOR;
        if setter.is_some() {
            attributes = attributes | PropertyAttributes::WRITABLE;
        }
        Self {
            kind: DescriptorKind::Accessor(AccessorPair::new(getter, setter)),
            attributes,
        }
    }

    pub fn attributes(&self) -> PropertyAttributes {
        self.attributes
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, DescriptorKind::Accessor(_))
    }

    pub fn is_writable(&self) -> bool {
        self.attributes.is_writable()
    }

    pub fn is_enumerable(&self) -> bool {
        self.attributes.is_enumerable()
    }

    pub fn is_configurable(&self) -> bool {
        self.attributes.is_configurable()
    }

    /// The stored value of a data property
    pub fn value(&self) -> Option<&JsValue> {
        match &self.kind {
            DescriptorKind::Data(value) => Some(value),
            DescriptorKind::Accessor(_) => None,
        }
    }

    pub fn getter(&self) -> Option<&JsObjectRef> {
        match &self.kind {
            DescriptorKind::Accessor(pair) => pair.getter.as_ref(),
            DescriptorKind::Data(_) => None,
        }
    }

    pub fn setter(&self) -> Option<&JsObjectRef> {
        match &self.kind {
            DescriptorKind::Accessor(pair) => pair.setter.as_ref(),
            DescriptorKind::Data(_) => None,
        }
    }

    fn into_slot(self) -> Slot {
        match self.kind {
            DescriptorKind::Data(value) => Slot::Value(value),
            DescriptorKind::Accessor(pair) => Slot::Accessor(pair),
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("PropertyDescriptor");
        match &self.kind {
            DescriptorKind::Data(value) => s.field("value", value),
            DescriptorKind::Accessor(pair) => s
                .field("get", &pair.getter.is_some())
                .field("set", &pair.setter.is_some()),
        };
        s.field("attributes", &self.attributes).finish()
    }
}

/// Synthesizes values for properties found nowhere on a prototype chain.
///
/// Attach one with [`JsObjectRef::set_missing_property_hook`]. A lookup that
/// misses consults the first hook found walking from the receiver through
/// its prototypes.
pub trait MissingPropertyHook {
    fn missing_property(
        &self,
        rt: &mut Runtime,
        receiver: &JsObjectRef,
        name: &str,
    ) -> Result<JsValue, JsError> {
        let _ = (rt, receiver, name);
        Ok(JsValue::Undefined)
    }
}

/// Exotic object behavior
pub enum ObjectKind {
    Ordinary,
    /// Array-like object whose `length` property is synthesized
    Array { length: u32 },
    Function(JsFunction),
    Arguments(ArgumentsData),
    /// Wrapper around a host value exposed through the binding layer
    Host {
        class_name: &'static str,
        data: Rc<dyn Any>,
    },
}

/// Hint for [`JsObjectRef::to_primitive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveHint {
    Default,
    Number,
    String,
}

/// A JavaScript object
pub struct JsObject {
    pub(crate) prototype: Option<JsObjectRef>,
    pub(crate) schema: SchemaRef,
    pub(crate) slots: Vec<Slot>,
    pub(crate) extensible: bool,
    /// Set once the binding layer has populated this object
    pub(crate) populated: bool,
    pub(crate) kind: ObjectKind,
    pub(crate) missing_property_hook: Option<Rc<dyn MissingPropertyHook>>,
}

impl JsObject {
    pub(crate) fn new(prototype: Option<JsObjectRef>, schema: SchemaRef, kind: ObjectKind) -> Self {
        Self {
            prototype,
            schema,
            slots: Vec::new(),
            extensible: true,
            populated: false,
            kind,
            missing_property_hook: None,
        }
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn prototype(&self) -> Option<&JsObjectRef> {
        self.prototype.as_ref()
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    /// Internal class name used by `Object.prototype.toString`
    pub fn class_name(&self) -> &'static str {
        match &self.kind {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array { .. } => "Array",
            ObjectKind::Function(_) => "Function",
            ObjectKind::Arguments(_) => "Arguments",
            ObjectKind::Host { class_name, .. } => class_name,
        }
    }

    pub(crate) fn array_length(&self) -> Option<u32> {
        match self.kind {
            ObjectKind::Array { length } => Some(length),
            _ => None,
        }
    }

    fn read_slot(&self, info: SlotInfo) -> SlotRead {
        if info.is_length() {
            return SlotRead::Length(self.array_length().unwrap_or(0));
        }
        match self.slots.get(info.index) {
            Some(Slot::Value(value)) => SlotRead::Value(value.clone()),
            Some(Slot::Accessor(pair)) => SlotRead::Accessor(pair.clone()),
            Some(Slot::Empty) | None => SlotRead::Value(JsValue::Undefined),
        }
    }

    pub(crate) fn slot_value(&self, index: usize) -> Option<JsValue> {
        match self.slots.get(index) {
            Some(Slot::Value(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub(crate) fn write_slot(&mut self, index: usize, slot: Slot) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, Slot::default);
        }
        if let Some(target) = self.slots.get_mut(index) {
            *target = slot;
        }
    }

    fn accessor_at(&self, info: SlotInfo) -> Option<AccessorPair> {
        if !info.is_accessor() {
            return None;
        }
        match self.slots.get(info.index) {
            Some(Slot::Accessor(pair)) => Some(pair.clone()),
            _ => Some(AccessorPair::default()),
        }
    }

    fn descriptor_at(&self, info: SlotInfo) -> PropertyDescriptor {
        let kind = match self.read_slot(info) {
            SlotRead::Value(value) => DescriptorKind::Data(value),
            SlotRead::Length(length) => DescriptorKind::Data(JsValue::Number(length as f64)),
            SlotRead::Accessor(pair) => DescriptorKind::Accessor(pair),
        };
        PropertyDescriptor {
            kind,
            attributes: info.attributes,
        }
    }
}

enum SlotRead {
    Value(JsValue),
    Accessor(AccessorPair),
    Length(u32),
}

impl SlotRead {
    fn resolve(self, rt: &mut Runtime, receiver: &JsObjectRef) -> Result<JsValue, JsError> {
        match self {
            SlotRead::Value(value) => Ok(value),
            SlotRead::Length(length) => Ok(JsValue::Number(length as f64)),
            SlotRead::Accessor(pair) => pair.get(rt, receiver),
        }
    }
}

/// Shared handle to a [`JsObject`]
#[derive(Clone)]
pub struct JsObjectRef(Rc<RefCell<JsObject>>);

impl CheapClone for JsObjectRef {}

impl JsObjectRef {
    pub(crate) fn new(object: JsObject) -> Self {
        JsObjectRef(Rc::new(RefCell::new(object)))
    }

    pub fn borrow(&self) -> Ref<'_, JsObject> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, JsObject> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &JsObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn prototype(&self) -> Option<JsObjectRef> {
        self.borrow().prototype.clone()
    }

    /// The current schema; also the inline cache key
    pub fn schema(&self) -> SchemaRef {
        self.borrow().schema.cheap_clone()
    }

    pub fn is_callable(&self) -> bool {
        self.borrow().is_callable()
    }

    pub fn class_name(&self) -> &'static str {
        self.borrow().class_name()
    }

    /// `length` of an array-like object, `None` for other objects
    pub fn array_length(&self) -> Option<u32> {
        self.borrow().array_length()
    }

    /// The host value behind an object created by `Runtime::wrap_host`
    pub fn host_data<T: Any>(&self) -> Option<Rc<T>> {
        match &self.borrow().kind {
            ObjectKind::Host { data, .. } => Rc::clone(data).downcast::<T>().ok(),
            _ => None,
        }
    }

    pub fn set_missing_property_hook(&self, hook: Rc<dyn MissingPropertyHook>) {
        self.borrow_mut().missing_property_hook = Some(hook);
    }

    // ── Extensibility ─────────────────────────────────────────────────────────

    pub fn is_extensible(&self) -> bool {
        self.borrow().extensible
    }

    /// Update the extensible flag.
    ///
    /// The flag only ever goes from `true` to `false`; asking to turn it back
    /// on is a contract violation reported as [`JsError::InvalidState`].
    pub fn set_extensible(&self, extensible: bool) -> Result<(), JsError> {
        if !extensible {
            self.prevent_extensions();
        } else if !self.is_extensible() {
            return Err(JsError::invalid_state(
                "Once an object has been made non-extensible it cannot be made extensible again.",
            ));
        }
        Ok(())
    }

    pub fn prevent_extensions(&self) {
        let mut object = self.borrow_mut();
        if object.extensible {
            log::debug!("object {:#x} made non-extensible", self.addr());
        }
        object.extensible = false;
    }

    // ── Get ───────────────────────────────────────────────────────────────────

    /// Read a property, walking the prototype chain.
    ///
    /// Array indices take the same path under their canonical string form.
    /// A miss on the whole chain goes to the missing-property hook, which by
    /// default yields `undefined`.
    pub fn get(&self, rt: &mut Runtime, name: &str) -> Result<JsValue, JsError> {
        self.get_with_receiver(rt, name, self)
    }

    pub fn get_index(&self, rt: &mut Runtime, index: u32) -> Result<JsValue, JsError> {
        self.get(rt, &index.to_string())
    }

    /// Named lookup starting at `self` with `receiver` as `this` for getters
    pub(crate) fn get_with_receiver(
        &self,
        rt: &mut Runtime,
        name: &str,
        receiver: &JsObjectRef,
    ) -> Result<JsValue, JsError> {
        let mut current = Some(self.cheap_clone());
        while let Some(object) = current {
            let (read, next) = {
                let borrowed = object.borrow();
                let read = borrowed
                    .schema
                    .get_property_index_and_attributes(name)
                    .map(|info| borrowed.read_slot(info));
                (read, borrowed.prototype.clone())
            };
            if let Some(read) = read {
                return read.resolve(rt, receiver);
            }
            current = next;
        }
        receiver.missing_property(rt, name)
    }

    pub(crate) fn missing_property(&self, rt: &mut Runtime, name: &str) -> Result<JsValue, JsError> {
        let mut current = Some(self.cheap_clone());
        while let Some(object) = current {
            let (hook, next) = {
                let borrowed = object.borrow();
                (borrowed.missing_property_hook.clone(), borrowed.prototype.clone())
            };
            if let Some(hook) = hook {
                return hook.missing_property(rt, self, name);
            }
            current = next;
        }
        Ok(JsValue::Undefined)
    }

    // ── Set ───────────────────────────────────────────────────────────────────

    /// Write a property, creating an own data property when nothing on the
    /// chain takes the write.
    pub fn set(
        &self,
        rt: &mut Runtime,
        name: &str,
        value: JsValue,
        throw_on_error: bool,
    ) -> Result<(), JsError> {
        if !self.set_if_exists(rt, name, value.clone(), throw_on_error)? {
            self.add_property(name, Slot::Value(value), PropertyAttributes::FULL_ACCESS, throw_on_error)?;
        }
        Ok(())
    }

    pub fn set_index(
        &self,
        rt: &mut Runtime,
        index: u32,
        value: JsValue,
        throw_on_error: bool,
    ) -> Result<(), JsError> {
        self.set(rt, &index.to_string(), value, throw_on_error)
    }

    /// Write a property only if it exists somewhere on the chain.
    ///
    /// Returns whether the property existed, independent of whether the write
    /// took effect. Own properties are written directly (or through their
    /// setter). On the prototype chain only accessors intercept the write; a
    /// plain data property found there is shadowed by a new own property.
    pub fn set_if_exists(
        &self,
        rt: &mut Runtime,
        name: &str,
        value: JsValue,
        throw_on_error: bool,
    ) -> Result<bool, JsError> {
        let own = {
            let borrowed = self.borrow();
            borrowed
                .schema
                .get_property_index_and_attributes(name)
                .map(|info| (info, borrowed.accessor_at(info)))
        };

        if let Some((info, accessor)) = own {
            if !info.is_writable() {
                if throw_on_error {
                    return Err(JsError::read_only(name));
                }
                return Ok(true);
            }
            if let Some(pair) = accessor {
                pair.set(rt, self, name, value, throw_on_error)?;
            } else if info.is_length() {
                self.set_array_length(value)?;
            } else {
                self.borrow_mut().write_slot(info.index, Slot::Value(value));
            }
            return Ok(true);
        }

        let mut current = self.prototype();
        while let Some(prototype) = current {
            let (found, next) = {
                let borrowed = prototype.borrow();
                let found = borrowed
                    .schema
                    .get_property_index_and_attributes(name)
                    .map(|info| borrowed.accessor_at(info));
                (found, borrowed.prototype.clone())
            };
            match found {
                Some(Some(pair)) => {
                    pair.set(rt, self, name, value, throw_on_error)?;
                    return Ok(true);
                }
                Some(None) => {
                    self.add_property(
                        name,
                        Slot::Value(value),
                        PropertyAttributes::FULL_ACCESS,
                        throw_on_error,
                    )?;
                    return Ok(true);
                }
                None => current = next,
            }
        }
        Ok(false)
    }

    /// Add an own property that is known not to exist yet.
    ///
    /// Fails per `throw_on_error` when the object is non-extensible.
    pub(crate) fn add_property(
        &self,
        name: &str,
        slot: Slot,
        attributes: PropertyAttributes,
        throw_on_error: bool,
    ) -> Result<bool, JsError> {
        let mut object = self.borrow_mut();
        if !object.extensible {
            if throw_on_error {
                return Err(JsError::not_extensible(name));
            }
            return Ok(false);
        }
        let schema = object.schema.add_property(&JsString::from(name), attributes)?;
        let index = schema.next_slot_index().saturating_sub(1);
        object.schema = schema;
        object.write_slot(index, slot);

        if let Some(array_index) = parse_array_index(name)
            && let ObjectKind::Array { length } = &mut object.kind
            && array_index >= *length
        {
            *length = array_index + 1;
        }
        Ok(true)
    }

    /// Constructor-time write used by the binding layer and intrinsic setup.
    ///
    /// Adds the property if missing; otherwise replaces the slot, and the
    /// attributes too when `overwrite_attributes` is set.
    pub(crate) fn fast_set_property(
        &self,
        name: &str,
        slot: Slot,
        attributes: PropertyAttributes,
        overwrite_attributes: bool,
    ) -> Result<(), JsError> {
        let existing = self.borrow().schema.get_property_index(name);
        match existing {
            None => {
                self.add_property(name, slot, attributes, false)?;
            }
            Some(index) => {
                self.release_argument_mapping(name);
                let mut object = self.borrow_mut();
                if overwrite_attributes {
                    object.schema = object.schema.set_property_attributes(name, attributes)?;
                }
                object.write_slot(index, slot);
            }
        }
        Ok(())
    }

    /// Assign the synthesized `length` of an array-like object
    fn set_array_length(&self, value: JsValue) -> Result<(), JsError> {
        let number = value.to_number();
        let new_length = to_uint32(number);
        if number.is_nan() || number != new_length as f64 {
            return Err(JsError::range_error("Invalid array length"));
        }
        let Some(old_length) = self.array_length() else {
            return Err(JsError::type_error("length is not an array length"));
        };
        if new_length < old_length {
            let truncated: Vec<JsString> = self
                .borrow()
                .schema
                .keys()
                .filter(|key| parse_array_index(key.as_str()).is_some_and(|i| i >= new_length))
                .cloned()
                .collect();
            for key in truncated {
                self.delete(key.as_str(), false)?;
            }
        }
        if let ObjectKind::Array { length } = &mut self.borrow_mut().kind {
            *length = new_length;
        }
        Ok(())
    }

    // ── Delete ────────────────────────────────────────────────────────────────

    /// Delete an own property.
    ///
    /// Returns `true` if the property is now absent (including when it never
    /// existed) and `false` for a non-configurable property when not
    /// throwing.
    pub fn delete(&self, name: &str, throw_on_error: bool) -> Result<bool, JsError> {
        if let Some(index) = parse_array_index(name)
            && self.sever_argument_mapping(index)?
        {
            return Ok(true);
        }

        let mut object = self.borrow_mut();
        let Some(info) = object.schema.get_property_index_and_attributes(name) else {
            return Ok(true);
        };
        if !info.is_configurable() {
            if throw_on_error {
                return Err(JsError::non_configurable(name));
            }
            return Ok(false);
        }
        let schema = object.schema.delete_property(name);
        object.write_slot(info.index, Slot::Empty);
        let live_slots = schema.next_slot_index();
        if live_slots < object.slots.len() {
            object.slots.truncate(live_slots);
        }
        object.schema = schema;
        Ok(true)
    }

    pub fn delete_index(&self, index: u32, throw_on_error: bool) -> Result<bool, JsError> {
        self.delete(&index.to_string(), throw_on_error)
    }

    /// Break the link between a mapped arguments index and its parameter,
    /// freezing the parameter's current value into a plain data property.
    fn sever_argument_mapping(&self, index: u32) -> Result<bool, JsError> {
        let frozen = match &mut self.borrow_mut().kind {
            ObjectKind::Arguments(data) => data.unmap(index),
            _ => None,
        };
        match frozen {
            Some(value) => self.define_property(
                &index.to_string(),
                PropertyDescriptor::data(value, PropertyAttributes::FULL_ACCESS),
                false,
            ),
            None => Ok(false),
        }
    }

    /// A redefined arguments index no longer aliases its parameter
    fn release_argument_mapping(&self, name: &str) {
        if let Some(index) = parse_array_index(name)
            && let ObjectKind::Arguments(data) = &mut self.borrow_mut().kind
        {
            data.release(index);
        }
    }

    // ── Define ────────────────────────────────────────────────────────────────

    /// Define or redefine an own property.
    ///
    /// A non-configurable property only accepts a descriptor with identical
    /// attributes, and then either the same accessor functions or (for
    /// writable data) a new value.
    pub fn define_property(
        &self,
        name: &str,
        descriptor: PropertyDescriptor,
        throw_on_error: bool,
    ) -> Result<bool, JsError> {
        let current = {
            let borrowed = self.borrow();
            borrowed
                .schema
                .get_property_index_and_attributes(name)
                .map(|info| (info, borrowed.read_slot(info)))
        };
        let Some((info, current_value)) = current else {
            let attributes = descriptor.attributes;
            return self.add_property(name, descriptor.into_slot(), attributes, throw_on_error);
        };

        if !info.is_configurable() {
            let allowed = if info.is_length() {
                descriptor.attributes == info.attributes.without(PropertyAttributes::IS_LENGTH)
                    && !descriptor.is_accessor()
            } else {
                descriptor.attributes == info.attributes
                    && match (&descriptor.kind, &current_value) {
                        (DescriptorKind::Accessor(new), SlotRead::Accessor(old)) => {
                            new.same_functions(old)
                        }
                        (DescriptorKind::Data(new), SlotRead::Value(old)) => {
                            info.is_writable() || new.same_value(old)
                        }
                        _ => false,
                    }
            };
            if !allowed {
                if throw_on_error {
                    return Err(JsError::non_configurable(name));
                }
                return Ok(false);
            }
        }

        if info.is_length() {
            if let DescriptorKind::Data(value) = descriptor.kind {
                self.set_array_length(value)?;
            }
            return Ok(true);
        }

        self.release_argument_mapping(name);
        let mut object = self.borrow_mut();
        object.schema = object
            .schema
            .set_property_attributes(name, descriptor.attributes)?;
        object.write_slot(info.index, descriptor.into_slot());
        Ok(true)
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    /// Own property descriptor; the prototype chain is not searched
    pub fn get_own_property_descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        let borrowed = self.borrow();
        borrowed
            .schema
            .get_property_index_and_attributes(name)
            .map(|info| borrowed.descriptor_at(info))
    }

    pub fn has_own_property(&self, name: &str) -> bool {
        self.borrow().schema.contains(name)
    }

    /// Whether `name` exists on this object or its prototype chain.
    ///
    /// Existence is decided by the schemas alone: a property holding
    /// `undefined` exists, and missing-property hooks are not consulted.
    pub fn has_property(&self, name: &str) -> bool {
        let mut current = Some(self.cheap_clone());
        while let Some(object) = current {
            let next = {
                let borrowed = object.borrow();
                if borrowed.schema.contains(name) {
                    return true;
                }
                borrowed.prototype.clone()
            };
            current = next;
        }
        false
    }

    /// Own property names in insertion order
    pub fn own_keys(&self) -> Vec<JsString> {
        self.borrow().schema.keys().cloned().collect()
    }

    /// Own properties with their descriptors, in insertion order
    pub fn properties(&self) -> Vec<(JsString, PropertyDescriptor)> {
        let borrowed = self.borrow();
        borrowed
            .schema
            .iter()
            .map(|(name, info)| (name.cheap_clone(), borrowed.descriptor_at(info)))
            .collect()
    }

    /// Whether `self` appears on the prototype chain of `other`
    pub fn is_prototype_of(&self, other: &JsObjectRef) -> bool {
        let mut current = other.prototype();
        while let Some(object) = current {
            if object.ptr_eq(self) {
                return true;
            }
            current = object.prototype();
        }
        false
    }

    // ── Calls ─────────────────────────────────────────────────────────────────

    /// Call the method stored under `name` with `this` bound to this object
    pub fn call_member(
        &self,
        rt: &mut Runtime,
        name: &str,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let function = self.get(rt, name)?;
        if function.is_undefined() {
            return Err(JsError::no_such_method(name));
        }
        if !function.is_callable() {
            return Err(JsError::not_a_function(name));
        }
        rt.call_function(&function, JsValue::Object(self.cheap_clone()), args)
    }

    /// Like [`call_member`](Self::call_member) but yields `None` when the
    /// property is not callable
    pub fn try_call_member(
        &self,
        rt: &mut Runtime,
        name: &str,
        args: &[JsValue],
    ) -> Result<Option<JsValue>, JsError> {
        let function = self.get(rt, name)?;
        if !function.is_callable() {
            return Ok(None);
        }
        rt.call_function(&function, JsValue::Object(self.cheap_clone()), args)
            .map(Some)
    }

    /// Convert to a primitive by calling `valueOf`/`toString`
    pub fn to_primitive(&self, rt: &mut Runtime, hint: PrimitiveHint) -> Result<JsValue, JsError> {
        let order = match hint {
            PrimitiveHint::String => ["toString", "valueOf"],
            PrimitiveHint::Default | PrimitiveHint::Number => ["valueOf", "toString"],
        };
        for method in order {
            if let Some(result) = self.try_call_member(rt, method, &[])?
                && result.is_primitive()
            {
                return Ok(result);
            }
        }
        Err(JsError::type_error(
            "Attempted conversion of the object to a primitive value failed.  Check the toString() and valueOf() functions.",
        ))
    }
}

impl PartialEq for JsObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for JsObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => match &object.kind {
                ObjectKind::Function(func) => write!(f, "[Function: {}]", func.name()),
                ObjectKind::Array { length } => write!(f, "[Array({})]", length),
                _ => write!(f, "[object {}]", object.class_name()),
            },
            Err(_) => write!(f, "[object <borrowed>]"),
        }
    }
}
