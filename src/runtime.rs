//! The runtime: intrinsic objects, object factories and function calls.

use std::rc::Rc;

use crate::arguments::create_arguments_object;
use crate::binding::{HostBinding, wrap_host};
use crate::builtins::init_intrinsics;
use crate::config::RuntimeConfig;
use crate::error::JsError;
use crate::function::{JsFunction, NativeFunction};
use crate::object::{JsObject, JsObjectRef, ObjectKind, PropertyDescriptor, Slot};
use crate::schema::{PropertyAttributes, SchemaRef};
use crate::scope::DeclarativeScope;
use crate::string_dict::StringDict;
use crate::value::{CheapClone, JsString, JsValue};

/// One isolated object graph.
///
/// Every object a runtime creates starts from the runtime's single empty
/// schema, so objects built the same way share schemas.
pub struct Runtime {
    config: RuntimeConfig,
    string_dict: StringDict,
    empty_schema: SchemaRef,
    /// Root of every prototype chain; its own prototype is null
    object_prototype: JsObjectRef,
    function_prototype: JsObjectRef,
    array_prototype: JsObjectRef,
}

fn empty_function(_rt: &mut Runtime, _this: JsValue, _args: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(JsValue::Undefined)
}

impl Runtime {
    pub fn new() -> Result<Self, JsError> {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Result<Self, JsError> {
        config.validate()?;
        let empty_schema = SchemaRef::root(config.max_properties);

        let object_prototype = JsObjectRef::new(JsObject::new(
            None,
            empty_schema.cheap_clone(),
            ObjectKind::Ordinary,
        ));
        let function_prototype = JsObjectRef::new(JsObject::new(
            Some(object_prototype.cheap_clone()),
            empty_schema.cheap_clone(),
            ObjectKind::Function(JsFunction::Native(NativeFunction {
                name: JsString::from(""),
                arity: 0,
                func: Rc::new(empty_function),
            })),
        ));
        let array_prototype = JsObjectRef::new(JsObject::new(
            Some(object_prototype.cheap_clone()),
            empty_schema.cheap_clone(),
            ObjectKind::Ordinary,
        ));

        let mut rt = Self {
            config,
            string_dict: StringDict::with_common_strings(),
            empty_schema,
            object_prototype,
            function_prototype,
            array_prototype,
        };
        init_intrinsics(&mut rt)?;
        Ok(rt)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Intern a property name
    pub fn intern(&mut self, s: &str) -> JsString {
        self.string_dict.get_or_insert(s)
    }

    /// The schema every new object starts with
    pub fn empty_schema(&self) -> &SchemaRef {
        &self.empty_schema
    }

    pub fn object_prototype(&self) -> &JsObjectRef {
        &self.object_prototype
    }

    pub fn function_prototype(&self) -> &JsObjectRef {
        &self.function_prototype
    }

    pub fn array_prototype(&self) -> &JsObjectRef {
        &self.array_prototype
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Object factories
    // ═══════════════════════════════════════════════════════════════════════════

    /// Create a plain object inheriting from `Object.prototype`
    pub fn create_object(&mut self) -> JsObjectRef {
        let prototype = self.object_prototype.cheap_clone();
        self.create_object_with_kind(Some(prototype), ObjectKind::Ordinary)
    }

    /// Create a plain object with an explicit prototype (`None` for a raw object)
    pub fn create_object_with_prototype(&mut self, prototype: Option<JsObjectRef>) -> JsObjectRef {
        self.create_object_with_kind(prototype, ObjectKind::Ordinary)
    }

    pub(crate) fn create_object_with_kind(
        &mut self,
        prototype: Option<JsObjectRef>,
        kind: ObjectKind,
    ) -> JsObjectRef {
        JsObjectRef::new(JsObject::new(prototype, self.empty_schema.cheap_clone(), kind))
    }

    /// Create an array-like object whose `length` tracks its indexed properties
    pub fn create_array(&mut self, elements: Vec<JsValue>) -> Result<JsObjectRef, JsError> {
        let prototype = self.array_prototype.cheap_clone();
        let array = self.create_object_with_kind(Some(prototype), ObjectKind::Array { length: 0 });
        let length = self.intern("length");
        array.fast_set_property(
            length.as_str(),
            Slot::Empty,
            PropertyAttributes::WRITABLE | PropertyAttributes::IS_LENGTH,
            false,
        )?;
        for (index, element) in elements.into_iter().enumerate() {
            array.define_property(
                &index.to_string(),
                PropertyDescriptor::data(element, PropertyAttributes::FULL_ACCESS),
                true,
            )?;
        }
        Ok(array)
    }

    /// Wrap a native closure as a function object
    pub fn create_native_function<F>(
        &mut self,
        name: &str,
        arity: usize,
        func: F,
    ) -> Result<JsObjectRef, JsError>
    where
        F: Fn(&mut Runtime, JsValue, &[JsValue]) -> Result<JsValue, JsError> + 'static,
    {
        let name = self.intern(name);
        self.create_function_object(JsFunction::Native(NativeFunction {
            name,
            arity,
            func: Rc::new(func),
        }))
    }

    /// Create a function object with configurable `length` and `name`
    pub fn create_function_object(&mut self, function: JsFunction) -> Result<JsObjectRef, JsError> {
        let length = JsValue::Number(function.length() as f64);
        let name = JsValue::String(function.name());
        let prototype = self.function_prototype.cheap_clone();
        let object = self.create_object_with_kind(Some(prototype), ObjectKind::Function(function));
        object.fast_set_property("length", Slot::Value(length), PropertyAttributes::CONFIGURABLE, false)?;
        object.fast_set_property("name", Slot::Value(name), PropertyAttributes::CONFIGURABLE, false)?;
        Ok(object)
    }

    /// Create an object for a host value, populated from its declaration table
    pub fn wrap_host<T: HostBinding>(&mut self, value: T) -> Result<JsObjectRef, JsError> {
        wrap_host(self, value)
    }

    /// Create the arguments object for a call. See [`crate::arguments`].
    pub fn create_arguments_object(
        &mut self,
        callee: &JsObjectRef,
        parameter_names: &[JsString],
        scope: &DeclarativeScope,
        values: &[JsValue],
        strict: bool,
    ) -> Result<JsObjectRef, JsError> {
        create_arguments_object(self, callee, parameter_names, scope, values, strict)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════════════════════

    /// Call a function value
    pub fn call_function(
        &mut self,
        callee: &JsValue,
        this_value: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let JsValue::Object(function) = callee else {
            return Err(JsError::type_error("Not a function"));
        };
        self.call(function, this_value, args)
    }

    /// Call a function object
    pub fn call(
        &mut self,
        function: &JsObjectRef,
        this_value: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        // Cloned out so the callee may freely touch its own function object
        let func = match function.borrow().kind() {
            ObjectKind::Function(f) => f.clone(),
            _ => return Err(JsError::type_error("Not a function")),
        };
        func.invoke(self, this_value, args)
    }
}
