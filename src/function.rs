//! Callable objects: native functions, bound method groups and the internal
//! accessor functions used by arguments objects.

use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

use crate::arguments::ArgumentAccessor;
use crate::error::JsError;
use crate::runtime::Runtime;
use crate::value::{CheapClone, JsString, JsValue};

/// Signature of a host method handler: `(runtime, this, args)`
pub type HostFn = fn(&mut Runtime, JsValue, &[JsValue]) -> Result<JsValue, JsError>;

/// A native function that may capture host state
pub type NativeClosure = Rc<dyn Fn(&mut Runtime, JsValue, &[JsValue]) -> Result<JsValue, JsError>>;

/// Per-overload behavior switches
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodFlags(u8);

impl MethodFlags {
    pub const NONE: Self = Self(0);
    /// Reject `null`/`undefined` receivers with a TypeError
    pub const REQUIRES_THIS: Self = Self(1 << 0);
    /// Convert a `null` result into `undefined`
    pub const NULL_AS_UNDEFINED: Self = Self(1 << 1);
    /// Pass arguments beyond the arity through instead of dropping them
    pub const VARIADIC: Self = Self(1 << 2);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MethodFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for MethodFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::REQUIRES_THIS) {
            names.push("requires_this");
        }
        if self.contains(Self::NULL_AS_UNDEFINED) {
            names.push("null_as_undefined");
        }
        if self.contains(Self::VARIADIC) {
            names.push("variadic");
        }
        write!(f, "MethodFlags({})", names.join("|"))
    }
}

/// One overload of a bound method
#[derive(Clone, Copy)]
pub struct BinderMethod {
    pub handler: HostFn,
    pub arity: usize,
    pub flags: MethodFlags,
}

impl BinderMethod {
    pub const fn new(handler: HostFn, arity: usize) -> Self {
        Self {
            handler,
            arity,
            flags: MethodFlags::NONE,
        }
    }

    pub const fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl fmt::Debug for BinderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderMethod")
            .field("arity", &self.arity)
            .field("flags", &self.flags)
            .finish()
    }
}

/// All overloads exposed under one script-visible name.
///
/// Built once while populating an object and never changed afterwards.
#[derive(Debug)]
pub struct BoundMethodGroup {
    name: JsString,
    overloads: Vec<BinderMethod>,
    length: usize,
}

impl BoundMethodGroup {
    /// Group `overloads` under `name`.
    ///
    /// Without an explicit `length` the script-visible length is the
    /// largest overload arity.
    pub fn new(
        name: JsString,
        overloads: Vec<BinderMethod>,
        length: Option<usize>,
    ) -> Result<Self, JsError> {
        let Some(max_arity) = overloads.iter().map(|m| m.arity).max() else {
            return Err(JsError::binding_configuration(format!(
                "method '{}' has no overloads",
                name
            )));
        };
        Ok(Self {
            name,
            overloads,
            length: length.unwrap_or(max_arity),
        })
    }

    pub fn name(&self) -> &JsString {
        &self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn overloads(&self) -> &[BinderMethod] {
        &self.overloads
    }

    /// Pick the overload for a call with `arg_count` arguments.
    ///
    /// Exact arity wins; otherwise the smallest arity that can absorb the
    /// arguments, otherwise the largest arity available.
    pub fn select(&self, arg_count: usize) -> Option<&BinderMethod> {
        self.overloads
            .iter()
            .find(|m| m.arity == arg_count)
            .or_else(|| {
                self.overloads
                    .iter()
                    .filter(|m| m.arity > arg_count)
                    .min_by_key(|m| m.arity)
            })
            .or_else(|| self.overloads.iter().max_by_key(|m| m.arity))
    }

    pub fn call(&self, rt: &mut Runtime, this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
        let Some(method) = self.select(args.len()) else {
            return Err(JsError::type_error(format!(
                "No overload of '{}' accepts {} arguments",
                self.name,
                args.len()
            )));
        };
        if method.flags.contains(MethodFlags::REQUIRES_THIS) && this.is_null_or_undefined() {
            return Err(JsError::type_error(format!(
                "The method '{}' must be called on an object",
                self.name
            )));
        }

        let result = if args.len() < method.arity {
            let mut padded = args.to_vec();
            padded.resize(method.arity, JsValue::Undefined);
            (method.handler)(rt, this, &padded)?
        } else if method.flags.contains(MethodFlags::VARIADIC) {
            (method.handler)(rt, this, args)?
        } else {
            let used = args.get(..method.arity).unwrap_or(args);
            (method.handler)(rt, this, used)?
        };

        if method.flags.contains(MethodFlags::NULL_AS_UNDEFINED) && matches!(result, JsValue::Null)
        {
            return Ok(JsValue::Undefined);
        }
        Ok(result)
    }
}

/// A named native function
#[derive(Clone)]
pub struct NativeFunction {
    pub name: JsString,
    pub arity: usize,
    pub func: NativeClosure,
}

/// What a function object runs when called
#[derive(Clone)]
pub enum JsFunction {
    Native(NativeFunction),
    MethodGroup(Rc<BoundMethodGroup>),
    /// Getter or setter linking an arguments index to a parameter variable
    ArgumentAccessor(ArgumentAccessor),
    /// Always fails; guards `caller`/`callee` of strict arguments objects
    ThrowTypeError(JsString),
}

impl JsFunction {
    pub fn name(&self) -> JsString {
        match self {
            JsFunction::Native(f) => f.name.cheap_clone(),
            JsFunction::MethodGroup(group) => group.name.cheap_clone(),
            JsFunction::ArgumentAccessor(_) | JsFunction::ThrowTypeError(_) => JsString::from(""),
        }
    }

    /// Value of the script-visible `length` property
    pub fn length(&self) -> usize {
        match self {
            JsFunction::Native(f) => f.arity,
            JsFunction::MethodGroup(group) => group.length,
            JsFunction::ArgumentAccessor(accessor) => accessor.arity(),
            JsFunction::ThrowTypeError(_) => 0,
        }
    }

    pub fn invoke(&self, rt: &mut Runtime, this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
        match self {
            JsFunction::Native(f) => (f.func)(rt, this, args),
            JsFunction::MethodGroup(group) => group.call(rt, this, args),
            JsFunction::ArgumentAccessor(accessor) => accessor.invoke(args),
            JsFunction::ThrowTypeError(property) => {
                Err(JsError::strict_mode_violation(property.as_str()))
            }
        }
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsFunction::Native(native) => write!(f, "Native({})", native.name),
            JsFunction::MethodGroup(group) => {
                write!(f, "MethodGroup({}, {} overloads)", group.name, group.overloads.len())
            }
            JsFunction::ArgumentAccessor(accessor) => write!(f, "{:?}", accessor),
            JsFunction::ThrowTypeError(property) => write!(f, "ThrowTypeError({})", property),
        }
    }
}
