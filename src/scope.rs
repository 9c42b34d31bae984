//! Declarative variable scopes.
//!
//! A function call's parameters live in a [`DeclarativeScope`]. Mapped
//! arguments-object indices read and write these bindings, so a scope is a
//! shared handle: the interpreter frame and every argument accessor hold the
//! same bindings.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::JsError;
use crate::prelude::FxHashMap;
use crate::value::{CheapClone, JsString, JsValue};

#[derive(Debug, Clone)]
struct Binding {
    value: JsValue,
    mutable: bool,
}

#[derive(Default)]
struct ScopeData {
    bindings: FxHashMap<JsString, Binding>,
    outer: Option<DeclarativeScope>,
}

/// Shared handle to a set of variable bindings with an optional outer scope
#[derive(Clone, Default)]
pub struct DeclarativeScope(Rc<RefCell<ScopeData>>);

impl CheapClone for DeclarativeScope {}

impl DeclarativeScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outer(outer: DeclarativeScope) -> Self {
        DeclarativeScope(Rc::new(RefCell::new(ScopeData {
            bindings: FxHashMap::default(),
            outer: Some(outer),
        })))
    }

    /// Scope for a call: one mutable binding per parameter name.
    ///
    /// Missing arguments bind `undefined`. When a name repeats, the last
    /// occurrence supplies the value.
    pub fn for_parameters(names: &[JsString], values: &[JsValue]) -> Self {
        let scope = Self::new();
        for (i, name) in names.iter().enumerate() {
            let value = values.get(i).cloned().unwrap_or_default();
            scope.declare(name.cheap_clone(), value, true);
        }
        scope
    }

    /// Create or replace a binding in this scope
    pub fn declare(&self, name: impl Into<JsString>, value: JsValue, mutable: bool) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name.into(), Binding { value, mutable });
    }

    /// Read a binding, walking outward
    pub fn get(&self, name: &str) -> Option<JsValue> {
        let mut current = Some(self.cheap_clone());
        while let Some(scope) = current {
            let borrowed = scope.0.borrow();
            if let Some(binding) = borrowed.bindings.get(name) {
                return Some(binding.value.clone());
            }
            let outer = borrowed.outer.clone();
            drop(borrowed);
            current = outer;
        }
        None
    }

    /// Assign to the nearest binding named `name`.
    ///
    /// An undeclared name is created in this scope.
    pub fn set(&self, name: &str, value: JsValue) -> Result<(), JsError> {
        let mut current = Some(self.cheap_clone());
        while let Some(scope) = current {
            let mut borrowed = scope.0.borrow_mut();
            if let Some(binding) = borrowed.bindings.get_mut(name) {
                if !binding.mutable {
                    return Err(JsError::type_error(format!(
                        "Assignment to constant variable '{}'",
                        name
                    )));
                }
                binding.value = value;
                return Ok(());
            }
            let outer = borrowed.outer.clone();
            drop(borrowed);
            current = outer;
        }
        self.declare(name, value, true);
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
