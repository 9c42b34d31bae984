//! Error types for the object model

use thiserror::Error;

use crate::value::{JsString, JsValue};

/// Main error type for the runtime core
///
/// Every variant except [`JsError::BindingConfiguration`] is an ordinary,
/// recoverable condition that an interpreter converts into a script-visible
/// exception. Binding configuration errors describe a mistake in a host
/// declaration table and are meant to abort host startup.
#[derive(Debug, Error)]
pub enum JsError {
    #[error("TypeError: The property '{name}' already exists.")]
    DuplicateProperty { name: String },

    #[error("TypeError: The property '{name}' does not exist.")]
    PropertyNotFound { name: String },

    #[error("TypeError: The property '{name}' is read-only.")]
    ReadOnlyProperty { name: String },

    #[error("TypeError: The property '{name}' is non-configurable.")]
    NonConfigurable { name: String },

    #[error("TypeError: The property '{name}' cannot be created as the object is not extensible.")]
    NotExtensible { name: String },

    #[error("InvalidStateError: {message}")]
    InvalidState { message: String },

    #[error("TypeError: '{name}' may not be accessed on the arguments object of a strict mode function")]
    StrictModeViolation { name: String },

    #[error("BindingConfigurationError: {message}")]
    BindingConfiguration { message: String },

    #[error("TypeError: Property '{name}' of object is not a function")]
    NotAFunction { name: String },

    #[error("TypeError: Object has no method '{name}'")]
    NoSuchMethod { name: String },

    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    #[error("Error: Maximum number of named properties reached ({limit}).")]
    PropertyLimit { limit: usize },

    #[error("ConfigError: {message}")]
    Config { message: String },

    /// A host function threw an arbitrary script value
    #[error("Uncaught {value:?}")]
    ThrownValue { value: JsValue },
}

impl JsError {
    pub fn duplicate_property(name: impl Into<String>) -> Self {
        JsError::DuplicateProperty { name: name.into() }
    }

    pub fn property_not_found(name: impl Into<String>) -> Self {
        JsError::PropertyNotFound { name: name.into() }
    }

    pub fn read_only(name: impl Into<String>) -> Self {
        JsError::ReadOnlyProperty { name: name.into() }
    }

    pub fn non_configurable(name: impl Into<String>) -> Self {
        JsError::NonConfigurable { name: name.into() }
    }

    pub fn not_extensible(name: impl Into<String>) -> Self {
        JsError::NotExtensible { name: name.into() }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        JsError::InvalidState {
            message: message.into(),
        }
    }

    pub fn strict_mode_violation(name: impl Into<String>) -> Self {
        JsError::StrictModeViolation { name: name.into() }
    }

    pub fn binding_configuration(message: impl Into<String>) -> Self {
        JsError::BindingConfiguration {
            message: message.into(),
        }
    }

    pub fn not_a_function(name: impl Into<String>) -> Self {
        JsError::NotAFunction { name: name.into() }
    }

    pub fn no_such_method(name: impl Into<String>) -> Self {
        JsError::NoSuchMethod { name: name.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::TypeError {
            message: message.into(),
        }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::RangeError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        JsError::Config {
            message: message.into(),
        }
    }

    pub fn thrown(value: JsValue) -> Self {
        JsError::ThrownValue { value }
    }

    /// Name of the script-visible error constructor this condition maps to
    pub fn kind(&self) -> &'static str {
        match self {
            JsError::DuplicateProperty { .. }
            | JsError::PropertyNotFound { .. }
            | JsError::ReadOnlyProperty { .. }
            | JsError::NonConfigurable { .. }
            | JsError::NotExtensible { .. }
            | JsError::StrictModeViolation { .. }
            | JsError::NotAFunction { .. }
            | JsError::NoSuchMethod { .. }
            | JsError::TypeError { .. } => "TypeError",
            JsError::RangeError { .. } => "RangeError",
            JsError::InvalidState { .. } => "InvalidStateError",
            JsError::BindingConfiguration { .. } => "BindingConfigurationError",
            JsError::PropertyLimit { .. } => "Error",
            JsError::Config { .. } => "ConfigError",
            JsError::ThrownValue { .. } => "Thrown",
        }
    }

    /// Whether an interpreter may catch this error and keep running scripts
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, JsError::BindingConfiguration { .. })
    }

    /// Extract a script value for this error (what a `catch` clause would see)
    pub fn to_value(&self) -> JsValue {
        match self {
            JsError::ThrownValue { value } => value.clone(),
            other => JsValue::String(JsString::from(other.to_string())),
        }
    }
}
