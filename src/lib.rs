//! Object model core for an embeddable ECMAScript runtime.
//!
//! Objects keep their values in slot vectors and describe their layout with
//! shared, immutable [`SchemaRef`]s (hidden classes). Property access walks
//! the prototype chain, runs getters and setters with the original receiver,
//! and can be short-circuited by inline caches keyed on schema identity.
//! Host types expose members through static declaration tables.
//!
//! # Example
//!
//! ```
//! use barista::{JsValue, Runtime};
//!
//! let mut rt = Runtime::new().unwrap();
//! let parent = rt.create_object();
//! parent.set(&mut rt, "x", JsValue::Number(5.0), true).unwrap();
//!
//! let child = rt.create_object_with_prototype(Some(parent.clone()));
//! assert_eq!(child.get(&mut rt, "x").unwrap(), JsValue::Number(5.0));
//!
//! child.set(&mut rt, "x", JsValue::Number(10.0), true).unwrap();
//! assert_eq!(child.get(&mut rt, "x").unwrap(), JsValue::Number(10.0));
//! assert_eq!(parent.get(&mut rt, "x").unwrap(), JsValue::Number(5.0));
//! ```

pub mod arguments;
pub mod binding;
pub mod builtins;
pub mod config;
pub mod error;
pub mod function;
pub mod inline_cache;
pub mod json;
pub mod object;
pub mod prelude;
pub mod runtime;
pub mod schema;
pub mod scope;
pub mod string_dict;
pub mod value;

pub use binding::{FieldValue, HostBinding, MemberDecl, populate, this_host};
pub use config::RuntimeConfig;
pub use error::JsError;
pub use function::{BinderMethod, BoundMethodGroup, HostFn, JsFunction, MethodFlags};
pub use inline_cache::{CacheEntry, PropertyCache};
pub use object::{
    AccessorPair, JsObject, JsObjectRef, MissingPropertyHook, ObjectKind, PrimitiveHint,
    PropertyDescriptor, Slot,
};
pub use runtime::Runtime;
pub use schema::{PropertyAttributes, SchemaRef, SlotInfo};
pub use scope::DeclarativeScope;
pub use value::{CheapClone, JsString, JsValue};
