//! Property-name interning.
//!
//! Schemas key their maps by `JsString`. Interning the names that host
//! bindings and builtins use keeps every schema holding the same `Rc<str>`
//! for a given name, so transition-cache keys hash and compare cheaply.

use rustc_hash::FxHashMap;

use crate::value::{CheapClone, JsString};

/// A dictionary for deduplicating property names.
///
/// Strings inserted into the dictionary are stored once and subsequent
/// requests for the same string return a cheap clone of the existing instance.
pub struct StringDict {
    /// Using Box<str> as key to avoid double-indirection through Rc.
    strings: FxHashMap<Box<str>, JsString>,
}

impl StringDict {
    pub fn new() -> Self {
        Self {
            strings: FxHashMap::default(),
        }
    }

    /// Create a dictionary pre-populated with the names the runtime itself defines.
    pub fn with_common_strings() -> Self {
        let mut dict = Self::new();
        for s in COMMON_STRINGS {
            dict.get_or_insert(s);
        }
        dict
    }

    /// Get an existing string or insert a new one.
    pub fn get_or_insert(&mut self, s: &str) -> JsString {
        if let Some(existing) = self.strings.get(s) {
            return existing.cheap_clone();
        }
        let js_str = JsString::from(s);
        self.strings.insert(s.into(), js_str.cheap_clone());
        js_str
    }

    /// Get an existing string without inserting.
    pub fn get(&self, s: &str) -> Option<JsString> {
        self.strings.get(s).map(|s| s.cheap_clone())
    }

    /// Number of unique strings in the dictionary.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringDict {
    fn default() -> Self {
        Self::new()
    }
}

/// Names defined by the runtime on intrinsic objects, function objects and
/// arguments objects.
const COMMON_STRINGS: &[&str] = &[
    "length",
    "name",
    "prototype",
    "constructor",
    "callee",
    "caller",
    "arguments",
    "toString",
    "toLocaleString",
    "valueOf",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "call",
    "apply",
];
