//! Inline caching of property slots.
//!
//! A full lookup of an own plain data property can hand back a
//! [`CacheEntry`]: the schema the object had at the time plus the slot
//! index. The entry is only trusted while the object's current schema is
//! that very instance. Accessors, the synthesized `length` and anything
//! found on the prototype chain never produce an entry.
//!
//! The entry holds a strong reference to its schema, so a reclaimed
//! schema's address can never be reused by a different layout while an
//! entry still names it.
//!
//! [`PropertyCache`] is the per-call-site memo an interpreter keeps for one
//! property name.

use crate::error::JsError;
use crate::object::{JsObjectRef, Slot};
use crate::runtime::Runtime;
use crate::schema::SchemaRef;
use crate::value::{CheapClone, JsString, JsValue};

/// Validated `(schema, slot)` pair from an earlier lookup
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: SchemaRef,
    index: usize,
    writable: bool,
}

impl CacheEntry {
    pub fn key(&self) -> &SchemaRef {
        &self.key
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether writes may go through this entry
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Whether this entry still describes `object`'s layout
    #[inline]
    pub fn is_valid_for(&self, object: &JsObjectRef) -> bool {
        object.borrow().schema.ptr_eq(&self.key)
    }
}

impl JsObjectRef {
    /// Current schema identity, the token cache entries are validated against
    pub fn inline_cache_key(&self) -> SchemaRef {
        self.schema()
    }

    /// Full get that also reports a cache entry when the result came from a
    /// cacheable own slot
    pub fn inline_get(
        &self,
        rt: &mut Runtime,
        name: &str,
    ) -> Result<(JsValue, Option<CacheEntry>), JsError> {
        let own = {
            let borrowed = self.borrow();
            borrowed
                .schema
                .get_property_index_and_attributes(name)
                .map(|info| {
                    info.is_plain_data().then(|| {
                        let value = borrowed.slot_value(info.index).unwrap_or_default();
                        let entry = CacheEntry {
                            key: borrowed.schema.cheap_clone(),
                            index: info.index,
                            writable: info.is_writable(),
                        };
                        (value, entry)
                    })
                })
        };
        match own {
            Some(Some((value, entry))) => Ok((value, Some(entry))),
            Some(None) => self.get(rt, name).map(|value| (value, None)),
            None => {
                let value = match self.prototype() {
                    Some(prototype) => prototype.get_with_receiver(rt, name, self)?,
                    None => self.missing_property(rt, name)?,
                };
                Ok((value, None))
            }
        }
    }

    /// Full set that reports a cache entry when the write landed in a
    /// cacheable writable own slot
    pub fn inline_set(
        &self,
        rt: &mut Runtime,
        name: &str,
        value: JsValue,
        throw_on_error: bool,
    ) -> Result<Option<CacheEntry>, JsError> {
        if let Some(entry) = self.write_own_plain(name, &value) {
            return Ok(Some(entry));
        }
        self.set(rt, name, value, throw_on_error)?;
        Ok(None)
    }

    /// Like [`inline_set`](Self::inline_set) but never creates the property
    pub fn inline_set_if_exists(
        &self,
        rt: &mut Runtime,
        name: &str,
        value: JsValue,
        throw_on_error: bool,
    ) -> Result<(bool, Option<CacheEntry>), JsError> {
        if let Some(entry) = self.write_own_plain(name, &value) {
            return Ok((true, Some(entry)));
        }
        let existed = self.set_if_exists(rt, name, value, throw_on_error)?;
        Ok((existed, None))
    }

    fn write_own_plain(&self, name: &str, value: &JsValue) -> Option<CacheEntry> {
        let mut object = self.borrow_mut();
        let info = object.schema.get_property_index_and_attributes(name)?;
        if !info.is_plain_data() || !info.is_writable() {
            return None;
        }
        object.write_slot(info.index, Slot::Value(value.clone()));
        Some(CacheEntry {
            key: object.schema.cheap_clone(),
            index: info.index,
            writable: true,
        })
    }

    /// Read through a cache entry; `None` when the entry no longer applies
    #[inline]
    pub fn read_slot_cached(&self, entry: &CacheEntry) -> Option<JsValue> {
        let object = self.borrow();
        if !object.schema.ptr_eq(&entry.key) {
            return None;
        }
        Some(object.slot_value(entry.index).unwrap_or_default())
    }

    /// Write through a cache entry; `false` when the entry no longer applies
    /// or was filled from a read-only property
    #[inline]
    pub fn write_slot_cached(&self, entry: &CacheEntry, value: JsValue) -> bool {
        let mut object = self.borrow_mut();
        if !entry.writable || !object.schema.ptr_eq(&entry.key) {
            return false;
        }
        object.write_slot(entry.index, Slot::Value(value));
        true
    }
}

/// Call-site memo for reads and writes of one property name
#[derive(Debug)]
pub struct PropertyCache {
    name: JsString,
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl PropertyCache {
    pub fn new(name: impl Into<JsString>) -> Self {
        Self {
            name: name.into(),
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn name(&self) -> &JsString {
        &self.name
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn get(&mut self, rt: &mut Runtime, object: &JsObjectRef) -> Result<JsValue, JsError> {
        if !rt.config().inline_caching {
            return object.get(rt, self.name.as_str());
        }
        if let Some(entry) = &self.entry
            && let Some(value) = object.read_slot_cached(entry)
        {
            self.hits += 1;
            return Ok(value);
        }
        self.misses += 1;
        log::trace!("inline cache miss reading '{}'", self.name);
        let (value, entry) = object.inline_get(rt, self.name.as_str())?;
        self.entry = entry;
        Ok(value)
    }

    pub fn set(
        &mut self,
        rt: &mut Runtime,
        object: &JsObjectRef,
        value: JsValue,
        throw_on_error: bool,
    ) -> Result<(), JsError> {
        if !rt.config().inline_caching {
            return object.set(rt, self.name.as_str(), value, throw_on_error);
        }
        if let Some(entry) = &self.entry
            && object.write_slot_cached(entry, value.clone())
        {
            self.hits += 1;
            return Ok(());
        }
        self.misses += 1;
        log::trace!("inline cache miss writing '{}'", self.name);
        self.entry = object.inline_set(rt, self.name.as_str(), value, throw_on_error)?;
        Ok(())
    }
}
