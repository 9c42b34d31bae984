//! Property schemas (hidden classes).
//!
//! A [`PropertySchema`] records the *shape* of an object: which property names
//! it has, which value slot each one lives in, and the attribute bits of each
//! property. Schemas never change once built. Adding, deleting or re-flagging
//! a property produces a successor schema, and successors are memoized on
//! their parent keyed by the transition, so objects that go through the same
//! sequence of mutations end up pointing at the very same schema instance.
//! That identity is what inline caches compare against.
//!
//! Ownership runs child → parent (strong) and parent → child (weak): a schema
//! in use keeps its whole lineage alive, while lineages no object references
//! any more are reclaimed by reference counting.

use std::cell::RefCell;
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::rc::{Rc, Weak};

use crate::error::JsError;
use crate::prelude::{FxHashMap, IndexMap, index_map_new};
use crate::value::{CheapClone, JsString};

/// Default cap on the number of named properties one schema may hold
pub const DEFAULT_PROPERTY_LIMIT: usize = 16384;

/// Attribute bits attached to each property in a schema
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PropertyAttributes(u8);

impl PropertyAttributes {
    /// Not writable, not enumerable, not configurable
    pub const SEALED: Self = Self(0);
    pub const WRITABLE: Self = Self(1 << 0);
    pub const ENUMERABLE: Self = Self(1 << 1);
    pub const CONFIGURABLE: Self = Self(1 << 2);
    /// Writable and configurable, hidden from enumeration
    pub const NON_ENUMERABLE: Self = Self(Self::WRITABLE.0 | Self::CONFIGURABLE.0);
    pub const FULL_ACCESS: Self =
        Self(Self::WRITABLE.0 | Self::ENUMERABLE.0 | Self::CONFIGURABLE.0);
    /// The slot holds a getter/setter pair
    pub const IS_ACCESSOR: Self = Self(1 << 3);
    /// The slot is the synthesized `length` of an array-like object
    pub const IS_LENGTH: Self = Self(1 << 4);

    const ALL: u8 = 0x1f;

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_writable(self) -> bool {
        self.contains(Self::WRITABLE)
    }

    pub const fn is_enumerable(self) -> bool {
        self.contains(Self::ENUMERABLE)
    }

    pub const fn is_configurable(self) -> bool {
        self.contains(Self::CONFIGURABLE)
    }

    pub const fn is_accessor(self) -> bool {
        self.contains(Self::IS_ACCESSOR)
    }

    pub const fn is_length(self) -> bool {
        self.contains(Self::IS_LENGTH)
    }
}

impl BitOr for PropertyAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitAnd for PropertyAttributes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for PropertyAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::WRITABLE, "writable"),
            (Self::ENUMERABLE, "enumerable"),
            (Self::CONFIGURABLE, "configurable"),
            (Self::IS_ACCESSOR, "accessor"),
            (Self::IS_LENGTH, "length"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            write!(f, "PropertyAttributes(sealed)")
        } else {
            write!(f, "PropertyAttributes({})", set.join("|"))
        }
    }
}

/// Where a property lives and how it behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInfo {
    pub index: usize,
    pub attributes: PropertyAttributes,
}

impl SlotInfo {
    pub fn is_writable(&self) -> bool {
        self.attributes.is_writable()
    }

    pub fn is_enumerable(&self) -> bool {
        self.attributes.is_enumerable()
    }

    pub fn is_configurable(&self) -> bool {
        self.attributes.is_configurable()
    }

    pub fn is_accessor(&self) -> bool {
        self.attributes.is_accessor()
    }

    pub fn is_length(&self) -> bool {
        self.attributes.is_length()
    }

    /// A plain data slot can be read or written without running code
    pub fn is_plain_data(&self) -> bool {
        !self
            .attributes
            .intersects(PropertyAttributes::IS_ACCESSOR | PropertyAttributes::IS_LENGTH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Transition {
    Add(JsString, PropertyAttributes),
    Delete(JsString),
    Modify(JsString, PropertyAttributes),
}

/// An immutable property layout. Always handled through [`SchemaRef`].
pub struct PropertySchema {
    properties: IndexMap<JsString, SlotInfo>,
    /// Never decreases along a lineage; deleted slots are not reused
    next_slot_index: usize,
    property_limit: usize,
    parent: Option<SchemaRef>,
    /// The empty schema this lineage started from (`None` for the root itself)
    root: Option<SchemaRef>,
    transitions: RefCell<FxHashMap<Transition, Weak<PropertySchema>>>,
}

/// Shared handle to a [`PropertySchema`]; equality is identity
#[derive(Clone)]
pub struct SchemaRef(Rc<PropertySchema>);

impl CheapClone for SchemaRef {}

impl SchemaRef {
    /// Create a new empty root schema. A runtime creates exactly one.
    pub fn root(property_limit: usize) -> Self {
        SchemaRef(Rc::new(PropertySchema {
            properties: index_map_new(),
            next_slot_index: 0,
            property_limit,
            parent: None,
            root: None,
            transitions: RefCell::new(FxHashMap::default()),
        }))
    }

    /// Identity comparison; this is the inline cache validity check
    #[inline]
    pub fn ptr_eq(&self, other: &SchemaRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the schema, for diagnostics
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn property_count(&self) -> usize {
        self.0.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.properties.is_empty()
    }

    /// Index the next added property will occupy
    pub fn next_slot_index(&self) -> usize {
        self.0.next_slot_index
    }

    pub fn property_limit(&self) -> usize {
        self.0.property_limit
    }

    pub fn parent(&self) -> Option<&SchemaRef> {
        self.0.parent.as_ref()
    }

    pub fn root_schema(&self) -> SchemaRef {
        match &self.0.root {
            Some(root) => root.cheap_clone(),
            None => self.cheap_clone(),
        }
    }

    #[inline]
    pub fn get_property_index_and_attributes(&self, name: &str) -> Option<SlotInfo> {
        self.0.properties.get(name).copied()
    }

    pub fn get_property_index(&self, name: &str) -> Option<usize> {
        self.0.properties.get(name).map(|info| info.index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.properties.contains_key(name)
    }

    /// Property names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &JsString> {
        self.0.properties.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JsString, SlotInfo)> {
        self.0.properties.iter().map(|(name, info)| (name, *info))
    }

    /// Return the schema with `name` appended at the next free slot.
    pub fn add_property(
        &self,
        name: &JsString,
        attributes: PropertyAttributes,
    ) -> Result<SchemaRef, JsError> {
        if self.contains(name.as_str()) {
            return Err(JsError::duplicate_property(name.as_str()));
        }
        if self.property_count() >= self.0.property_limit {
            return Err(JsError::PropertyLimit {
                limit: self.0.property_limit,
            });
        }
        let transition = Transition::Add(name.cheap_clone(), attributes);
        Ok(self.derive(transition, |schema| {
            let mut properties = schema.properties.clone();
            properties.insert(
                name.cheap_clone(),
                SlotInfo {
                    index: schema.next_slot_index,
                    attributes,
                },
            );
            (properties, schema.next_slot_index + 1)
        }))
    }

    /// Return the schema without `name`.
    ///
    /// Absent names return `self`. Removing the last property returns the root
    /// schema so the emptied lineage can be reclaimed.
    pub fn delete_property(&self, name: &str) -> SchemaRef {
        let Some((key, _)) = self.0.properties.get_key_value(name) else {
            return self.cheap_clone();
        };
        if self.property_count() == 1 {
            return self.root_schema();
        }
        let key = key.cheap_clone();
        self.derive(Transition::Delete(key.cheap_clone()), |schema| {
            let mut properties = schema.properties.clone();
            properties.shift_remove(key.as_str());
            (properties, schema.next_slot_index)
        })
    }

    /// Return the schema with new attributes for `name`, keeping its slot.
    pub fn set_property_attributes(
        &self,
        name: &str,
        attributes: PropertyAttributes,
    ) -> Result<SchemaRef, JsError> {
        let Some((key, info)) = self.0.properties.get_key_value(name) else {
            return Err(JsError::property_not_found(name));
        };
        if info.attributes == attributes {
            return Ok(self.cheap_clone());
        }
        let key = key.cheap_clone();
        Ok(
            self.derive(Transition::Modify(key.cheap_clone(), attributes), |schema| {
                let mut properties = schema.properties.clone();
                if let Some(info) = properties.get_mut(key.as_str()) {
                    info.attributes = attributes;
                }
                (properties, schema.next_slot_index)
            }),
        )
    }

    /// Follow a memoized transition or build and memoize a new schema.
    fn derive(
        &self,
        transition: Transition,
        build: impl FnOnce(&PropertySchema) -> (IndexMap<JsString, SlotInfo>, usize),
    ) -> SchemaRef {
        if let Some(existing) = self
            .0
            .transitions
            .borrow()
            .get(&transition)
            .and_then(Weak::upgrade)
        {
            log::trace!(
                "schema {:#x}: reusing transition {:?} -> {:#x}",
                self.id(),
                transition,
                Rc::as_ptr(&existing) as *const () as usize
            );
            return SchemaRef(existing);
        }

        let (properties, next_slot_index) = build(self.0.as_ref());
        let derived = SchemaRef(Rc::new(PropertySchema {
            properties,
            next_slot_index,
            property_limit: self.0.property_limit,
            parent: Some(self.cheap_clone()),
            root: Some(self.root_schema()),
            transitions: RefCell::new(FxHashMap::default()),
        }));
        log::trace!(
            "schema {:#x}: new transition {:?} -> {:#x}",
            self.id(),
            transition,
            derived.id()
        );
        let mut transitions = self.0.transitions.borrow_mut();
        // Drop entries whose targets were reclaimed before adding another
        transitions.retain(|_, weak| weak.strong_count() > 0);
        transitions.insert(transition, Rc::downgrade(&derived.0));
        derived
    }
}

impl PartialEq for SchemaRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for SchemaRef {}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("properties", &self.property_count())
            .field("next_slot_index", &self.0.next_slot_index)
            .finish()
    }
}
