//! Shared collection aliases.
//!
//! Every hash map in the crate is keyed by interned strings or small integers,
//! so the FxHasher is used throughout. Ordered maps (schemas enumerate in
//! insertion order) go through `indexmap` with the same hasher.

pub use rustc_hash::{FxHashMap, FxHashSet};

// ═══════════════════════════════════════════════════════════════════════════════
// IndexMap - uses FxHasher
// ═══════════════════════════════════════════════════════════════════════════════

pub type IndexMap<K, V> =
    indexmap::IndexMap<K, V, core::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

/// Create an empty IndexMap
#[inline]
pub fn index_map_new<K, V>() -> IndexMap<K, V>
where
    K: core::hash::Hash + Eq,
{
    indexmap::IndexMap::with_hasher(Default::default())
}
