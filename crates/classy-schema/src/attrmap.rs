//! # Attribute-Access Mapping
//!
//! [`AttrMap`] is the ordered, string-keyed mapping that holds loaded
//! object data. Lookups through [`AttrMap::attr`] fail with the attempted key
//! and the keys that do exist, which is the explicit replacement for dotted
//! attribute access.
//!
//! ## Wrapping Invariant
//!
//! Values are [`Item`]s, and `Item` has no plain-mapping variant: inserting a
//! raw `serde_json::Value` converts every nested mapping into an `AttrMap`,
//! including mappings inside sequences. After construction no plain mapping
//! is reachable below any key.

use indexmap::map::{Entry, IntoIter, Iter, IterMut, Keys, Values};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use classy_core::ClassyError;

use crate::item::Item;

/// An ordered string-keyed mapping of loaded items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrMap {
    entries: IndexMap<String, Item>,
}

impl AttrMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapping with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert or update a key. Raw mappings are wrapped on the way in.
    ///
    /// Returns the previous value, if any. An updated key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Item>) -> Option<Item> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.entries.get(key)
    }

    /// Look up a key for mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Item> {
        self.entries.get_mut(key)
    }

    /// Look up a key, failing with the known keys when it is absent.
    ///
    /// # Errors
    ///
    /// Returns `ClassyError::MissingKey` naming `key` and every key present.
    pub fn attr(&self, key: &str) -> Result<&Item, ClassyError> {
        self.entries
            .get(key)
            .ok_or_else(|| ClassyError::missing_key(key, self.entries.keys()))
    }

    /// Mutable variant of [`attr`](AttrMap::attr).
    pub fn attr_mut(&mut self, key: &str) -> Result<&mut Item, ClassyError> {
        match self.entries.get_index_of(key) {
            Some(index) => Ok(&mut self.entries[index]),
            None => Err(ClassyError::missing_key(key, self.entries.keys())),
        }
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Item> {
        self.entries.shift_remove(key)
    }

    /// Return the value at `key`, inserting `default` first if it is absent.
    pub fn setdefault(&mut self, key: impl Into<String>, default: impl Into<Item>) -> &mut Item {
        match self.entries.entry(key.into()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default.into()),
        }
    }

    /// Insert every pair from `pairs`, in order.
    pub fn update<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Item>,
    {
        for (key, value) in pairs {
            self.insert(key, value);
        }
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in order.
    pub fn keys(&self) -> Keys<'_, String, Item> {
        self.entries.keys()
    }

    /// Values in key order.
    pub fn values(&self) -> Values<'_, String, Item> {
        self.entries.values()
    }

    /// Entries in order.
    pub fn iter(&self) -> Iter<'_, String, Item> {
        self.entries.iter()
    }

    /// Mutable entries in order.
    pub fn iter_mut(&mut self) -> IterMut<'_, String, Item> {
        self.entries.iter_mut()
    }

    /// Convert back to a plain JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for AttrMap {
    fn from(map: Map<String, Value>) -> Self {
        let mut out = Self::with_capacity(map.len());
        for (key, value) in map {
            out.insert(key, value);
        }
        out
    }
}

impl<K: Into<String>, V: Into<Item>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        out.update(iter);
        out
    }
}

impl IntoIterator for AttrMap {
    type Item = (String, Item);
    type IntoIter = IntoIter<String, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttrMap {
    type Item = (&'a String, &'a Item);
    type IntoIter = Iter<'a, String, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl PartialEq<Value> for AttrMap {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl Serialize for AttrMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
