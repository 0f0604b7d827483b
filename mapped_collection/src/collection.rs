//! Ordered backing collections and shape normalisation.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::{CollectionResult, ElementKey, LifecycleEvent, MappedCollectionError};

/// Ordered mapping from element key to element data.
///
/// A collection remembers whether it was built from a JSON array. Converting
/// back with [`Collection::into_value`] yields an array again as long as the
/// keys still run `0..len` in order; otherwise the result is an object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    entries: IndexMap<ElementKey, Value>,
    list: bool,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    /// Create an empty, list-shaped collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            list: true,
        }
    }

    /// Normalise collection data received during `event`.
    ///
    /// `null` becomes an empty collection, arrays and objects are accepted,
    /// and every other value is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::WrongShape`] for scalar input.
    pub fn from_value(value: Value, event: LifecycleEvent) -> CollectionResult<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Array(items) => Ok(Self {
                entries: items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| (ElementKey::Index(index), item))
                    .collect(),
                list: true,
            }),
            Value::Object(map) => Ok(Self {
                entries: map
                    .into_iter()
                    .map(|(key, item)| (ElementKey::parse(&key), item))
                    .collect(),
                list: false,
            }),
            other => Err(MappedCollectionError::wrong_shape(event, &other)),
        }
    }

    /// Normalise raw submitted input, which additionally treats an empty
    /// string as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::WrongShape`] for scalar input.
    pub fn from_submitted(value: Value, event: LifecycleEvent) -> CollectionResult<Self> {
        if value.as_str().is_some_and(str::is_empty) {
            return Ok(Self::new());
        }
        Self::from_value(value, event)
    }

    /// Returns the data stored at `key`.
    #[must_use]
    pub fn get(&self, key: &ElementKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns mutable access to the data stored at `key`.
    pub fn get_mut(&mut self, key: &ElementKey) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns `true` when an entry exists at `key`.
    #[must_use]
    pub fn contains_key(&self, key: &ElementKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert `value` at `key`, keeping the position of an existing entry
    /// and appending new ones.
    pub fn insert(&mut self, key: ElementKey, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Remove the entry at `key`, preserving the order of the rest.
    pub fn remove(&mut self, key: &ElementKey) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Keep only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ElementKey, &Value) -> bool,
    {
        self.entries.retain(|key, value| keep(key, value));
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &ElementKey> {
        self.entries.keys()
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ElementKey, Value> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the collection has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert the collection back into JSON.
    #[must_use]
    pub fn into_value(self) -> Value {
        if self.list && self.is_sequential() {
            Value::Array(self.entries.into_values().collect())
        } else {
            Value::Object(
                self.entries
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect::<Map<_, _>>(),
            )
        }
    }

    /// Clone the collection into JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    fn is_sequential(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(position, key)| key.as_index() == Some(position))
    }
}

impl FromIterator<(ElementKey, Value)> for Collection {
    fn from_iter<I: IntoIterator<Item = (ElementKey, Value)>>(iter: I) -> Self {
        let entries: IndexMap<_, _> = iter.into_iter().collect();
        let list = entries.keys().all(|key| key.as_index().is_some());
        Self { entries, list }
    }
}

impl IntoIterator for Collection {
    type Item = (ElementKey, Value);
    type IntoIter = indexmap::map::IntoIter<ElementKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a ElementKey, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, ElementKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
