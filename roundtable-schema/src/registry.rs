//! Name-keyed entity tables.

use std::collections::HashMap;
use std::fmt;

/// Something with a stable, unique name.
pub trait Identity {
    /// The key this entity is registered under.
    fn identity(&self) -> &str;
}

impl<T: Identity + ?Sized> Identity for &T {
    fn identity(&self) -> &str {
        (**self).identity()
    }
}

/// Insertion-ordered lookup table keyed by [`Identity::identity`].
///
/// Registries are cheap to build and are rebuilt from entity lists whenever
/// lookups are needed rather than cached alongside them.
#[derive(Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Identity> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert `entry`, replacing any entry with the same identity in place.
    /// Returns the replaced entry.
    pub fn add(&mut self, entry: T) -> Option<T> {
        match self.index.get(entry.identity()).copied() {
            Some(i) => Some(std::mem::replace(&mut self.entries[i], entry)),
            None => {
                self.index
                    .insert(entry.identity().to_owned(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Insert `entry` only if its identity is new. A duplicate is handed back.
    pub fn insert_unique(&mut self, entry: T) -> Result<(), T> {
        if self.contains(entry.identity()) {
            return Err(entry);
        }
        self.add(entry);
        Ok(())
    }

    /// Look up by key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Look up by key, or build the caller's error.
    pub fn get_or_fail<E>(&self, key: &str, err: impl FnOnce() -> E) -> Result<&T, E> {
        self.get(key).ok_or_else(err)
    }

    /// Whether the key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Identity::identity)
    }
}

impl<T: Identity> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identity> FromIterator<T> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut registry = Self::new();
        for entry in iter {
            registry.add(entry);
        }
        registry
    }
}

impl<'a, T: Identity> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Identity> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
