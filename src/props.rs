//! Property bags handed to and produced by mapping functions.
//!
//! [`Props`] keeps insertion order so that merges behave like an object
//! spread: existing keys stay where they are, new keys are appended and the
//! right-hand side wins.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A shared function carried as a prop, e.g. a bound action creator.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// Whether both handles point at the same function.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// A single property value.
#[derive(Debug, Clone)]
pub enum Prop {
    /// Plain data.
    Value(Value),
    /// A callable, such as a bound action creator.
    Callback(Callback),
    /// Per-packet slices produced by a multi-packet mapper, indexed by the
    /// packet's position. `None` marks a packet without that half of the mapping.
    Packets(Vec<Option<Props>>),
}

impl PartialEq for Prop {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Prop::Value(a), Prop::Value(b)) => a == b,
            (Prop::Callback(a), Prop::Callback(b)) => a.ptr_eq(b),
            (Prop::Packets(a), Prop::Packets(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Value(value)
    }
}

impl From<Callback> for Prop {
    fn from(callback: Callback) -> Self {
        Prop::Callback(callback)
    }
}

/// Insertion-ordered property bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, Prop)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Self {
        self.insert(key, prop);
        self
    }

    /// Insert or overwrite `key`. An overwritten key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Option<Prop> {
        let key = key.into();
        let prop = prop.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, prop)),
            None => {
                self.entries.push((key, prop));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Prop> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, prop)| prop)
    }

    /// Data stored under `key`, if it is plain data.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.get(key)? {
            Prop::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Callable stored under `key`, if any.
    pub fn callback(&self, key: &str) -> Option<&Callback> {
        match self.get(key)? {
            Prop::Callback(callback) => Some(callback),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prop)> {
        self.entries.iter().map(|(k, prop)| (k.as_str(), prop))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shallow merge: every entry of `other` overwrites or extends `self`.
    pub fn extend(&mut self, other: Props) {
        for (key, prop) in other.entries {
            self.insert(key, prop);
        }
    }

    /// `{...self, ...other}`.
    pub fn merged(mut self, other: Props) -> Props {
        self.extend(other);
        self
    }
}

impl<K: Into<String>, P: Into<Prop>> FromIterator<(K, P)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (key, prop) in iter {
            props.insert(key, prop);
        }
        props
    }
}

impl IntoIterator for Props {
    type Item = (String, Prop);
    type IntoIter = std::vec::IntoIter<(String, Prop)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
