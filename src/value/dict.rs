use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::value::{Number, Reference, Value};

/// Insertion-ordered tag dictionary: one record, or grid/column meta.
///
/// Keys are unique; inserting an existing key replaces the value in place.
/// Equality ignores entry order.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: Vec<(String, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Set `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`Dict::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder shorthand for a marker tag.
    pub fn with_marker(self, key: impl Into<String>) -> Self {
        self.with(key, Value::Marker)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Apply `diff` to this dict: every entry is set, except entries holding
    /// [`Value::Remove`], which delete the key instead. Mutates and returns
    /// the receiver; copy first if a snapshot is needed.
    pub fn merge(&mut self, diff: &Dict) -> &mut Self {
        for (key, value) in diff.iter() {
            if matches!(value, Value::Remove) {
                self.remove(key);
            } else {
                self.insert(key, value.clone());
            }
        }
        self
    }

    // Typed accessors

    pub fn id(&self) -> Option<&Reference> {
        self.get_ref("id")
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_number(&self, key: &str) -> Option<&Number> {
        match self.get(key) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(Value::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_ref(&self, key: &str) -> Option<&Reference> {
        match self.get(key) {
            Some(Value::Reference(r)) => Some(r),
            _ => None,
        }
    }

    /// The record's label from `dis` or `name`, if either is a string.
    pub fn dis_or_none(&self) -> Option<&str> {
        self.get_str("dis").or_else(|| self.get_str("name"))
    }

    /// The record's label, falling back to the id's display name.
    pub fn dis(&self) -> &str {
        self.dis_or_none()
            .or_else(|| self.id().and_then(Reference::dis))
            .unwrap_or("????")
    }
}

/// Patch `target` with `diff` using tombstone semantics. See [`Dict::merge`].
pub fn apply_diff<'a>(target: &'a mut Dict, diff: &Dict) -> &'a mut Dict {
    target.merge(diff)
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Dict {}

impl Hash for Dict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // order-independent: combine per-entry hashes commutatively
        let mut acc: u64 = 0;
        for (k, v) in self.iter() {
            let mut h = DefaultHasher::new();
            k.hash(&mut h);
            v.hash(&mut h);
            acc = acc.wrapping_add(h.finish());
        }
        self.len().hash(state);
        acc.hash(state);
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dict {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Dict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl IntoIterator for Dict {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Tag rendering: `name` for markers, `name:val` otherwise, space separated.
impl fmt::Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(k)?;
            if !matches!(v, Value::Marker) {
                write!(f, ":{v}")?;
            }
        }
        Ok(())
    }
}
