//! fields
//!
//! The raw field map exchanged with content storage.
//!
//! # Design
//!
//! [`Fields`] maps lower-cased field names to raw string values. A value of
//! `None` marks a field as null ("delete/absent"); storage skips null values
//! at write time. The map preserves insertion order because content files are
//! meant to be human-diffable and normalization relies on placing well-known
//! keys (`title`, `slug`) first.
//!
//! Present-with-null and absent are distinct states: normalization rules for
//! file models only inject a `template` key when the caller did not mention
//! the key at all.
//!
//! # Example
//!
//! ```
//! use folio::fields::Fields;
//!
//! let mut fields = Fields::new();
//! fields.insert("Title", Some("Home".to_string()));
//! fields.insert("text", None);
//!
//! assert_eq!(fields.value("title"), Some("Home"));
//! assert!(fields.contains_key("text"));
//! assert_eq!(fields.value("text"), None);
//! ```

/// An insertion-ordered map from lower-cased field name to raw value.
///
/// Keys are lower-cased on insert, so lookups are case-insensitive by
/// construction. Content maps are small (tens of fields), so the map is
/// backed by a plain vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, Option<String>)>,
}

impl Fields {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in the map, including null-valued ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a field.
    ///
    /// Replacing keeps the field's original position; new keys are appended.
    pub fn insert(&mut self, key: impl AsRef<str>, value: Option<String>) {
        let key = key.as_ref().to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a field, returning its value if the key was present.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        let key = key.to_lowercase();
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Look up a field.
    ///
    /// The outer `Option` distinguishes an absent key from a present one;
    /// the inner `Option` is the value itself (`None` = null).
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Look up a field's non-null value.
    ///
    /// Returns `None` both for absent keys and for null values; the two are
    /// the same empty state for readers.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    /// Check whether a key is present, even with a null value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Merge another map into this one.
    ///
    /// Keys from `other` win on conflict but keep their original position;
    /// new keys are appended in `other`'s order.
    pub fn merge(&mut self, other: Fields) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// Reorder the map so that `front`'s keys come first.
    ///
    /// Values from `front` win on conflict; remaining keys keep their
    /// relative order.
    pub fn prepend(&mut self, front: Fields) {
        let mut entries = front.entries;
        for (key, value) in self.entries.drain(..) {
            if !entries.iter().any(|(k, _)| *k == key) {
                entries.push((key, value));
            }
        }
        self.entries = entries;
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Option<String>)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Fields {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }
}
