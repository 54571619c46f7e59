//! content
//!
//! In-memory field access for stored content.
//!
//! # Overview
//!
//! [`Content`] is a keyed view over one version's raw field map. Lookups
//! are case-insensitive and never fail: a missing field is a normal,
//! empty-valued state represented by a null [`Field`], not an error.
//!
//! Field wrappers are constructed lazily and cached. The cache is always
//! derivable from the raw data and is cleared on every mutating call, so a
//! wrapper can never outlive the data it was built from.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::blueprint::Blueprint;
use crate::fields::Fields;
use crate::language::Language;

/// A single content field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    key: String,
    value: Option<String>,
}

impl Field {
    fn new(key: String, value: Option<String>) -> Self {
        Self { key, value }
    }

    /// The lower-cased field key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw value, or `None` for missing and null fields.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Check whether the field has no usable value.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            None => true,
            Some(v) => v.trim().is_empty(),
        }
    }

    /// The value, or the given fallback when the field is empty.
    pub fn or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.is_empty() {
            fallback
        } else {
            self.value.as_deref().unwrap_or(fallback)
        }
    }
}

/// A keyed view over a version's raw field map.
pub struct Content {
    language: Language,
    data: Fields,
    // lazily built wrappers; cleared whenever data changes
    cache: RefCell<HashMap<String, Field>>,
}

impl Content {
    /// Create a content view over a raw field map.
    pub fn new(data: Fields, language: Language) -> Self {
        Self {
            language,
            data,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The raw field map.
    pub fn data(&self) -> &Fields {
        &self.data
    }

    /// The language this content belongs to.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Get a field by key, case-insensitively.
    ///
    /// Unknown keys yield a null-valued field; this never fails.
    pub fn get(&self, key: &str) -> Field {
        let key = key.to_lowercase();

        if let Some(field) = self.cache.borrow().get(&key) {
            return field.clone();
        }

        let field = Field::new(key.clone(), self.data.value(&key).map(str::to_string));
        self.cache.borrow_mut().insert(key, field.clone());
        field
    }

    /// Check whether a field has a stored value.
    pub fn has(&self, key: &str) -> bool {
        self.data.value(key).is_some()
    }

    /// All field keys in storage order.
    pub fn keys(&self) -> Vec<&str> {
        self.data.keys().collect()
    }

    /// Materialize wrappers for every stored field.
    pub fn fields(&self) -> Vec<Field> {
        self.data.keys().map(|key| self.get(key)).collect()
    }

    /// Update the field map.
    ///
    /// With `overwrite` the map is replaced entirely; otherwise the new
    /// fields are merged in, winning on conflict. Either way the wrapper
    /// cache is cleared.
    pub fn update(&mut self, fields: Fields, overwrite: bool) {
        if overwrite {
            self.data = fields;
        } else {
            self.data.merge(fields);
        }
        self.cache.borrow_mut().clear();
    }

    /// A copy of this content without the given keys.
    ///
    /// The original is untouched; the copy starts with a fresh cache.
    pub fn not(&self, keys: &[&str]) -> Content {
        let mut data = self.data.clone();
        for key in keys {
            data.remove(key);
        }
        Content::new(data, self.language.clone())
    }

    /// Migrate the field map to a different blueprint.
    ///
    /// For every field the new blueprint declares: if the old blueprint
    /// declares a field of the same name and the same type, the current
    /// value is carried over; otherwise the new field's declared default
    /// applies. Fields unknown to the new blueprint are preserved
    /// verbatim, so converting never drops custom or legacy data.
    ///
    /// This is a pure transform; replacing the stored file is up to the
    /// caller.
    pub fn convert_to(&self, old: &Blueprint, new: &Blueprint) -> Fields {
        let mut converted = Fields::new();

        for field in new.fields() {
            let value = match old.field(field.name()) {
                Some(previous) if previous.field_type() == field.field_type() => {
                    self.get(field.name()).value().map(str::to_string)
                }
                _ => field.default().map(str::to_string),
            };
            converted.insert(field.name(), value);
        }

        // preserve existing fields the new blueprint doesn't mention
        let mut result = self.data.clone();
        result.merge(converted);
        result
    }
}

impl Clone for Content {
    fn clone(&self) -> Self {
        // the cache is derived state; a clone starts fresh
        Content::new(self.data.clone(), self.language.clone())
    }
}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Content")
            .field("language", &self.language)
            .field("data", &self.data)
            .finish()
    }
}
