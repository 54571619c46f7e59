//! version
//!
//! Version identifiers and the per-version handle.
//!
//! # Versions
//!
//! A model's content occupies up to two named slots on disk: the published
//! content and the pending changes. [`VersionId`] is the closed set of
//! those slots; [`Version`] binds one of them to a model and its storage
//! handler.
//!
//! # Save protocol
//!
//! [`Version::save`] implements update-or-create: it attempts an `update`
//! and falls back to `create` if and only if the update failed with
//! `NotFound`. The first write to a never-created slot therefore succeeds,
//! later writes take the update path, and a single writer needs no
//! existence check before writing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::content::Content;
use crate::fields::Fields;
use crate::language::Language;
use crate::model::Model;
use crate::storage::{ContentStorage, StorageError};

/// Error from parsing a version identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid version id: {0}")]
pub struct InvalidVersionId(String);

/// Identifies which on-disk slot content lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionId {
    /// The published content at the model root.
    Published,
    /// Pending changes in the `_changes` subdirectory.
    Changes,
}

impl VersionId {
    /// The identifier as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionId::Published => "published",
            VersionId::Changes => "changes",
        }
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VersionId {
    type Err = InvalidVersionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(VersionId::Published),
            "changes" => Ok(VersionId::Changes),
            other => Err(InvalidVersionId(other.to_string())),
        }
    }
}

/// A handle on one version of a model's content.
///
/// The handle is stateless beyond its two references: all content state
/// lives in storage, and every method forwards there directly. Repeated
/// [`Version::content`] calls re-read storage and are not guaranteed to
/// observe a consistent snapshot under concurrent writers; capture the
/// result once when a stable view is needed.
pub struct Version<'a, S: ContentStorage> {
    model: &'a Model,
    storage: &'a S,
    id: VersionId,
}

impl<'a, S: ContentStorage> Version<'a, S> {
    /// Create a handle for one version of a model's content.
    pub fn new(model: &'a Model, storage: &'a S, id: VersionId) -> Self {
        Self { model, storage, id }
    }

    /// The version this handle addresses.
    pub fn id(&self) -> VersionId {
        self.id
    }

    /// The model behind this handle.
    pub fn model(&self) -> &Model {
        self.model
    }

    /// Materialize the stored fields as a [`Content`] view.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the slot was never created.
    pub fn content(&self, language: &Language) -> Result<Content, StorageError> {
        Ok(Content::new(self.read(language)?, language.clone()))
    }

    /// Create this version slot with the given fields.
    pub fn create(&self, language: &Language, fields: Fields) -> Result<(), StorageError> {
        self.storage.create(self.id, language, fields)
    }

    /// Read the raw stored fields.
    pub fn read(&self, language: &Language) -> Result<Fields, StorageError> {
        self.storage.read(self.id, language)
    }

    /// Update this version slot.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the slot does not exist; see
    /// [`Version::save`] for the update-or-create protocol.
    pub fn update(&self, language: &Language, fields: Fields) -> Result<(), StorageError> {
        self.storage.update(self.id, language, fields)
    }

    /// Save fields to this version slot, creating it if needed.
    ///
    /// Attempts an update first and falls back to create only on
    /// `NotFound`; every other error propagates unchanged.
    pub fn save(&self, language: &Language, fields: Fields) -> Result<(), StorageError> {
        match self.storage.update(self.id, language, fields.clone()) {
            Err(e) if e.is_not_found() => self.storage.create(self.id, language, fields),
            result => result,
        }
    }

    /// Delete this version slot. Idempotent.
    pub fn delete(&self, language: &Language) -> Result<(), StorageError> {
        self.storage.delete(self.id, language)
    }

    /// Check whether this version slot exists.
    pub fn exists(&self, language: &Language) -> bool {
        self.storage.exists(self.id, language)
    }

    /// The slot's modification time, or `None` if it is absent.
    pub fn modified(&self, language: &Language) -> Option<chrono::DateTime<chrono::Utc>> {
        self.storage.modified(self.id, language)
    }

    /// Update the slot's modification time.
    pub fn touch(&self, language: &Language) -> Result<(), StorageError> {
        self.storage.touch(self.id, language)
    }

    /// Move this slot to another version/language combination.
    pub fn move_to(
        &self,
        from_language: &Language,
        to_version: VersionId,
        to_language: &Language,
    ) -> Result<(), StorageError> {
        self.storage
            .move_to(self.id, from_language, to_version, to_language)
    }
}

impl<S: ContentStorage> Clone for Version<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ContentStorage> Copy for Version<'_, S> {}

impl<S: ContentStorage> std::fmt::Debug for Version<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Version")
            .field("model", &self.model.kind())
            .field("id", &self.id)
            .finish()
    }
}
