//! storage
//!
//! The content storage contract and its plain-text implementation.
//!
//! # Contract
//!
//! [`ContentStorage`] is the boundary between content models and physical
//! storage. Every operation addresses one slot, keyed by version and
//! language. The error taxonomy is load-bearing:
//!
//! - [`StorageError::NotFound`] marks a slot that was never created. It is
//!   the only legitimate trigger for the save protocol's fallback from
//!   `update` to `create`.
//! - [`StorageError::InvalidRequest`] marks structurally invalid requests,
//!   such as addressing content files for draft pages. Callers must treat
//!   it as a hard validation failure.
//! - [`StorageError::Io`] marks OS-level failures. They are unrecoverable
//!   for the current operation and are surfaced, never retried.
//!
//! # Concurrency
//!
//! Handlers are stateless and issue blocking filesystem calls; writes
//! replace files atomically (temp file + rename), so concurrent readers
//! observe either the old or the new complete content. Nothing serializes
//! concurrent writers; deployments with simultaneous editors need their
//! own coordination on top.

pub mod codec;
pub mod plain_text;

pub use plain_text::PlainTextStorage;

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

use crate::fields::Fields;
use crate::language::Language;
use crate::version::VersionId;

/// Errors from content storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The addressed version/language slot was never created.
    #[error("content file not found: {path}")]
    NotFound { path: PathBuf },

    /// The request is structurally invalid for this model.
    #[error("invalid storage request: {0}")]
    InvalidRequest(String),

    /// An OS-level operation failed for a reason other than absence.
    #[error("storage failure at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Check for the save protocol's creation trigger.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Storage contract for versioned, per-language content.
///
/// Implementations persist one field map per `(version, language)` slot.
/// `create` and `update` are deliberately separate: `update` fails with
/// [`StorageError::NotFound`] on a slot that was never created, which lets
/// callers implement update-or-create without a stat-then-write race for a
/// single writer.
pub trait ContentStorage {
    /// Create a version slot.
    ///
    /// Succeeds even if nothing previously existed. The field map is
    /// normalized before it is written.
    fn create(
        &self,
        version: VersionId,
        language: &Language,
        fields: Fields,
    ) -> Result<(), StorageError>;

    /// Read the stored field map.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the slot was never created.
    fn read(&self, version: VersionId, language: &Language) -> Result<Fields, StorageError>;

    /// Update an existing version slot.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the slot does not exist. This is the
    /// signal that distinguishes update from create for callers.
    fn update(
        &self,
        version: VersionId,
        language: &Language,
        fields: Fields,
    ) -> Result<(), StorageError>;

    /// Delete a version slot.
    ///
    /// Idempotent: deleting an absent slot succeeds. Empty containing
    /// directories are cleaned up afterwards.
    fn delete(&self, version: VersionId, language: &Language) -> Result<(), StorageError>;

    /// Check whether a version slot exists.
    ///
    /// A slot that cannot be addressed for this model does not exist.
    fn exists(&self, version: VersionId, language: &Language) -> bool;

    /// The slot's modification time, or `None` if it is absent.
    fn modified(&self, version: VersionId, language: &Language) -> Option<DateTime<Utc>>;

    /// Update the slot's modification time without touching its content.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the slot does not exist.
    fn touch(&self, version: VersionId, language: &Language) -> Result<(), StorageError>;

    /// Relocate a stored slot to another version/language combination.
    ///
    /// Usable to promote changes to published content or to move content
    /// across languages. Fields are not re-normalized; they were already
    /// normalized by the original write.
    fn move_to(
        &self,
        from_version: VersionId,
        from_language: &Language,
        to_version: VersionId,
        to_language: &Language,
    ) -> Result<(), StorageError>;
}
