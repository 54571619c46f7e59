//! lock
//!
//! Editing locks derived from stored content.
//!
//! # Design
//!
//! A lock is not its own entity on disk. It is recomputed on demand from
//! the changes slot: the `lock` field holds the editing user's id, and the
//! slot's modification time doubles as the lock timestamp. Acquiring or
//! releasing a lock is therefore a side effect of writing or removing the
//! `lock` field, performed by the surrounding model layer.
//!
//! This is an advisory, application-level lock recorded as ordinary
//! content data. It keeps two human editors from silently clobbering each
//! other's pending changes; it is no protection against concurrent
//! processes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ContentConfig;
use crate::language::Languages;
use crate::storage::{ContentStorage, StorageError};
use crate::users::{User, Users};
use crate::version::VersionId;

/// Serializable lock snapshot for editing interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockState {
    #[serde(rename = "isActive")]
    pub is_active: bool,
    pub modified: DateTime<Utc>,
    pub user: LockUser,
}

/// The lock owner as exposed to editing interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockUser {
    pub id: String,
    pub email: Option<String>,
}

/// The editing-lock state of a model.
///
/// State is recomputed fresh on every construction and never mutated in
/// place. The owner is never null: content without a stored lock marker
/// reports the current user as owner and is inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    user: User,
    modified: DateTime<Utc>,
    active: bool,
}

impl Lock {
    /// Derive the lock state for the model behind a storage handler.
    ///
    /// Returns `Ok(None)` when content locking is disabled. The stored
    /// lock owner is resolved through the `users` registry; a stale id
    /// that no longer resolves falls back to the current user. The
    /// `authenticated` override replaces the current user for the
    /// active-check only.
    ///
    /// # Errors
    ///
    /// Propagates storage failures other than an absent changes slot.
    pub fn for_model<S: ContentStorage>(
        storage: &S,
        languages: &Languages,
        users: &Users,
        config: &ContentConfig,
        current: &User,
        authenticated: Option<&User>,
    ) -> Result<Option<Lock>, StorageError> {
        if !config.locking() {
            return Ok(None);
        }

        let authenticated = authenticated.unwrap_or(current);
        let language = languages.default();

        // read the changes slot raw; the lock field is storage metadata,
        // not content to present
        let (owner, modified) = match storage.read(VersionId::Changes, language) {
            Ok(data) => {
                let owner = data
                    .value("lock")
                    .and_then(|id| users.find(id))
                    .cloned();
                let modified = storage.modified(VersionId::Changes, language);
                (owner, modified)
            }
            // no changes exist, so nothing holds a lock
            Err(e) if e.is_not_found() => (None, None),
            Err(e) => return Err(e),
        };

        let user = owner.unwrap_or_else(|| current.clone());
        let modified = modified.unwrap_or_else(Utc::now);
        let active = !user.is(authenticated);

        Ok(Some(Lock {
            user,
            modified,
            active,
        }))
    }

    /// The lock owner.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The lock timestamp.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Check whether someone else is editing.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The lock as a serializable snapshot.
    pub fn state(&self) -> LockState {
        LockState {
            is_active: self.active,
            modified: self.modified,
            user: LockUser {
                id: self.user.id().to_string(),
                email: self.user.email().map(str::to_string),
            },
        }
    }

    /// The lock snapshot as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "isActive": self.active,
            "modified": self.modified,
            "user": {
                "id": self.user.id(),
                "email": self.user.email(),
            },
        })
    }
}
