//! storage::plain_text
//!
//! Content storage backed by plain-text files in the content folder.
//!
//! # Layout
//!
//! Published content lives at the model's root; pending changes live in a
//! `_changes` subdirectory beneath it:
//!
//! ```text
//! content/blog/my-post/
//! ├── article.txt            published
//! ├── article.de.txt         published, German translation
//! └── _changes/
//!     └── article.txt        pending changes
//! ```
//!
//! File models store their content next to the file itself
//! (`image.jpg.txt` alongside `image.jpg`), so their base directory is the
//! parent of the model root.
//!
//! # Invariants
//!
//! - At most one file exists per (version, language) slot.
//! - Writes are atomic: content is written to a temp file in the target
//!   directory, synced, then renamed into place.
//! - Deleting the last file of a `_changes` directory removes the
//!   directory as well.
//! - Draft pages cannot be addressed: their root already encodes the
//!   draft state, and both version slots are rejected.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{codec, ContentStorage, StorageError};
use crate::config::ContentConfig;
use crate::fields::Fields;
use crate::language::Language;
use crate::model::Model;
use crate::version::VersionId;

/// Subdirectory holding the pending-changes version of a model's content.
pub const CHANGES_DIR: &str = "_changes";

/// Content storage handler using plain-text files.
///
/// The handler is stateless: the model and configuration are borrowed at
/// construction and every path is recomputed per call, so constructing one
/// handler per operation is fine.
///
/// # Example
///
/// ```no_run
/// use folio::config::ContentConfig;
/// use folio::blueprint::Blueprint;
/// use folio::fields::Fields;
/// use folio::language::Language;
/// use folio::model::{Model, Page};
/// use folio::storage::{ContentStorage, PlainTextStorage};
/// use folio::version::VersionId;
///
/// let config = ContentConfig::default();
/// let model: Model = Page::new("/content/home", "default", Blueprint::empty("default")).into();
/// let storage = PlainTextStorage::new(&model, &config);
///
/// let fields: Fields = [("title", "Home")].into_iter().collect();
/// storage.create(VersionId::Published, &Language::single(), fields)?;
/// # Ok::<(), folio::storage::StorageError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlainTextStorage<'a> {
    model: &'a Model,
    config: &'a ContentConfig,
}

impl<'a> PlainTextStorage<'a> {
    /// Create a storage handler for a model.
    pub fn new(model: &'a Model, config: &'a ContentConfig) -> Self {
        Self { model, config }
    }

    /// The model this handler stores content for.
    pub fn model(&self) -> &Model {
        self.model
    }

    /// The base directory for a version of the model's content.
    pub fn directory(&self, version: VersionId) -> PathBuf {
        let base = match self.model {
            // content files for attachments live alongside the file,
            // not inside it
            Model::File(_) => self
                .model
                .root()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.model.root().to_path_buf()),
            Model::Page(_) | Model::Site(_) | Model::User(_) => self.model.root().to_path_buf(),
        };

        match version {
            VersionId::Published => base,
            VersionId::Changes => base.join(CHANGES_DIR),
        }
    }

    /// The absolute path of the content file for a version and language.
    ///
    /// # Errors
    ///
    /// [`StorageError::InvalidRequest`] when addressing either version of a
    /// draft page: the draft root already encodes the draft state, so
    /// neither a published nor a changes file can exist for it.
    pub fn content_file(
        &self,
        version: VersionId,
        language: &Language,
    ) -> Result<PathBuf, StorageError> {
        let stem = match self.model {
            Model::Page(page) => {
                if page.is_draft() {
                    return Err(match version {
                        VersionId::Published => StorageError::InvalidRequest(
                            "drafts cannot have a published content file".into(),
                        ),
                        VersionId::Changes => StorageError::InvalidRequest(
                            "drafts cannot have a changes file".into(),
                        ),
                    });
                }
                page.template()
            }
            Model::File(file) => file.filename(),
            Model::Site(_) => "site",
            Model::User(_) => "user",
        };

        Ok(self.directory(version).join(self.filename(stem, language)))
    }

    /// Build a content filename from a stem and a language.
    ///
    /// The single-language marker never carries a language suffix.
    fn filename(&self, stem: &str, language: &Language) -> String {
        let extension = self.config.content_extension();

        if language.is_single() {
            format!("{stem}.{extension}")
        } else {
            format!("{stem}.{}.{extension}", language.code())
        }
    }

    /// Normalize fields before they get saved.
    ///
    /// Applied to every outgoing write and never to reads. Normalization
    /// is idempotent: applying it to its own output is a no-op.
    fn normalize(&self, language: &Language, mut fields: Fields) -> Fields {
        if !language.is_default() {
            // non-default translations never carry untranslatable content
            for field in self.model.blueprint().untranslatable() {
                fields.insert(field.name(), None);
            }

            if self.config.uuids() && fields.contains_key("uuid") {
                fields.insert("uuid", None);
            }
        }

        match self.model {
            Model::File(file) => {
                // only add the template if the caller didn't explicitly
                // unset the key
                if !fields.contains_key("template") {
                    if let Some(template) = file.template_name() {
                        fields.insert("template", Some(template.to_string()));
                    }
                }
                fields
            }
            Model::Page(_) => {
                let mut front = Fields::new();
                front.insert("title", fields.value("title").map(str::to_string));
                front.insert("slug", fields.value("slug").map(str::to_string));
                fields.prepend(front);
                fields
            }
            Model::Site(_) => {
                // always put the title first
                let mut front = Fields::new();
                front.insert("title", fields.value("title").map(str::to_string));
                fields.prepend(front);
                fields
            }
            Model::User(_) => {
                // identity attributes are owned by the account system and
                // never stored in the content body
                for key in ["email", "language", "name", "password", "role"] {
                    fields.remove(key);
                }
                fields
            }
        }
    }

    /// Normalize and write the field map for a slot, atomically.
    fn write(
        &self,
        version: VersionId,
        language: &Language,
        fields: Fields,
    ) -> Result<(), StorageError> {
        let path = self.content_file(version, language)?;
        let fields = self.normalize(language, fields);
        let text = codec::encode(&fields);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // write to a temp file in the same directory for atomic rename
        let temp_path = {
            let mut name = path.as_os_str().to_os_string();
            name.push(".tmp");
            PathBuf::from(name)
        };

        {
            let mut file = fs::File::create(&temp_path).map_err(|e| StorageError::Io {
                path: temp_path.clone(),
                source: e,
            })?;

            file.write_all(text.as_bytes())
                .map_err(|e| StorageError::Io {
                    path: temp_path.clone(),
                    source: e,
                })?;

            file.sync_all().map_err(|e| StorageError::Io {
                path: temp_path.clone(),
                source: e,
            })?;
        }

        fs::rename(&temp_path, &path).map_err(|e| StorageError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

impl ContentStorage for PlainTextStorage<'_> {
    fn create(
        &self,
        version: VersionId,
        language: &Language,
        fields: Fields,
    ) -> Result<(), StorageError> {
        debug!(
            kind = self.model.kind(),
            version = %version,
            language = %language,
            "creating content file"
        );
        self.write(version, language, fields)
    }

    fn read(&self, version: VersionId, language: &Language) -> Result<Fields, StorageError> {
        let path = self.content_file(version, language)?;

        if !path.is_file() {
            return Err(StorageError::NotFound { path });
        }

        let text = fs::read_to_string(&path).map_err(|e| StorageError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(codec::decode(&text))
    }

    fn update(
        &self,
        version: VersionId,
        language: &Language,
        fields: Fields,
    ) -> Result<(), StorageError> {
        let path = self.content_file(version, language)?;

        // an update must target an existing slot; absence is the signal
        // for callers to create instead
        if !path.is_file() {
            return Err(StorageError::NotFound { path });
        }

        debug!(
            kind = self.model.kind(),
            version = %version,
            language = %language,
            "updating content file"
        );
        self.write(version, language, fields)
    }

    fn delete(&self, version: VersionId, language: &Language) -> Result<(), StorageError> {
        let path = self.content_file(version, language)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(
                    kind = self.model.kind(),
                    version = %version,
                    language = %language,
                    "deleted content file"
                );
            }
            // already absent: the desired end state is reached
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::Io { path, source: e }),
        }

        // clean up empty directories
        if let Some(dir) = path.parent() {
            let is_empty = match fs::read_dir(dir) {
                Ok(mut entries) => entries.next().is_none(),
                Err(_) => false,
            };

            if is_empty {
                fs::remove_dir(dir).map_err(|e| StorageError::Io {
                    path: dir.to_path_buf(),
                    source: e,
                })?;
            }
        }

        Ok(())
    }

    fn exists(&self, version: VersionId, language: &Language) -> bool {
        match self.content_file(version, language) {
            Ok(path) => path.is_file(),
            Err(_) => false,
        }
    }

    fn modified(&self, version: VersionId, language: &Language) -> Option<DateTime<Utc>> {
        let path = self.content_file(version, language).ok()?;
        let modified = fs::metadata(&path).ok()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    fn touch(&self, version: VersionId, language: &Language) -> Result<(), StorageError> {
        let path = self.content_file(version, language)?;

        let file = match fs::OpenOptions::new().write(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound { path });
            }
            Err(e) => return Err(StorageError::Io { path, source: e }),
        };

        file.set_modified(std::time::SystemTime::now())
            .map_err(|e| StorageError::Io { path, source: e })
    }

    fn move_to(
        &self,
        from_version: VersionId,
        from_language: &Language,
        to_version: VersionId,
        to_language: &Language,
    ) -> Result<(), StorageError> {
        let from = self.content_file(from_version, from_language)?;
        let to = self.content_file(to_version, to_language)?;

        if !from.is_file() {
            return Err(StorageError::NotFound { path: from });
        }

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!(
            kind = self.model.kind(),
            from = %from.display(),
            to = %to.display(),
            "moving content file"
        );

        if fs::rename(&from, &to).is_err() {
            // rename can fail across filesystems; fall back to copy + unlink
            fs::copy(&from, &to).map_err(|e| StorageError::Io {
                path: to.clone(),
                source: e,
            })?;
            fs::remove_file(&from).map_err(|e| StorageError::Io {
                path: from.clone(),
                source: e,
            })?;
        }

        Ok(())
    }
}
