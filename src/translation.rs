//! translation
//!
//! Per-language views over a content version.
//!
//! A [`Translation`] pairs a [`Version`] handle with one language and
//! exposes the translation-shaped queries editing interfaces need: does
//! the translation exist, what is its content, does it carry a custom
//! slug.

use crate::content::Content;
use crate::fields::Fields;
use crate::language::Language;
use crate::storage::{ContentStorage, StorageError};
use crate::version::Version;

/// One language's view of a content version.
#[derive(Debug)]
pub struct Translation<'a, S: ContentStorage> {
    version: Version<'a, S>,
    language: &'a Language,
}

impl<S: ContentStorage> Clone for Translation<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ContentStorage> Copy for Translation<'_, S> {}

impl<'a, S: ContentStorage> Translation<'a, S> {
    /// Create a translation view.
    pub fn new(version: Version<'a, S>, language: &'a Language) -> Self {
        Self { version, language }
    }

    /// Create the translation on disk, then return the view.
    ///
    /// A custom slug, if given, is stored as the `slug` field alongside
    /// the other fields.
    pub fn create(
        version: Version<'a, S>,
        language: &'a Language,
        mut fields: Fields,
        slug: Option<&str>,
    ) -> Result<Self, StorageError> {
        if let Some(slug) = slug {
            fields.insert("slug", Some(slug.to_string()));
        }

        version.create(language, fields)?;

        Ok(Self { version, language })
    }

    /// The translation's language.
    pub fn language(&self) -> &Language {
        self.language
    }

    /// The language code, doubling as the translation id.
    pub fn id(&self) -> &str {
        self.language.code()
    }

    /// The version this translation belongs to.
    pub fn version(&self) -> Version<'a, S> {
        self.version
    }

    /// Check whether the translation file exists.
    pub fn exists(&self) -> bool {
        self.version.exists(self.language)
    }

    /// The translation's content.
    pub fn content(&self) -> Result<Content, StorageError> {
        self.version.content(self.language)
    }

    /// The custom slug stored in the translation, if any.
    pub fn slug(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .version
            .read(self.language)?
            .value("slug")
            .map(str::to_string))
    }
}
