//! language
//!
//! Languages identify the translation a content file belongs to.
//!
//! # Single-language sites
//!
//! Sites without multilingual support use the distinguished
//! [`Language::single`] marker. It has an empty code, counts as the default
//! language, and content filenames for it never carry a language suffix.
//!
//! # Example
//!
//! ```
//! use folio::language::{Language, Languages};
//!
//! let languages = Languages::new(vec![
//!     Language::new("en", true).unwrap(),
//!     Language::new("de", false).unwrap(),
//! ])
//! .unwrap();
//!
//! assert_eq!(languages.default().code(), "en");
//! assert!(languages.find("de").is_some());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from language construction and registry validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
    #[error("invalid language code: {0}")]
    InvalidCode(String),

    #[error("language set must contain exactly one default language")]
    NoDefault,

    #[error("language set contains more than one default language")]
    MultipleDefaults,

    #[error("duplicate language code: {0}")]
    DuplicateCode(String),
}

/// A translation locale, identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    code: String,
    default: bool,
}

impl Language {
    /// Create a validated language.
    ///
    /// Codes are normalized to lowercase and may only contain ASCII
    /// letters, digits, `-` and `_`.
    ///
    /// # Errors
    ///
    /// Returns `LanguageError::InvalidCode` for an empty code or a code
    /// with characters outside the allowed set.
    pub fn new(code: impl Into<String>, default: bool) -> Result<Self, LanguageError> {
        let code = code.into().to_lowercase();

        if code.is_empty() {
            return Err(LanguageError::InvalidCode(
                "language code cannot be empty".into(),
            ));
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(LanguageError::InvalidCode(code));
        }

        Ok(Self { code, default })
    }

    /// The marker for sites without multilingual support.
    ///
    /// Content filenames for this language never carry a language suffix.
    pub fn single() -> Self {
        Self {
            code: String::new(),
            default: true,
        }
    }

    /// Get the language code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Check whether this is the default language.
    ///
    /// The single-language marker always counts as default.
    pub fn is_default(&self) -> bool {
        self.default
    }

    /// Check whether this is the single-language marker.
    pub fn is_single(&self) -> bool {
        self.code.is_empty()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// The set of languages a site stores content in.
///
/// A valid set contains exactly one default language and unique codes.
/// Single-language sites use [`Languages::single`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    list: Vec<Language>,
}

impl Languages {
    /// Create a validated language set.
    ///
    /// # Errors
    ///
    /// - `LanguageError::NoDefault` if no language is marked default
    /// - `LanguageError::MultipleDefaults` if more than one is
    /// - `LanguageError::DuplicateCode` for repeated codes
    pub fn new(list: Vec<Language>) -> Result<Self, LanguageError> {
        match list.iter().filter(|l| l.is_default()).count() {
            0 => return Err(LanguageError::NoDefault),
            1 => {}
            _ => return Err(LanguageError::MultipleDefaults),
        }

        for (index, language) in list.iter().enumerate() {
            if list[..index].iter().any(|l| l.code() == language.code()) {
                return Err(LanguageError::DuplicateCode(language.code().to_string()));
            }
        }

        Ok(Self { list })
    }

    /// The set for a site without multilingual support.
    pub fn single() -> Self {
        Self {
            list: vec![Language::single()],
        }
    }

    /// Get the default language.
    pub fn default(&self) -> &Language {
        // the constructor guarantees exactly one default
        self.list
            .iter()
            .find(|l| l.is_default())
            .unwrap_or(&self.list[0])
    }

    /// Find a language by its code.
    pub fn find(&self, code: &str) -> Option<&Language> {
        let code = code.to_lowercase();
        self.list.iter().find(|l| l.code() == code)
    }

    /// Check whether this set holds real translations rather than the
    /// single-language marker.
    pub fn is_multilingual(&self) -> bool {
        !self.list.iter().any(|l| l.is_single())
    }

    /// Iterate over all languages, default first as given.
    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalized_to_lowercase() {
        let language = Language::new("EN", true).unwrap();
        assert_eq!(language.code(), "en");
    }

    #[test]
    fn invalid_codes_rejected() {
        assert!(Language::new("", false).is_err());
        assert!(Language::new("e n", false).is_err());
        assert!(Language::new("en/us", false).is_err());
        assert!(Language::new("pt-br", false).is_ok());
        assert!(Language::new("zh_hans", false).is_ok());
    }

    #[test]
    fn single_marker() {
        let single = Language::single();
        assert!(single.is_single());
        assert!(single.is_default());
        assert_eq!(single.code(), "");
    }

    #[test]
    fn set_requires_exactly_one_default() {
        let en = Language::new("en", false).unwrap();
        let de = Language::new("de", false).unwrap();
        assert_eq!(
            Languages::new(vec![en.clone(), de.clone()]),
            Err(LanguageError::NoDefault)
        );

        let en_default = Language::new("en", true).unwrap();
        let de_default = Language::new("de", true).unwrap();
        assert_eq!(
            Languages::new(vec![en_default.clone(), de_default]),
            Err(LanguageError::MultipleDefaults)
        );

        let languages = Languages::new(vec![en_default, de]).unwrap();
        assert_eq!(languages.default().code(), "en");
    }

    #[test]
    fn duplicate_codes_rejected() {
        let result = Languages::new(vec![
            Language::new("en", true).unwrap(),
            Language::new("EN", false).unwrap(),
        ]);
        assert_eq!(result, Err(LanguageError::DuplicateCode("en".into())));
    }

    #[test]
    fn find_is_case_insensitive() {
        let languages = Languages::new(vec![
            Language::new("en", true).unwrap(),
            Language::new("de", false).unwrap(),
        ])
        .unwrap();

        assert_eq!(languages.find("DE").map(Language::code), Some("de"));
        assert!(languages.find("fr").is_none());
    }

    #[test]
    fn single_set_is_not_multilingual() {
        assert!(!Languages::single().is_multilingual());

        let languages = Languages::new(vec![Language::new("en", true).unwrap()]).unwrap();
        assert!(languages.is_multilingual());
    }
}
