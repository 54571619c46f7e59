//! model
//!
//! Content-bearing model kinds.
//!
//! # Overview
//!
//! Four kinds of model carry content: pages, files, the site and users.
//! [`Model`] is a closed sum type over them, so every kind-specific concern
//! in the storage layer (path stem, write normalization) is one exhaustive
//! match and adding a kind forces every site to be revisited.
//!
//! Models are plain descriptions: a root directory, a blueprint and the
//! kind-specific attributes the storage layer needs. All mutable state
//! lives in storage.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::blueprint::Blueprint;

/// Errors from model construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("file model root has no filename: {0}")]
    MissingFilename(String),
}

/// A page with a template and an optional draft state.
///
/// The root is the page's content directory. Draft pages live in a root
/// that already encodes their draft state; the storage layer rejects
/// version requests for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    root: PathBuf,
    template: String,
    draft: bool,
    blueprint: Blueprint,
}

impl Page {
    /// Create a page model.
    pub fn new(root: impl Into<PathBuf>, template: impl Into<String>, blueprint: Blueprint) -> Self {
        Self {
            root: root.into(),
            template: template.into(),
            draft: false,
            blueprint,
        }
    }

    /// Mark the page as a draft.
    pub fn draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    /// The intended template name; doubles as the content filename stem.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Check whether the page is in draft state.
    pub fn is_draft(&self) -> bool {
        self.draft
    }
}

/// A file attachment.
///
/// The root is the path of the stored file itself; its content file lives
/// alongside it, in the parent directory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileModel {
    root: PathBuf,
    filename: String,
    template: Option<String>,
    blueprint: Blueprint,
}

impl FileModel {
    /// Create a file model from the path of the stored file.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MissingFilename` if the root has no final
    /// path component.
    pub fn new(root: impl Into<PathBuf>, blueprint: Blueprint) -> Result<Self, ModelError> {
        let root = root.into();
        let filename = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ModelError::MissingFilename(root.display().to_string()))?;

        Ok(Self {
            root,
            filename,
            template: None,
            blueprint,
        })
    }

    /// Set the file template.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// The file's own filename; doubles as the content filename stem.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Get the file template, if any.
    pub fn template_name(&self) -> Option<&str> {
        self.template.as_deref()
    }
}

/// The site singleton.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    root: PathBuf,
    blueprint: Blueprint,
}

impl Site {
    /// Create the site model from its content root.
    pub fn new(root: impl Into<PathBuf>, blueprint: Blueprint) -> Self {
        Self {
            root: root.into(),
            blueprint,
        }
    }
}

/// A user account's content storage.
#[derive(Debug, Clone, PartialEq)]
pub struct UserModel {
    root: PathBuf,
    id: String,
    blueprint: Blueprint,
}

impl UserModel {
    /// Create a user model from the account directory and user id.
    pub fn new(
        root: impl Into<PathBuf>,
        id: impl Into<String>,
        blueprint: Blueprint,
    ) -> Self {
        Self {
            root: root.into(),
            id: id.into(),
            blueprint,
        }
    }

    /// Get the user id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A content-bearing model.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Page(Page),
    File(FileModel),
    Site(Site),
    User(UserModel),
}

impl Model {
    /// The model's root path.
    ///
    /// For pages, the site and users this is a directory; for files it is
    /// the stored file itself.
    pub fn root(&self) -> &Path {
        match self {
            Model::Page(m) => &m.root,
            Model::File(m) => &m.root,
            Model::Site(m) => &m.root,
            Model::User(m) => &m.root,
        }
    }

    /// The model's blueprint.
    pub fn blueprint(&self) -> &Blueprint {
        match self {
            Model::Page(m) => &m.blueprint,
            Model::File(m) => &m.blueprint,
            Model::Site(m) => &m.blueprint,
            Model::User(m) => &m.blueprint,
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Page(_) => "page",
            Model::File(_) => "file",
            Model::Site(_) => "site",
            Model::User(_) => "user",
        }
    }
}

impl From<Page> for Model {
    fn from(model: Page) -> Self {
        Model::Page(model)
    }
}

impl From<FileModel> for Model {
    fn from(model: FileModel) -> Self {
        Model::File(model)
    }
}

impl From<Site> for Model {
    fn from(model: Site) -> Self {
        Model::Site(model)
    }
}

impl From<UserModel> for Model {
    fn from(model: UserModel) -> Self {
        Model::User(model)
    }
}
