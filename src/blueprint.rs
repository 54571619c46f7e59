//! blueprint
//!
//! Declared field lists for content models.
//!
//! # Overview
//!
//! A [`Blueprint`] names the fields a model's content is expected to carry:
//! each [`FieldDefinition`] has a name, a declared type, a translate flag
//! and an optional default value. Storage consumes blueprints for write
//! normalization (untranslatable fields are nulled for non-default
//! languages) and the content layer consumes them for schema conversion.
//!
//! # File format
//!
//! Blueprints can be loaded from TOML:
//!
//! ```toml
//! name = "article"
//!
//! [[fields]]
//! name = "title"
//! type = "text"
//!
//! [[fields]]
//! name = "date"
//! type = "date"
//! translate = false
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors from blueprint loading and validation.
#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("failed to read blueprint file '{path}': {source}")]
    ReadError {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse blueprint: {0}")]
    ParseError(String),

    #[error("blueprint field name cannot be empty")]
    EmptyFieldName,

    #[error("duplicate blueprint field: {0}")]
    DuplicateField(String),
}

/// A single declared field.
///
/// Names are lower-cased at construction, matching the case-insensitive
/// field maps they describe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFieldDefinition")]
pub struct FieldDefinition {
    name: String,
    field_type: String,
    translate: bool,
    default: Option<String>,
}

impl FieldDefinition {
    /// Create a field definition. Fields are translatable by default.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            field_type: field_type.into(),
            translate: true,
            default: None,
        }
    }

    /// Set the translate flag.
    pub fn translate(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }

    /// Set the declared default value.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Get the lower-cased field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared field type.
    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    /// Check whether the field carries per-language values.
    pub fn is_translatable(&self) -> bool {
        self.translate
    }

    /// Get the declared default value, if any.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldDefinition {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default = "default_translate")]
    translate: bool,
    #[serde(default)]
    default: Option<String>,
}

fn default_translate() -> bool {
    true
}

impl From<RawFieldDefinition> for FieldDefinition {
    fn from(raw: RawFieldDefinition) -> Self {
        let mut field = FieldDefinition::new(raw.name, raw.field_type).translate(raw.translate);
        if let Some(default) = raw.default {
            field = field.default_value(default);
        }
        field
    }
}

/// A named, validated field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl Blueprint {
    /// Create a validated blueprint.
    ///
    /// # Errors
    ///
    /// - `BlueprintError::EmptyFieldName` for a field without a name
    /// - `BlueprintError::DuplicateField` for repeated field names
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Result<Self, BlueprintError> {
        for (index, field) in fields.iter().enumerate() {
            if field.name().is_empty() {
                return Err(BlueprintError::EmptyFieldName);
            }
            if fields[..index].iter().any(|f| f.name() == field.name()) {
                return Err(BlueprintError::DuplicateField(field.name().to_string()));
            }
        }

        Ok(Self {
            name: name.into(),
            fields,
        })
    }

    /// A blueprint declaring no fields.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Parse a blueprint from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, BlueprintError> {
        let raw: RawBlueprint =
            toml::from_str(text).map_err(|e| BlueprintError::ParseError(e.to_string()))?;
        Blueprint::new(raw.name, raw.fields)
    }

    /// Load a blueprint from a TOML file.
    pub fn load(path: &Path) -> Result<Self, BlueprintError> {
        let text = std::fs::read_to_string(path).map_err(|e| BlueprintError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text)
    }

    /// Get the blueprint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared fields in order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Find a declared field by name (case-insensitive).
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        let name = name.to_lowercase();
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Iterate over fields that do not carry per-language values.
    pub fn untranslatable(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| !f.is_translatable())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlueprint {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
}
