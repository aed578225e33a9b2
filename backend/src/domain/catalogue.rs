//! Catalogue reference data: tags and ingredients.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slug::is_valid_slug;
use super::{IngredientId, TagId};

/// Validation errors for catalogue values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    /// The slug is empty, too long, or uses characters outside `[-a-zA-Z0-9_]`.
    #[error("slug {0:?} must match ^[-a-zA-Z0-9_]+$")]
    InvalidSlug(String),
}

/// URL-safe tag identifier used by recipe filters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagSlug(String);

impl TagSlug {
    /// Validate and wrap a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogueValidationError> {
        let value = value.into();
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(CatalogueValidationError::InvalidSlug(value))
        }
    }

    /// Borrow the slug text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TagSlug {
    type Error = CatalogueValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TagSlug> for String {
    fn from(value: TagSlug) -> Self {
        value.0
    }
}

/// Recipe tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: TagSlug,
}

/// Ingredient with its unit of measure. `(name, measurement_unit)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}
