//! Category metadata
//!
//! One `CategoryData` per content folder. Each entry is an `ObjectVariant`:
//! a named, placeable object with one or more alternative templates and the
//! default transform it is placed with. Metadata is persisted as one RON file
//! per category so designer edits (rotation, scale, visibility, extra skins)
//! survive catalog rescans.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::error::{EditError, EditResult};
use crate::math::Vec3;
use crate::storage::{Storage, StorageError};

/// Current metadata file version
pub const CATEGORY_VERSION: u32 = 1;

fn current_version() -> u32 {
    CATEGORY_VERSION
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

fn visible_by_default() -> bool {
    true
}

/// A concrete template picked for placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateRef {
    pub category: String,
    /// Template identifier (the template file's stem)
    pub name: String,
}

impl TemplateRef {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

/// A placeable object inside a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectVariant {
    /// Unique within its category
    pub name: String,
    /// Alternative templates ("skins"); never empty
    pub templates: Vec<String>,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

impl ObjectVariant {
    /// Variant backed by a single template of the same name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            templates: vec![name.clone()],
            name,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
        }
    }

    /// Variant with an explicit template list
    pub fn with_templates(name: impl Into<String>, templates: Vec<String>) -> Self {
        Self {
            templates,
            ..Self::new(name)
        }
    }

    /// Pick one of the registered templates uniformly at random
    pub fn pick<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> Option<&'a str> {
        self.templates.choose(rng).map(|s| s.as_str())
    }
}

/// Error type for metadata persistence
#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("unsupported metadata version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid metadata: {0}")]
    Invalid(String),
}

/// Metadata record for one category folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryData {
    #[serde(default = "current_version")]
    pub version: u32,
    /// Same as the source folder name
    pub name: String,
    /// Discovery order
    #[serde(default)]
    pub variants: Vec<ObjectVariant>,
}

impl CategoryData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CATEGORY_VERSION,
            name: name.into(),
            variants: Vec::new(),
        }
    }

    pub fn variant(&self, name: &str) -> Option<&ObjectVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn variant_mut(&mut self, name: &str) -> Option<&mut ObjectVariant> {
        self.variants.iter_mut().find(|v| v.name == name)
    }

    /// Add a variant unless one with the same name exists (first write wins).
    /// Returns whether it was added.
    pub fn add_variant(&mut self, variant: ObjectVariant) -> bool {
        if variant.templates.is_empty() || self.variant(&variant.name).is_some() {
            return false;
        }
        self.variants.push(variant);
        true
    }

    /// Remove a variant by name
    pub fn remove_variant(&mut self, name: &str) -> Option<ObjectVariant> {
        let index = self.variants.iter().position(|v| v.name == name)?;
        Some(self.variants.remove(index))
    }

    /// Register an alternative template under an existing variant
    pub fn add_template(&mut self, variant: &str, template: &str) -> Option<bool> {
        let v = self.variant_mut(variant)?;
        if v.templates.iter().any(|t| t == template) {
            return Some(false);
        }
        v.templates.push(template.to_string());
        Some(true)
    }

    /// Drop a template from every variant. Variants left without templates
    /// are removed. Returns how many variants changed.
    pub fn remove_template(&mut self, template: &str) -> usize {
        let mut changed = 0;
        for v in &mut self.variants {
            let before = v.templates.len();
            v.templates.retain(|t| t != template);
            if v.templates.len() != before {
                changed += 1;
            }
        }
        self.variants.retain(|v| !v.templates.is_empty());
        changed
    }

    /// Bring metadata in line with the templates actually present on disk.
    ///
    /// Existing variants keep their settings; templates no longer present
    /// are dropped; templates without a same-named variant get a default one.
    pub fn reconcile(&mut self, discovered: &[String]) -> bool {
        let before = self.variants.clone();
        for v in &mut self.variants {
            v.templates.retain(|t| discovered.contains(t));
        }
        self.variants.retain(|v| !v.templates.is_empty());
        for template in discovered {
            if self.variant(template).is_none() {
                self.variants.push(ObjectVariant::new(template.clone()));
            }
        }
        self.variants != before
    }

    /// Check invariants on loaded data
    pub fn validate(&self) -> Result<(), CategoryError> {
        if self.version > CATEGORY_VERSION {
            return Err(CategoryError::UnsupportedVersion(self.version));
        }
        if !is_valid_category_name(&self.name) {
            return Err(CategoryError::Invalid(format!("bad category name '{}'", self.name)));
        }
        for (i, v) in self.variants.iter().enumerate() {
            if v.templates.is_empty() {
                return Err(CategoryError::Invalid(format!("variant '{}' has no templates", v.name)));
            }
            if self.variants[..i].iter().any(|o| o.name == v.name) {
                return Err(CategoryError::Invalid(format!("variant '{}' listed twice", v.name)));
            }
        }
        Ok(())
    }

    /// Metadata file path for a category inside `dir`
    pub fn metadata_path(dir: &str, name: &str) -> String {
        format!("{}/{}.ron", dir.trim_end_matches('/'), name)
    }

    /// Parse metadata from RON text
    pub fn from_ron(text: &str) -> Result<Self, CategoryError> {
        let data: CategoryData = ron::from_str(text)?;
        data.validate()?;
        Ok(data)
    }

    /// Serialize metadata to pretty RON
    pub fn to_ron(&self) -> Result<String, CategoryError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load metadata for a category, `None` if no file exists yet
    pub fn load(storage: &Storage, dir: &str, name: &str) -> Result<Option<Self>, CategoryError> {
        let path = Self::metadata_path(dir, name);
        if !storage.exists(&path) {
            return Ok(None);
        }
        let text = storage.read_string(&path)?;
        Self::from_ron(&text).map(Some)
    }

    /// Write metadata for this category
    pub fn save(&self, storage: &Storage, dir: &str) -> Result<(), CategoryError> {
        storage.write_string(&Self::metadata_path(dir, &self.name), &self.to_ron()?)?;
        Ok(())
    }

    /// Delete the metadata file for a category
    pub fn delete(storage: &Storage, dir: &str, name: &str) -> Result<(), CategoryError> {
        storage.delete(&Self::metadata_path(dir, name))?;
        Ok(())
    }
}

/// Folder names usable as categories (and as metadata file names)
pub fn is_valid_category_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
}

/// All categories, in discovery order
#[derive(Debug, Clone, Default)]
pub struct CategoryStore {
    categories: Vec<CategoryData>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty category. Returns false if it already exists.
    pub fn add_category(&mut self, name: &str) -> bool {
        self.insert(CategoryData::new(name))
    }

    /// Insert a full category record unless the name is taken
    pub fn insert(&mut self, data: CategoryData) -> bool {
        if self.category(&data.name).is_some() {
            return false;
        }
        self.categories.push(data);
        true
    }

    /// Remove a category and everything in it
    pub fn remove_category(&mut self, name: &str) -> Option<CategoryData> {
        let index = self.categories.iter().position(|c| c.name == name)?;
        Some(self.categories.remove(index))
    }

    pub fn category(&self, name: &str) -> Option<&CategoryData> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut CategoryData> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    fn indexed(&self, name: &str) -> EditResult<&CategoryData> {
        self.category(name)
            .ok_or_else(|| EditError::CatalogDesync(name.to_string()))
    }

    fn indexed_mut(&mut self, name: &str) -> EditResult<&mut CategoryData> {
        self.category_mut(name)
            .ok_or_else(|| EditError::CatalogDesync(name.to_string()))
    }

    /// Add a variant; duplicates by name are ignored (returns `Ok(false)`)
    pub fn add_variant(&mut self, category: &str, variant: ObjectVariant) -> EditResult<bool> {
        Ok(self.indexed_mut(category)?.add_variant(variant))
    }

    /// Remove a variant; absent names are a no-op (returns `Ok(false)`)
    pub fn remove_variant(&mut self, category: &str, name: &str) -> EditResult<bool> {
        Ok(self.indexed_mut(category)?.remove_variant(name).is_some())
    }

    /// Register another template under an existing variant
    pub fn add_template(&mut self, category: &str, variant: &str, template: &str) -> EditResult<bool> {
        self.indexed_mut(category)?
            .add_template(variant, template)
            .ok_or_else(|| EditError::MissingTemplate {
                category: category.to_string(),
                variant: variant.to_string(),
            })
    }

    /// Drop a template from every variant of a category; emptied variants go too
    pub fn remove_template(&mut self, category: &str, template: &str) -> EditResult<usize> {
        Ok(self.indexed_mut(category)?.remove_template(template))
    }

    /// Resolve a variant to one of its templates using the thread RNG
    pub fn resolve_variant(&self, category: &str, name: &str) -> EditResult<TemplateRef> {
        self.resolve_variant_with(category, name, &mut rand::thread_rng())
    }

    /// Resolve a variant to one of its templates, uniformly at random
    pub fn resolve_variant_with<R: Rng + ?Sized>(
        &self,
        category: &str,
        name: &str,
        rng: &mut R,
    ) -> EditResult<TemplateRef> {
        let data = self.indexed(category)?;
        data.variant(name)
            .and_then(|v| v.pick(rng))
            .map(|template| TemplateRef::new(category, template))
            .ok_or_else(|| EditError::MissingTemplate {
                category: category.to_string(),
                variant: name.to_string(),
            })
    }

    /// Category names in discovery order
    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Variants of a category in insertion order
    pub fn list_variants(&self, category: &str) -> EditResult<&[ObjectVariant]> {
        Ok(&self.indexed(category)?.variants)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryData> {
        self.categories.iter()
    }
}
