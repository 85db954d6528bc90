//! Asset Catalog - folder discovery and change tracking
//!
//! Every sub-folder of the content root is a category; every `.ron` file in
//! it is a placeable template keyed by its file stem. External create/delete
//! notifications are queued and applied in arrival order by `drain`, which
//! the editor calls once per frame. One drain produces at most one change
//! event no matter how many notifications it consumed.

use std::collections::VecDeque;
use std::path::{Component, Path};

use super::category::{is_valid_category_name, CategoryData, CategoryError, CategoryStore, ObjectVariant, TemplateRef};
use crate::error::{EditError, EditResult};
use crate::storage::Storage;

/// Default content folder (relative to the storage root)
pub const CONTENT_DIR: &str = "content";

/// Default folder for category metadata files
pub const METADATA_DIR: &str = "content_meta";

/// File extension of template files
pub const TEMPLATE_EXT: &str = "ron";

/// Default notification queue bound
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// External filesystem notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetEvent {
    Created(String),
    Deleted(String),
}

/// Emitted by `drain` when the catalog changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogChanged {
    pub revision: u64,
}

/// What a notification path refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPath {
    Folder(String),
    Template { category: String, template: String },
}

/// Folder -> category index kept in sync with the content root
#[derive(Debug)]
pub struct AssetCatalog {
    storage: Storage,
    content_root: String,
    metadata_dir: String,
    store: CategoryStore,
    queue: VecDeque<AssetEvent>,
    capacity: usize,
    needs_rescan: bool,
    revision: u64,
}

impl AssetCatalog {
    pub fn new(storage: Storage, content_root: impl Into<String>, metadata_dir: impl Into<String>) -> Self {
        Self {
            storage,
            content_root: content_root.into(),
            metadata_dir: metadata_dir.into(),
            store: CategoryStore::new(),
            queue: VecDeque::new(),
            capacity: DEFAULT_QUEUE_CAPACITY,
            needs_rescan: false,
            revision: 0,
        }
    }

    /// Set the notification queue bound (at least 1)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn content_root(&self) -> &str {
        &self.content_root
    }

    pub fn metadata_dir(&self) -> &str {
        &self.metadata_dir
    }

    /// Bumped by every drain or edit that changed the catalog
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Notifications waiting for the next drain
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether the next drain will do a full rescan
    pub fn rescan_pending(&self) -> bool {
        self.needs_rescan
    }

    /// Queue a notification. Returns false if the queue overflowed, in which
    /// case queued work is discarded and the next drain rescans everything.
    pub fn notify(&mut self, event: AssetEvent) -> bool {
        if self.queue.len() >= self.capacity {
            log::warn!(
                "Asset notification queue full ({}), falling back to full rescan",
                self.capacity
            );
            self.queue.clear();
            self.needs_rescan = true;
            return false;
        }
        self.queue.push_back(event);
        true
    }

    /// Ask for a full rescan on the next drain
    pub fn request_rescan(&mut self) {
        self.needs_rescan = true;
    }

    /// Apply all queued notifications in arrival order
    pub fn drain(&mut self) -> Option<CatalogChanged> {
        if !self.needs_rescan && self.queue.is_empty() {
            return None;
        }

        let consumed = self.queue.len();
        let changed = if self.needs_rescan {
            self.needs_rescan = false;
            self.queue.clear();
            match self.scan() {
                Ok(_) => true,
                Err(e) => {
                    log::error!("Catalog rescan failed: {}", e);
                    false
                }
            }
        } else {
            let mut changed = false;
            while let Some(event) = self.queue.pop_front() {
                changed |= self.apply(event);
            }
            changed
        };

        if !changed {
            log::debug!("Drained {} asset notification(s), catalog unchanged", consumed);
            return None;
        }
        self.revision += 1;
        log::info!(
            "Catalog updated (revision {}, {} categories)",
            self.revision,
            self.store.len()
        );
        Some(CatalogChanged { revision: self.revision })
    }

    /// Rebuild the whole index from disk. Returns the number of categories.
    /// The new index replaces the old one only once the listing succeeded.
    pub fn scan(&mut self) -> Result<usize, CategoryError> {
        if !self.storage.exists(&self.content_root) {
            self.store = CategoryStore::new();
            if let Err(e) = self.storage.create_dir(&self.content_root) {
                log::warn!("Could not create content folder {}: {}", self.content_root, e);
            }
            return Ok(0);
        }

        let mut store = CategoryStore::new();
        for folder in self.storage.list_dirs(&self.content_root)? {
            if !is_valid_category_name(&folder) {
                continue;
            }
            match self.load_category(&folder) {
                Ok(Some(data)) => {
                    store.insert(data);
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Failed to index category '{}': {}", folder, e);
                    // Keep what we had rather than dropping the folder
                    if let Some(previous) = self.store.category(&folder) {
                        store.insert(previous.clone());
                    }
                }
            }
        }
        self.store = store;
        self.remove_orphaned_metadata();

        Ok(self.store.len())
    }

    /// Scan and bump the revision (manual "Refresh Catalog")
    pub fn refresh(&mut self) -> Result<CatalogChanged, CategoryError> {
        self.queue.clear();
        self.needs_rescan = false;
        self.scan()?;
        self.revision += 1;
        Ok(CatalogChanged { revision: self.revision })
    }

    /// Resolve a variant to one of its templates
    pub fn resolve(&self, category: &str, variant: &str) -> EditResult<TemplateRef> {
        self.store.resolve_variant(category, variant)
    }

    /// Register an alternate template under a variant and persist it
    pub fn add_template(&mut self, category: &str, variant: &str, template: &str) -> EditResult<bool> {
        let added = self.store.add_template(category, variant, template)?;
        if added {
            self.persist(category);
            self.revision += 1;
        }
        Ok(added)
    }

    /// Remove a template from every variant of a category and persist it
    pub fn remove_template(&mut self, category: &str, template: &str) -> EditResult<usize> {
        let changed = self.store.remove_template(category, template)?;
        if changed > 0 {
            self.persist(category);
            self.revision += 1;
        }
        Ok(changed)
    }

    /// Storage path of a template file
    pub fn template_path(&self, template: &TemplateRef) -> String {
        format!(
            "{}/{}/{}.{}",
            self.content_root.trim_end_matches('/'),
            template.category,
            template.name,
            TEMPLATE_EXT
        )
    }

    /// Work out what a notification path refers to. Paths may be relative to
    /// the content root, relative to the storage root, or absolute.
    pub fn classify(&self, path: &str) -> Option<AssetPath> {
        let path = Path::new(path);
        let relative = path
            .strip_prefix(&self.content_root)
            .ok()
            .or_else(|| {
                self.storage
                    .resolve(&self.content_root)
                    .ok()
                    .and_then(|root| path.strip_prefix(root).ok())
            })
            .unwrap_or(path);

        let parts: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        match parts.as_slice() {
            [name] => {
                // Folder names may contain dots; only a loose template file is not a folder
                let folder = !is_template_file(name)
                    || self.store.category(name).is_some()
                    || self.storage.is_dir(&self.folder_path(name));
                (folder && is_valid_category_name(name)).then(|| AssetPath::Folder(name.to_string()))
            }
            [folder, file] => {
                let stem = Path::new(file).file_stem().and_then(|s| s.to_str())?;
                (is_template_file(file) && is_valid_category_name(folder)).then(|| AssetPath::Template {
                    category: folder.to_string(),
                    template: stem.to_string(),
                })
            }
            _ => None,
        }
    }

    fn apply(&mut self, event: AssetEvent) -> bool {
        let (created, path) = match &event {
            AssetEvent::Created(p) => (true, p.as_str()),
            AssetEvent::Deleted(p) => (false, p.as_str()),
        };
        let Some(target) = self.classify(path) else {
            log::debug!("Ignoring asset notification {:?}", event);
            return false;
        };

        match (created, target) {
            (true, AssetPath::Folder(name)) => match self.index_category(&name) {
                Ok(added) => added,
                Err(e) => {
                    log::warn!("Failed to index category '{}': {}", name, e);
                    false
                }
            },
            (false, AssetPath::Folder(name)) => {
                let removed = self.store.remove_category(&name).is_some();
                if let Err(e) = CategoryData::delete(&self.storage, &self.metadata_dir, &name) {
                    log::warn!("Failed to delete metadata for '{}': {}", name, e);
                }
                removed
            }
            (true, AssetPath::Template { category, template }) => {
                match self.store.add_variant(&category, ObjectVariant::new(template.as_str())) {
                    Ok(added) => {
                        if added {
                            self.persist(&category);
                        }
                        added
                    }
                    Err(e @ EditError::CatalogDesync(_)) => {
                        log::warn!("{}; indexing folder", e);
                        self.index_category(&category).unwrap_or_else(|e| {
                            log::warn!("Failed to index category '{}': {}", category, e);
                            false
                        })
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        false
                    }
                }
            }
            (false, AssetPath::Template { category, template }) => {
                let Some(data) = self.store.category_mut(&category) else {
                    log::warn!("{}", EditError::CatalogDesync(category));
                    return false;
                };
                let removed = data.remove_variant(&template).is_some();
                let changed = data.remove_template(&template) > 0;
                if removed || changed {
                    self.persist(&category);
                }
                removed || changed
            }
        }
    }

    /// Index one folder. Returns true if the category was not indexed before.
    fn index_category(&mut self, name: &str) -> Result<bool, CategoryError> {
        let Some(data) = self.load_category(name)? else {
            return Ok(false);
        };
        if let Some(existing) = self.store.category_mut(name) {
            *existing = data;
            return Ok(false);
        }
        Ok(self.store.insert(data))
    }

    /// Load (or create) metadata for one folder and reconcile it with the
    /// templates on disk. `None` if the folder is gone. A metadata file that
    /// can't be written is logged; the category is still usable.
    fn load_category(&self, name: &str) -> Result<Option<CategoryData>, CategoryError> {
        let folder = self.folder_path(name);
        if !self.storage.is_dir(&folder) {
            return Ok(None);
        }

        let templates: Vec<String> = self
            .storage
            .list(&folder)?
            .into_iter()
            .filter(|file| is_template_file(file))
            .filter_map(|file| Path::new(&file).file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();

        let (mut data, loaded) = match CategoryData::load(&self.storage, &self.metadata_dir, name) {
            Ok(Some(data)) if data.name == name => (data, true),
            Ok(_) => (CategoryData::new(name), false),
            Err(e) => {
                log::warn!("Ignoring unreadable metadata for '{}': {}", name, e);
                (CategoryData::new(name), false)
            }
        };

        if data.reconcile(&templates) || !loaded {
            if let Err(e) = data.save(&self.storage, &self.metadata_dir) {
                log::warn!("Failed to save metadata for '{}': {}", name, e);
            }
        }
        log::debug!("Indexed category '{}' ({} variants)", name, data.variants.len());
        Ok(Some(data))
    }

    fn folder_path(&self, name: &str) -> String {
        format!("{}/{}", self.content_root.trim_end_matches('/'), name)
    }

    fn remove_orphaned_metadata(&self) {
        let Ok(files) = self.storage.list(&self.metadata_dir) else {
            return;
        };
        for file in files {
            let path = Path::new(&file);
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if self.store.category(stem).is_none() {
                log::info!("Removing metadata for missing category '{}'", stem);
                if let Err(e) = CategoryData::delete(&self.storage, &self.metadata_dir, stem) {
                    log::warn!("Failed to delete metadata for '{}': {}", stem, e);
                }
            }
        }
    }

    fn persist(&self, category: &str) {
        if let Some(data) = self.store.category(category) {
            if let Err(e) = data.save(&self.storage, &self.metadata_dir) {
                log::warn!("Failed to save metadata for '{}': {}", category, e);
            }
        }
    }
}

/// Whether a file name has the template extension (any case)
fn is_template_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXT))
        .unwrap_or(false)
}
