//! Palette - browse catalog categories and pick a variant to paint
//!
//! The palette keeps its own copy of what it shows and re-syncs only when
//! the catalog revision moves, so it never sees a half-applied drain.

use crate::asset::AssetCatalog;
use crate::error::{EditError, EditResult};
use super::events::{EditorEvent, EventQueue};

/// The variant currently armed for painting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: String,
    pub variant: String,
}

/// One pickable entry
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub name: String,
    /// Number of alternate templates ("skins")
    pub template_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct PaletteCategory {
    name: String,
    entries: Vec<PaletteEntry>,
}

#[derive(Debug, Default)]
pub struct Palette {
    open: bool,
    seen_revision: Option<u64>,
    categories: Vec<PaletteCategory>,
    active: usize,
    selection: Option<Selection>,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Show Palette command
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Rebuild from the catalog if its revision moved. Returns true if rebuilt.
    pub fn sync(&mut self, catalog: &AssetCatalog) -> bool {
        if self.seen_revision == Some(catalog.revision()) {
            return false;
        }
        self.seen_revision = Some(catalog.revision());

        let active_name = self.active_category().map(String::from);
        let store = catalog.store();
        self.categories = store
            .iter()
            .map(|data| PaletteCategory {
                name: data.name.clone(),
                entries: data
                    .variants
                    .iter()
                    .filter(|v| v.visible)
                    .map(|v| PaletteEntry {
                        name: v.name.clone(),
                        template_count: v.templates.len(),
                    })
                    .collect(),
            })
            .collect();

        self.active = active_name
            .and_then(|name| self.categories.iter().position(|c| c.name == name))
            .unwrap_or(0);

        if let Some(sel) = &self.selection {
            if !self.contains(&sel.category, &sel.variant) {
                log::info!("Palette selection {}/{} no longer exists", sel.category, sel.variant);
                self.selection = None;
            }
        }
        true
    }

    /// Category names in catalog order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_category(&self) -> Option<&str> {
        self.categories.get(self.active).map(|c| c.name.as_str())
    }

    pub fn set_active_category(&mut self, index: usize) -> bool {
        if index < self.categories.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Entries of the active category
    pub fn entries(&self) -> &[PaletteEntry] {
        self.categories
            .get(self.active)
            .map(|c| c.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_selected(&self, category: &str, variant: &str) -> bool {
        self.selection
            .as_ref()
            .map_or(false, |s| s.category == category && s.variant == variant)
    }

    fn contains(&self, category: &str, variant: &str) -> bool {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map_or(false, |c| c.entries.iter().any(|e| e.name == variant))
    }

    /// Arm a variant for painting and announce it
    pub fn select(
        &mut self,
        category: &str,
        variant: &str,
        events: &mut EventQueue<EditorEvent>,
    ) -> EditResult<()> {
        if !self.categories.iter().any(|c| c.name == category) {
            return Err(EditError::CatalogDesync(category.to_string()));
        }
        if !self.contains(category, variant) {
            return Err(EditError::MissingTemplate {
                category: category.to_string(),
                variant: variant.to_string(),
            });
        }
        if self.is_selected(category, variant) {
            return Ok(());
        }
        self.selection = Some(Selection {
            category: category.to_string(),
            variant: variant.to_string(),
        });
        events.send(EditorEvent::ItemSelected {
            category: category.to_string(),
            variant: variant.to_string(),
        });
        Ok(())
    }

    /// Select by position in the active category
    pub fn select_entry(&mut self, index: usize, events: &mut EventQueue<EditorEvent>) -> EditResult<()> {
        let category = self.active_category().unwrap_or_default().to_string();
        let variant = self
            .entries()
            .get(index)
            .map(|e| e.name.clone())
            .ok_or_else(|| EditError::MissingTemplate {
                category: category.clone(),
                variant: format!("#{}", index),
            })?;
        self.select(&category, &variant, events)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::asset::{AssetEvent, CONTENT_DIR, METADATA_DIR};
    use tempfile::TempDir;

    fn catalog(folders: &[(&str, &[&str])]) -> (TempDir, AssetCatalog) {
        let dir = TempDir::new().unwrap();
        for (folder, files) in folders {
            let path = dir.path().join(CONTENT_DIR).join(folder);
            std::fs::create_dir_all(&path).unwrap();
            for file in *files {
                std::fs::write(path.join(file), "()").unwrap();
            }
        }
        let mut catalog = AssetCatalog::new(Storage::with_base_dir(dir.path()), CONTENT_DIR, METADATA_DIR);
        catalog.refresh().unwrap();
        (dir, catalog)
    }

    #[test]
    fn test_sync_only_on_new_revision() {
        let (_dir, catalog) = catalog(&[("Blocks", &["Rock.ron"])]);
        let mut palette = Palette::new();
        assert!(palette.sync(&catalog));
        assert!(!palette.sync(&catalog));
        assert_eq!(palette.categories().collect::<Vec<_>>(), vec!["Blocks"]);
        assert_eq!(palette.entries()[0].name, "Rock");
    }

    #[test]
    fn test_select_emits_item_selected_once() {
        let (_dir, catalog) = catalog(&[("Enemies", &["Slime.ron"])]);
        let mut palette = Palette::new();
        palette.sync(&catalog);
        let mut events = EventQueue::new();

        palette.select("Enemies", "Slime", &mut events).unwrap();
        palette.select("Enemies", "Slime", &mut events).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events.drain().next(),
            Some(EditorEvent::ItemSelected { category: "Enemies".into(), variant: "Slime".into() })
        );
        assert!(palette.is_selected("Enemies", "Slime"));
    }

    #[test]
    fn test_select_unknown_is_declined() {
        let (_dir, catalog) = catalog(&[("Enemies", &["Slime.ron"])]);
        let mut palette = Palette::new();
        palette.sync(&catalog);
        let mut events = EventQueue::new();

        assert!(matches!(
            palette.select("Props", "Crate", &mut events),
            Err(EditError::CatalogDesync(_))
        ));
        assert!(matches!(
            palette.select("Enemies", "Ghost", &mut events),
            Err(EditError::MissingTemplate { .. })
        ));
        assert!(palette.select_entry(5, &mut events).is_err());
        assert!(events.is_empty());
        assert!(palette.selection().is_none());
    }

    #[test]
    fn test_selection_dropped_when_variant_deleted() {
        let (dir, mut catalog) = catalog(&[("Enemies", &["Slime.ron", "Bat.ron"])]);
        let mut palette = Palette::new();
        palette.sync(&catalog);
        let mut events = EventQueue::new();
        palette.select("Enemies", "Bat", &mut events).unwrap();

        std::fs::remove_file(dir.path().join("content/Enemies/Bat.ron")).unwrap();
        catalog.notify(AssetEvent::Deleted("Enemies/Bat.ron".into()));
        catalog.drain().unwrap();

        assert!(palette.sync(&catalog));
        assert!(palette.selection().is_none());
    }

    #[test]
    fn test_active_category_kept_across_sync() {
        let (dir, mut catalog) = catalog(&[("Blocks", &["Rock.ron"]), ("Enemies", &["Slime.ron"])]);
        let mut palette = Palette::new();
        palette.sync(&catalog);
        assert!(palette.set_active_category(1));
        assert!(!palette.set_active_category(9));

        std::fs::create_dir_all(dir.path().join("content/Actors")).unwrap();
        catalog.notify(AssetEvent::Created("Actors".into()));
        catalog.drain().unwrap();
        palette.sync(&catalog);

        assert_eq!(palette.active_category(), Some("Enemies"));
    }

    #[test]
    fn test_hidden_variants_not_listed() {
        let (_dir, mut catalog) = catalog(&[("Props", &["Crate.ron", "Marker.ron"])]);
        let mut data = catalog.store().category("Props").unwrap().clone();
        data.variant_mut("Marker").unwrap().visible = false;
        data.save(catalog.storage(), METADATA_DIR).unwrap();
        catalog.refresh().unwrap();

        let mut palette = Palette::new();
        palette.sync(&catalog);
        let names: Vec<_> = palette.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Crate"]);
    }

    #[test]
    fn test_toggle_open() {
        let mut palette = Palette::new();
        assert!(palette.is_open());
        palette.toggle();
        assert!(!palette.is_open());
    }
}
