//! Layered placement store
//!
//! A level is a grid plus an ordered list of depth layers. Every layer has
//! one slot per cell, and every slot holds at most one placed instance.
//! Instances themselves live in a `SceneHost`; the store keeps their handle
//! and the template they were made from.

use crate::asset::TemplateRef;
use crate::error::{EditError, EditResult};
use crate::math::Vec3;
use super::grid::{self, Grid};
use super::host::{InstanceHandle, SceneHost, SpawnRequest};
use super::snapshot::{LayerSnapshot, LevelSnapshot, SlotSnapshot, SNAPSHOT_VERSION};

/// Layer names every new level starts with
pub const DEFAULT_LAYERS: [&str; 2] = ["Logic", "Graphics"];

/// A depth layer
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique within a level
    pub name: String,
    /// Offset along the depth axis applied to every instance on this layer
    pub depth: f32,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depth: 0.0,
        }
    }
}

/// The instance occupying a slot
#[derive(Debug, Clone, PartialEq)]
pub struct Occupant {
    pub handle: InstanceHandle,
    pub category: String,
    pub template: String,
    /// Derived from cell, tile size and layer depth; refreshed on every change
    pub position: Vec3,
}

/// A placed instance with its cell coordinates
#[derive(Debug, Clone, Copy)]
pub struct PlacedInstance<'a> {
    pub layer: usize,
    pub col: usize,
    pub row: usize,
    pub occupant: &'a Occupant,
}

/// Display label the host receives for a spawned instance
pub fn instance_label(layer: usize, col: usize, row: usize, template: &str) -> String {
    format!("L{}-[{},{}][{}]", layer, col, row, template)
}

/// Grid of layers of optional placed instances
#[derive(Debug, Clone)]
pub struct Level {
    grid: Grid,
    layers: Vec<Layer>,
    /// `slots[layer][row * columns + col]`
    slots: Vec<Vec<Option<Occupant>>>,
}

impl Level {
    /// Create an empty level with the given layers (all at depth 0)
    pub fn new<S: AsRef<str>>(grid: Grid, layer_names: &[S]) -> EditResult<Self> {
        grid.validate()?;
        let mut level = Self {
            grid,
            layers: Vec::new(),
            slots: Vec::new(),
        };
        for name in layer_names {
            level.add_layer(name.as_ref())?;
        }
        Ok(level)
    }

    /// Rebuild a level from a snapshot, adopting its grid configuration
    pub fn from_snapshot(snapshot: &LevelSnapshot, host: &mut dyn SceneHost) -> EditResult<Self> {
        snapshot.validate()?;
        let grid = snapshot.grid()?;
        let mut level = Self {
            grid,
            layers: Vec::new(),
            slots: Vec::new(),
        };
        level.populate(snapshot, host);
        Ok(level)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer by index
    pub fn layer(&self, index: usize) -> EditResult<&Layer> {
        self.layers.get(index).ok_or(EditError::InvalidLayer {
            index,
            count: self.layers.len(),
        })
    }

    /// Index of the layer with the given name
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// World position of a cell center on a layer
    pub fn cell_to_world(&self, layer: usize, col: usize, row: usize) -> EditResult<Vec3> {
        let depth = self.layer(layer)?.depth;
        self.grid.checked_cell(col as i64, row as i64)?;
        Ok(self.grid.cell_to_world(col, row, depth))
    }

    /// Occupant of a cell, if any. Out-of-range input yields `None`.
    pub fn get(&self, layer: usize, col: i64, row: i64) -> Option<&Occupant> {
        if !self.grid.contains_cell(col, row) {
            return None;
        }
        let index = self.grid.slot_index(col as usize, row as usize);
        self.slots.get(layer)?.get(index)?.as_ref()
    }

    /// Every placed instance, layer by layer in slot order
    pub fn occupants(&self) -> impl Iterator<Item = PlacedInstance<'_>> {
        let grid = self.grid;
        self.slots.iter().enumerate().flat_map(move |(layer, slots)| {
            slots.iter().enumerate().filter_map(move |(index, slot)| {
                slot.as_ref().map(|occupant| {
                    let (col, row) = grid.slot_cell(index);
                    PlacedInstance { layer, col, row, occupant }
                })
            })
        })
    }

    /// Placed instances on a single layer
    pub fn layer_occupants(&self, layer: usize) -> impl Iterator<Item = PlacedInstance<'_>> {
        self.occupants().filter(move |p| p.layer == layer)
    }

    /// Number of occupied slots across all layers
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().flatten().filter(|s| s.is_some()).count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Placement
    // ─────────────────────────────────────────────────────────────────────────

    /// Place a template into a cell. An existing occupant is destroyed first.
    pub fn place(
        &mut self,
        layer: usize,
        col: i64,
        row: i64,
        template: &TemplateRef,
        host: &mut dyn SceneHost,
    ) -> EditResult<InstanceHandle> {
        let depth = self.layer(layer)?.depth;
        let (col, row) = self.grid.checked_cell(col, row)?;
        let index = self.grid.slot_index(col, row);

        if let Some(previous) = self.slots[layer][index].take() {
            host.destroy(previous.handle);
        }

        let position = self.grid.cell_to_world(col, row, depth);
        let label = instance_label(layer, col, row, &template.name);
        let handle = host.spawn(SpawnRequest {
            label: &label,
            category: &template.category,
            template: &template.name,
            position,
        });
        self.slots[layer][index] = Some(Occupant {
            handle,
            category: template.category.clone(),
            template: template.name.clone(),
            position,
        });
        log::debug!("placed {}", label);
        Ok(handle)
    }

    /// Erase a cell. Returns whether something was removed; empty cells are a no-op.
    pub fn erase(&mut self, layer: usize, col: i64, row: i64, host: &mut dyn SceneHost) -> EditResult<bool> {
        self.layer(layer)?;
        let (col, row) = self.grid.checked_cell(col, row)?;
        let index = self.grid.slot_index(col, row);

        match self.slots[layer][index].take() {
            Some(occupant) => {
                host.destroy(occupant.handle);
                log::debug!("erased {}", instance_label(layer, col, row, &occupant.template));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Destroy every occupant on every layer. Layers themselves stay.
    pub fn clear(&mut self, host: &mut dyn SceneHost) -> usize {
        let mut destroyed = 0;
        for slot in self.slots.iter_mut().flatten() {
            if let Some(occupant) = slot.take() {
                host.destroy(occupant.handle);
                destroyed += 1;
            }
        }
        destroyed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layers
    // ─────────────────────────────────────────────────────────────────────────

    /// Append an empty layer at depth 0, returning its index
    pub fn add_layer(&mut self, name: &str) -> EditResult<usize> {
        let name = name.trim();
        if name.is_empty() || self.layer_index(name).is_some() {
            return Err(EditError::InvalidLayerName(name.to_string()));
        }
        self.layers.push(Layer::new(name));
        self.slots.push(vec![None; self.grid.cell_count()]);
        Ok(self.layers.len() - 1)
    }

    /// Remove a layer, destroying its occupants. Later layers shift down by one.
    pub fn remove_layer(&mut self, index: usize, host: &mut dyn SceneHost) -> EditResult<Layer> {
        self.layer(index)?;
        let slots = self.slots.remove(index);
        let destroyed = slots
            .into_iter()
            .flatten()
            .map(|occupant| host.destroy(occupant.handle))
            .count();
        let layer = self.layers.remove(index);
        log::debug!("removed layer '{}' ({} instances destroyed)", layer.name, destroyed);
        Ok(layer)
    }

    /// Move a layer along the depth axis. Occupants are repositioned, not recreated.
    pub fn shift_layer_depth(&mut self, index: usize, delta: f32, host: &mut dyn SceneHost) -> EditResult<f32> {
        self.layer(index)?;
        if !delta.is_finite() {
            return Err(EditError::InvalidGrid(format!("depth delta must be finite (got {})", delta)));
        }
        self.layers[index].depth += delta;
        for occupant in self.slots[index].iter_mut().flatten() {
            occupant.position.z += delta;
            host.reposition(occupant.handle, occupant.position);
        }
        Ok(self.layers[index].depth)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grid changes
    // ─────────────────────────────────────────────────────────────────────────

    /// Change tile size, snapping every occupant to the new spacing
    pub fn resize_tile(&mut self, tile_size: f32, host: &mut dyn SceneHost) -> EditResult<()> {
        grid::validate_tile_size(tile_size)?;
        self.grid.tile_size = tile_size;
        self.reposition_all(host);
        Ok(())
    }

    /// Move the grid anchor, carrying every occupant along
    pub fn set_origin(&mut self, origin: Vec3, host: &mut dyn SceneHost) -> EditResult<()> {
        let moved = Grid { origin, ..self.grid };
        moved.validate()?;
        self.grid = moved;
        self.reposition_all(host);
        Ok(())
    }

    /// Change the cell count. Occupants outside the new extent are destroyed;
    /// the rest keep their (col, row). Returns how many were destroyed.
    pub fn resize_grid(&mut self, columns: usize, rows: usize, host: &mut dyn SceneHost) -> EditResult<usize> {
        grid::validate_dimensions(columns, rows)?;
        let old = self.grid;
        let resized = Grid { columns, rows, ..old };
        let mut destroyed = 0;

        for slots in self.slots.iter_mut() {
            let mut next = vec![None; resized.cell_count()];
            for (index, slot) in slots.drain(..).enumerate() {
                let Some(occupant) = slot else { continue };
                let (col, row) = old.slot_cell(index);
                if col < columns && row < rows {
                    next[resized.slot_index(col, row)] = Some(occupant);
                } else {
                    host.destroy(occupant.handle);
                    destroyed += 1;
                }
            }
            *slots = next;
        }

        self.grid = resized;
        Ok(destroyed)
    }

    fn reposition_all(&mut self, host: &mut dyn SceneHost) {
        let grid = self.grid;
        for (layer, slots) in self.slots.iter_mut().enumerate() {
            let depth = self.layers[layer].depth;
            for (index, slot) in slots.iter_mut().enumerate() {
                if let Some(occupant) = slot {
                    let (col, row) = grid.slot_cell(index);
                    occupant.position = grid.cell_to_world(col, row, depth);
                    host.reposition(occupant.handle, occupant.position);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Capture the full level state
    pub fn snapshot(&self) -> LevelSnapshot {
        let layers = self
            .layers
            .iter()
            .zip(&self.slots)
            .map(|(layer, slots)| LayerSnapshot {
                name: layer.name.clone(),
                depth: layer.depth,
                slots: slots
                    .iter()
                    .enumerate()
                    .filter_map(|(index, slot)| {
                        slot.as_ref().map(|o| SlotSnapshot {
                            index,
                            template: o.template.clone(),
                            category: o.category.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();

        LevelSnapshot {
            version: SNAPSHOT_VERSION,
            columns: self.grid.columns,
            rows: self.grid.rows,
            tile_size: self.grid.tile_size,
            origin: self.grid.origin,
            layers,
        }
    }

    /// Replace the whole level with a snapshot of the same grid size.
    ///
    /// Validation happens before anything is destroyed, so a rejected
    /// snapshot leaves the level untouched.
    pub fn restore(&mut self, snapshot: &LevelSnapshot, host: &mut dyn SceneHost) -> EditResult<()> {
        snapshot.validate()?;
        if snapshot.columns != self.grid.columns || snapshot.rows != self.grid.rows {
            return Err(EditError::IncompatibleSnapshot(format!(
                "snapshot grid {}x{} does not match level grid {}x{}",
                snapshot.columns, snapshot.rows, self.grid.columns, self.grid.rows
            )));
        }
        let grid = snapshot.grid()?;

        self.clear(host);
        self.grid = grid;
        self.populate(snapshot, host);
        Ok(())
    }

    /// Rebuild layers and spawn occupants from an already validated snapshot
    fn populate(&mut self, snapshot: &LevelSnapshot, host: &mut dyn SceneHost) {
        self.layers = snapshot
            .layers
            .iter()
            .map(|l| Layer {
                name: l.name.clone(),
                depth: l.depth,
            })
            .collect();
        self.slots = vec![vec![None; self.grid.cell_count()]; self.layers.len()];

        for (layer, layer_snapshot) in snapshot.layers.iter().enumerate() {
            for slot in &layer_snapshot.slots {
                let (col, row) = self.grid.slot_cell(slot.index);
                let position = self.grid.cell_to_world(col, row, layer_snapshot.depth);
                let label = instance_label(layer, col, row, &slot.template);
                let handle = host.spawn(SpawnRequest {
                    label: &label,
                    category: &slot.category,
                    template: &slot.template,
                    position,
                });
                self.slots[layer][slot.index] = Some(Occupant {
                    handle,
                    category: slot.category.clone(),
                    template: slot.template.clone(),
                    position,
                });
            }
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        let layers = DEFAULT_LAYERS
            .iter()
            .map(|name| Layer::new(*name))
            .collect::<Vec<_>>();
        let grid = Grid::default();
        Self {
            slots: vec![vec![None; grid.cell_count()]; layers.len()],
            grid,
            layers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SceneGraph;
    use std::collections::BTreeSet;

    fn rock() -> TemplateRef {
        TemplateRef::new("Blocks", "Rock")
    }

    fn ground_level() -> Level {
        Level::new(Grid::new(20, 10, 1.0).unwrap(), &["Ground"]).unwrap()
    }

    fn triples(level: &Level) -> BTreeSet<(usize, usize, usize, String)> {
        level
            .occupants()
            .map(|p| (p.layer, p.col, p.row, p.occupant.template.clone()))
            .collect()
    }

    #[test]
    fn test_place_and_erase_scenario() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();

        let handle = level.place(0, 5, 3, &rock(), &mut scene).unwrap();
        let expected = Vec3::new(5.5, 3.5, 0.0);
        assert!(level.cell_to_world(0, 5, 3).unwrap().approx_eq(expected, 1e-6));
        assert!(scene.get(handle).unwrap().position.approx_eq(expected, 1e-6));
        assert_eq!(scene.get(handle).unwrap().label, "L0-[5,3][Rock]");

        assert!(level.erase(0, 5, 3, &mut scene).unwrap());
        assert_eq!(level.occupied_count(), 0);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_place_replaces_occupant() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();

        let first = level.place(0, 2, 2, &rock(), &mut scene).unwrap();
        let second = level
            .place(0, 2, 2, &TemplateRef::new("Blocks", "Brick"), &mut scene)
            .unwrap();

        assert_eq!(level.occupied_count(), 1);
        assert!(!scene.contains(first));
        assert!(scene.contains(second));
        assert_eq!(level.get(0, 2, 2).unwrap().template, "Brick");
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_erase_empty_is_noop() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        level.place(0, 1, 1, &rock(), &mut scene).unwrap();

        let before = triples(&level);
        assert_eq!(level.erase(0, 4, 4, &mut scene), Ok(false));
        assert_eq!(triples(&level), before);
        assert_eq!(scene.destroyed, 0);
    }

    #[test]
    fn test_out_of_bounds_rejected_not_clamped() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();

        assert!(matches!(
            level.place(0, 20, 0, &rock(), &mut scene),
            Err(EditError::OutOfBounds { .. })
        ));
        assert!(matches!(
            level.place(0, -1, 5, &rock(), &mut scene),
            Err(EditError::OutOfBounds { .. })
        ));
        assert!(matches!(
            level.erase(0, 0, 10, &mut scene),
            Err(EditError::OutOfBounds { .. })
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_invalid_layer_rejected() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();

        assert_eq!(
            level.place(3, 0, 0, &rock(), &mut scene),
            Err(EditError::InvalidLayer { index: 3, count: 1 })
        );
        assert!(level.remove_layer(1, &mut scene).is_err());
        assert!(level.shift_layer_depth(1, 2.0, &mut scene).is_err());
    }

    #[test]
    fn test_add_layer_appends_at_depth_zero() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        level.place(0, 1, 1, &rock(), &mut scene).unwrap();

        let index = level.add_layer("Props").unwrap();
        assert_eq!(index, 1);
        assert_eq!(level.layer(1).unwrap().depth, 0.0);
        assert_eq!(level.layer_occupants(1).count(), 0);
        // Existing layer untouched
        assert_eq!(level.get(0, 1, 1).unwrap().template, "Rock");
    }

    #[test]
    fn test_add_layer_rejects_duplicate_and_empty_names() {
        let mut level = ground_level();
        assert!(matches!(level.add_layer("Ground"), Err(EditError::InvalidLayerName(_))));
        assert!(matches!(level.add_layer("   "), Err(EditError::InvalidLayerName(_))));
        assert_eq!(level.layer_count(), 1);
    }

    #[test]
    fn test_remove_layer_destroys_and_compacts() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        level.add_layer("Props").unwrap();
        level.add_layer("Sky").unwrap();

        let doomed = level.place(1, 3, 3, &rock(), &mut scene).unwrap();
        level.place(2, 4, 4, &TemplateRef::new("Sky", "Cloud"), &mut scene).unwrap();

        let removed = level.remove_layer(1, &mut scene).unwrap();
        assert_eq!(removed.name, "Props");
        assert!(!scene.contains(doomed));
        assert_eq!(level.layer_count(), 2);
        assert_eq!(level.layer(1).unwrap().name, "Sky");
        assert_eq!(level.get(1, 4, 4).unwrap().template, "Cloud");

        // Re-adding restores the count but not the content
        level.add_layer("Props").unwrap();
        assert_eq!(level.layer_count(), 3);
        assert!(level.get(2, 3, 3).is_none());
        assert_eq!(level.layer_occupants(2).count(), 0);
    }

    #[test]
    fn test_shift_depth_moves_only_that_layer() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        level.add_layer("Props").unwrap();

        let base = level.place(0, 1, 1, &rock(), &mut scene).unwrap();
        let top = level.place(1, 1, 1, &rock(), &mut scene).unwrap();

        let depth = level.shift_layer_depth(1, 2.0, &mut scene).unwrap();
        assert_eq!(depth, 2.0);
        assert_eq!(level.get(1, 1, 1).unwrap().position.z, 2.0);
        assert_eq!(scene.get(top).unwrap().position.z, 2.0);
        assert_eq!(scene.get(base).unwrap().position.z, 0.0);
        // Repositioned, not recreated
        assert_eq!(scene.spawned, 2);
        assert!(scene.contains(top));
    }

    #[test]
    fn test_resize_tile_keeps_cells() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        level.shift_layer_depth(0, -1.0, &mut scene).unwrap();
        let handle = level.place(0, 2, 1, &rock(), &mut scene).unwrap();

        level.resize_tile(2.0, &mut scene).unwrap();
        let expected = Vec3::new(5.0, 3.0, -1.0);
        assert!(level.get(0, 2, 1).unwrap().position.approx_eq(expected, 1e-6));
        assert!(scene.get(handle).unwrap().position.approx_eq(expected, 1e-6));

        assert!(level.resize_tile(0.0, &mut scene).is_err());
        assert_eq!(level.grid().tile_size, 2.0);
    }

    #[test]
    fn test_resize_grid_reindexes_and_drops_outside() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        level.place(0, 2, 3, &rock(), &mut scene).unwrap();
        let outside = level.place(0, 15, 0, &rock(), &mut scene).unwrap();

        let destroyed = level.resize_grid(10, 5, &mut scene).unwrap();
        assert_eq!(destroyed, 1);
        assert!(!scene.contains(outside));
        assert_eq!(level.get(0, 2, 3).unwrap().template, "Rock");
        assert_eq!(level.occupied_count(), 1);

        let snapshot = level.snapshot();
        assert_eq!(snapshot.layers[0].slots[0].index, 3 * 10 + 2);
    }

    #[test]
    fn test_set_origin_moves_occupants() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        let handle = level.place(0, 0, 0, &rock(), &mut scene).unwrap();

        level.set_origin(Vec3::new(10.0, 10.0, 0.0), &mut scene).unwrap();
        assert!(scene.get(handle).unwrap().position.approx_eq(Vec3::new(10.5, 10.5, 0.0), 1e-6));
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        level.add_layer("Props").unwrap();
        level.add_layer("Sky").unwrap();
        level.place(0, 0, 0, &rock(), &mut scene).unwrap();
        level.place(1, 19, 9, &TemplateRef::new("Props", "Barrel"), &mut scene).unwrap();
        level.place(2, 7, 2, &TemplateRef::new("Sky", "Cloud"), &mut scene).unwrap();
        level.erase(0, 0, 0, &mut scene).unwrap();
        level.place(0, 3, 3, &rock(), &mut scene).unwrap();
        level.remove_layer(2, &mut scene).unwrap();
        level.shift_layer_depth(1, 4.0, &mut scene).unwrap();

        let snapshot = level.snapshot();
        let expected = triples(&level);

        let mut other = ground_level();
        other.place(0, 9, 9, &rock(), &mut scene).unwrap();
        other.restore(&snapshot, &mut scene).unwrap();

        assert_eq!(triples(&other), expected);
        assert_eq!(other.snapshot(), snapshot);
        assert_eq!(other.layer(1).unwrap().depth, 4.0);
        // Original level's instances plus the restored ones
        assert_eq!(scene.len(), level.occupied_count() + other.occupied_count());
    }

    #[test]
    fn test_restore_destroys_previous_occupants() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        let stale = level.place(0, 1, 1, &rock(), &mut scene).unwrap();

        let empty = ground_level().snapshot();
        level.restore(&empty, &mut scene).unwrap();
        assert!(!scene.contains(stale));
        assert_eq!(level.occupied_count(), 0);
    }

    #[test]
    fn test_restore_incompatible_is_all_or_nothing() {
        let mut scene = SceneGraph::new();
        let mut level = ground_level();
        let kept = level.place(0, 1, 1, &rock(), &mut scene).unwrap();

        let other = Level::new(Grid::new(8, 8, 1.0).unwrap(), &["Ground"]).unwrap();
        let result = level.restore(&other.snapshot(), &mut scene);
        assert!(matches!(result, Err(EditError::IncompatibleSnapshot(_))));
        assert!(scene.contains(kept));
        assert_eq!(level.occupied_count(), 1);
    }

    #[test]
    fn test_from_snapshot_adopts_grid() {
        let mut scene = SceneGraph::new();
        let mut level = Level::new(Grid::new(4, 3, 0.5).unwrap(), &["A", "B"]).unwrap();
        level.place(1, 3, 2, &rock(), &mut scene).unwrap();

        let mut fresh_scene = SceneGraph::new();
        let loaded = Level::from_snapshot(&level.snapshot(), &mut fresh_scene).unwrap();
        assert_eq!(loaded.grid(), level.grid());
        assert_eq!(triples(&loaded), triples(&level));
        assert_eq!(fresh_scene.len(), 1);
    }

    #[test]
    fn test_default_level_layers() {
        let level = Level::default();
        assert_eq!(level.layer_count(), 2);
        assert_eq!(level.layer(0).unwrap().name, "Logic");
        assert_eq!(level.layer(1).unwrap().name, "Graphics");
        assert_eq!(level.grid().cell_count(), 200);
    }
}
