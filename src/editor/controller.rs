//! Scene editing controller
//!
//! Turns pointer input in world space into grid edits on the selected layer,
//! and owns the layer-selection commands.

use std::collections::HashSet;

use crate::asset::AssetCatalog;
use crate::error::EditResult;
use crate::math::Vec3;
use crate::world::{InstanceHandle, Layer, Level, SceneHost};
use crate::config::DEFAULT_DEPTH_STEP;
use super::palette::Selection;

/// What a pointer press does on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    View,
    Paint,
    Erase,
}

impl EditMode {
    pub fn label(&self) -> &'static str {
        match self {
            EditMode::View => "View",
            EditMode::Paint => "Paint",
            EditMode::Erase => "Erase",
        }
    }
}

/// A grid edit carried out by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum CellEdit {
    Placed { col: usize, row: usize, handle: InstanceHandle, template: String },
    Erased { col: usize, row: usize },
}

#[derive(Debug)]
pub struct Controller {
    pub mode: EditMode,
    selected_layer: usize,
    depth_step: f32,
    /// Cells touched since the last pointer-down
    stroke: HashSet<(i64, i64)>,
    /// Last pointer cell, for the status bar
    pub hover: Option<(i64, i64)>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH_STEP)
    }
}

impl Controller {
    pub fn new(depth_step: f32) -> Self {
        Self {
            mode: EditMode::View,
            selected_layer: 0,
            depth_step,
            stroke: HashSet::new(),
            hover: None,
        }
    }

    pub fn selected_layer(&self) -> usize {
        self.selected_layer
    }

    pub fn depth_step(&self) -> f32 {
        self.depth_step
    }

    pub fn select_layer(&mut self, index: usize, level: &Level) -> EditResult<()> {
        level.layer(index)?;
        self.selected_layer = index;
        Ok(())
    }

    /// Step the layer selection, wrapping at both ends
    pub fn cycle_layer(&mut self, forward: bool, level: &Level) {
        let count = level.layer_count();
        if count == 0 {
            self.selected_layer = 0;
            return;
        }
        self.selected_layer = if forward {
            (self.selected_layer + 1) % count
        } else {
            (self.selected_layer + count - 1) % count
        };
    }

    /// Keep the selection valid after the level's layers changed underneath
    pub fn clamp_layer(&mut self, level: &Level) {
        if self.selected_layer >= level.layer_count() {
            self.selected_layer = level.layer_count().saturating_sub(1);
        }
    }

    pub fn pointer_down(
        &mut self,
        point: Vec3,
        level: &mut Level,
        catalog: &AssetCatalog,
        selection: Option<&Selection>,
        host: &mut dyn SceneHost,
    ) -> EditResult<Option<CellEdit>> {
        self.stroke.clear();
        self.apply(point, level, catalog, selection, host)
    }

    /// Continue a stroke; cells already touched in it are skipped
    pub fn pointer_drag(
        &mut self,
        point: Vec3,
        level: &mut Level,
        catalog: &AssetCatalog,
        selection: Option<&Selection>,
        host: &mut dyn SceneHost,
    ) -> EditResult<Option<CellEdit>> {
        self.apply(point, level, catalog, selection, host)
    }

    pub fn pointer_up(&mut self) {
        self.stroke.clear();
    }

    pub fn pointer_move(&mut self, point: Vec3, level: &Level) {
        let cell = level.grid().world_to_cell(point);
        self.hover = level.grid().contains_cell(cell.0, cell.1).then_some(cell);
    }

    fn apply(
        &mut self,
        point: Vec3,
        level: &mut Level,
        catalog: &AssetCatalog,
        selection: Option<&Selection>,
        host: &mut dyn SceneHost,
    ) -> EditResult<Option<CellEdit>> {
        if self.mode == EditMode::View {
            return Ok(None);
        }
        let (col, row) = level.grid().world_to_cell(point);
        if !self.stroke.insert((col, row)) {
            return Ok(None);
        }

        match self.mode {
            EditMode::View => Ok(None),
            EditMode::Paint => {
                let Some(selection) = selection else {
                    return Ok(None);
                };
                // Validate the target before rolling a template
                level.layer(self.selected_layer)?;
                let (c, r) = level.grid().checked_cell(col, row)?;
                let template = catalog.resolve(&selection.category, &selection.variant)?;
                let handle = level.place(self.selected_layer, col, row, &template, host)?;
                Ok(Some(CellEdit::Placed { col: c, row: r, handle, template: template.name }))
            }
            EditMode::Erase => {
                let erased = level.erase(self.selected_layer, col, row, host)?;
                let (c, r) = level.grid().checked_cell(col, row)?;
                Ok(erased.then_some(CellEdit::Erased { col: c, row: r }))
            }
        }
    }

    /// Append a layer. Without a name (or with a blank one) the first free
    /// "Layer N" is used.
    pub fn add_layer(&mut self, level: &mut Level, name: Option<&str>) -> EditResult<usize> {
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            return level.add_layer(name);
        }
        let mut n = level.layer_count() + 1;
        let name = loop {
            let candidate = format!("Layer {}", n);
            if level.layer_index(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };
        level.add_layer(&name)
    }

    /// Remove the selected layer; the selection moves down one
    pub fn remove_selected_layer(&mut self, level: &mut Level, host: &mut dyn SceneHost) -> EditResult<Layer> {
        let removed = level.remove_layer(self.selected_layer, host)?;
        self.selected_layer = self.selected_layer.saturating_sub(1);
        self.stroke.clear();
        Ok(removed)
    }

    /// Shift the selected layer by one depth step, `up` towards +Z
    pub fn shift_selected_depth(&mut self, up: bool, level: &mut Level, host: &mut dyn SceneHost) -> EditResult<f32> {
        let delta = if up { self.depth_step } else { -self.depth_step };
        level.shift_layer_depth(self.selected_layer, delta, host)
    }
}
