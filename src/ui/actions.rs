//! Action Registry
//!
//! Every editor command is an `Action` with an id, label, optional keyboard
//! shortcut and an enable condition. Toolbar buttons and shortcuts both go
//! through the registry, so a command behaves the same however it is fired.
//!
//! ```ignore
//! let mut registry = ActionRegistry::new();
//! registry.register(Action::new("layer.remove")
//!     .label("Remove Layer")
//!     .shortcut(Shortcut::ctrl(KeyCode::Delete))
//!     .enabled_when(|ctx| ctx.layer_count > 0));
//!
//! for id in registry.process_triggers(&ctx) {
//!     session.execute(id)?;
//! }
//! ```

use macroquad::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// A keyboard shortcut (key + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: KeyCode,
    pub ctrl: bool, // Cmd on Mac
    pub shift: bool,
}

impl Shortcut {
    pub fn key(key: KeyCode) -> Self {
        Self { key, ctrl: false, shift: false }
    }

    pub fn ctrl(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: false }
    }

    pub fn ctrl_shift(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: true }
    }

    pub fn shift(key: KeyCode) -> Self {
        Self { key, ctrl: false, shift: true }
    }

    /// Whether a key press with the given modifiers fires this shortcut
    pub fn matches(&self, key: KeyCode, ctrl: bool, shift: bool) -> bool {
        self.key == key && self.ctrl == ctrl && self.shift == shift
    }

    /// Check if this shortcut was pressed this frame
    pub fn is_pressed(&self) -> bool {
        if !is_key_pressed(self.key) {
            return false;
        }
        let ctrl_down = is_key_down(KeyCode::LeftControl)
            || is_key_down(KeyCode::RightControl)
            || is_key_down(KeyCode::LeftSuper)
            || is_key_down(KeyCode::RightSuper);
        let shift_down = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        self.matches(self.key, ctrl_down, shift_down)
    }

    /// Format for display (e.g. "Ctrl+S")
    pub fn display(&self) -> String {
        let mut out = String::new();
        if self.ctrl {
            out.push_str(if cfg!(target_os = "macos") { "Cmd+" } else { "Ctrl+" });
        }
        if self.shift {
            out.push_str("Shift+");
        }
        out.push_str(key_name(self.key));
        out
    }
}

fn key_name(key: KeyCode) -> &'static str {
    match key {
        KeyCode::A => "A",
        KeyCode::B => "B",
        KeyCode::E => "E",
        KeyCode::L => "L",
        KeyCode::N => "N",
        KeyCode::O => "O",
        KeyCode::P => "P",
        KeyCode::S => "S",
        KeyCode::V => "V",
        KeyCode::Delete => "Del",
        KeyCode::Minus => "-",
        KeyCode::Equal => "=",
        KeyCode::LeftBracket => "[",
        KeyCode::RightBracket => "]",
        KeyCode::Tab => "Tab",
        KeyCode::F5 => "F5",
        KeyCode::F9 => "F9",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        _ => "?",
    }
}

/// Editor state that action enable/checked conditions look at
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    /// Current edit mode label ("View", "Paint", "Erase")
    pub mode: &'static str,
    /// A palette item is armed
    pub has_selection: bool,
    pub layer_count: usize,
    /// Level has a file path to save to / reload from
    pub has_level_path: bool,
    /// Unsaved changes
    pub is_dirty: bool,
    pub palette_open: bool,
    /// Scene is in play mode (editing disabled)
    pub playing: bool,
    /// Text field has focus (blocks shortcuts)
    pub text_editing: bool,
}

type EnableFn = fn(&ActionContext) -> bool;
type CheckedFn = fn(&ActionContext) -> bool;

fn always_enabled(_: &ActionContext) -> bool {
    true
}

/// A registered action
#[derive(Clone)]
pub struct Action {
    /// Unique identifier (e.g. "level.save")
    pub id: &'static str,
    pub label: &'static str,
    pub default_shortcut: Option<Shortcut>,
    pub shortcut: Option<Shortcut>,
    pub status_tip: &'static str,
    enabled_fn: EnableFn,
    checked_fn: Option<CheckedFn>,
    /// Group for toolbar layout
    pub category: &'static str,
}

impl Action {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            label: "",
            default_shortcut: None,
            shortcut: None,
            status_tip: "",
            enabled_fn: always_enabled,
            checked_fn: None,
            category: "General",
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn shortcut(mut self, shortcut: Shortcut) -> Self {
        self.default_shortcut = Some(shortcut.clone());
        self.shortcut = Some(shortcut);
        self
    }

    pub fn status_tip(mut self, tip: &'static str) -> Self {
        self.status_tip = tip;
        self
    }

    pub fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    pub fn enabled_when(mut self, f: EnableFn) -> Self {
        self.enabled_fn = f;
        self
    }

    pub fn checked_when(mut self, f: CheckedFn) -> Self {
        self.checked_fn = Some(f);
        self
    }

    pub fn is_enabled(&self, ctx: &ActionContext) -> bool {
        if ctx.text_editing {
            return false;
        }
        (self.enabled_fn)(ctx)
    }

    pub fn is_checked(&self, ctx: &ActionContext) -> bool {
        self.checked_fn.map_or(false, |f| f(ctx))
    }

    /// Tooltip with shortcut hint
    pub fn tooltip(&self) -> String {
        let text = if self.status_tip.is_empty() { self.label } else { self.status_tip };
        match &self.shortcut {
            Some(shortcut) => format!("{} ({})", text, shortcut.display()),
            None => text.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RebindError {
    #[error("action '{0}' not found")]
    NotFound(String),
    #[error("shortcut already used by '{0}'")]
    Conflict(&'static str),
}

/// Central registry for all actions
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<&'static str, Action>,
    /// Registration order, for toolbars and deterministic trigger order
    order: Vec<&'static str>,
    shortcut_map: HashMap<Shortcut, &'static str>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: Action) {
        if let Some(ref shortcut) = action.shortcut {
            self.shortcut_map.insert(shortcut.clone(), action.id);
        }
        if !self.actions.contains_key(action.id) {
            self.order.push(action.id);
        }
        self.actions.insert(action.id, action);
    }

    pub fn get(&self, id: &str) -> Option<&Action> {
        self.actions.get(id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_enabled(&self, id: &str, ctx: &ActionContext) -> bool {
        self.actions.get(id).map_or(false, |a| a.is_enabled(ctx))
    }

    pub fn is_checked(&self, id: &str, ctx: &ActionContext) -> bool {
        self.actions.get(id).map_or(false, |a| a.is_checked(ctx))
    }

    pub fn tooltip(&self, id: &str) -> String {
        self.actions.get(id).map_or_else(String::new, |a| a.tooltip())
    }

    /// Action bound to a shortcut, if any
    pub fn find_by_shortcut(&self, shortcut: &Shortcut) -> Option<&'static str> {
        self.shortcut_map.get(shortcut).copied()
    }

    /// Rebind (or unbind with `None`) an action's shortcut
    pub fn rebind(&mut self, id: &str, new_shortcut: Option<Shortcut>) -> Result<(), RebindError> {
        let action = self
            .actions
            .get_mut(id)
            .ok_or_else(|| RebindError::NotFound(id.to_string()))?;
        let static_id = action.id;

        if let Some(ref shortcut) = new_shortcut {
            if let Some(&existing) = self.shortcut_map.get(shortcut) {
                if existing != static_id {
                    return Err(RebindError::Conflict(existing));
                }
            }
        }

        if let Some(old) = action.shortcut.take() {
            self.shortcut_map.remove(&old);
        }
        if let Some(shortcut) = new_shortcut {
            self.shortcut_map.insert(shortcut.clone(), static_id);
            action.shortcut = Some(shortcut);
        }
        Ok(())
    }

    pub fn reset_shortcut(&mut self, id: &str) -> Result<(), RebindError> {
        let default = self
            .actions
            .get(id)
            .ok_or_else(|| RebindError::NotFound(id.to_string()))?
            .default_shortcut
            .clone();
        self.rebind(id, default)
    }

    /// Actions of a category in registration order
    pub fn actions_in_category(&self, category: &str) -> Vec<&Action> {
        self.order
            .iter()
            .filter_map(|id| self.actions.get(id))
            .filter(|a| a.category == category)
            .collect()
    }

    /// Enabled actions whose shortcut was pressed this frame
    pub fn process_triggers(&self, ctx: &ActionContext) -> Vec<&'static str> {
        self.order
            .iter()
            .filter_map(|id| self.actions.get(id))
            .filter(|a| a.is_enabled(ctx) && a.shortcut.as_ref().map_or(false, |s| s.is_pressed()))
            .map(|a| a.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_display_and_match() {
        let s = Shortcut::ctrl(KeyCode::S);
        assert!(s.display().ends_with("+S"));
        assert!(s.matches(KeyCode::S, true, false));
        assert!(!s.matches(KeyCode::S, false, false));
        assert_eq!(Shortcut::key(KeyCode::F5).display(), "F5");
    }

    #[test]
    fn test_enable_conditions() {
        let mut registry = ActionRegistry::new();
        registry.register(
            Action::new("layer.remove")
                .label("Remove Layer")
                .enabled_when(|ctx| ctx.layer_count > 0),
        );

        let empty = ActionContext::default();
        assert!(!registry.is_enabled("layer.remove", &empty));

        let ctx = ActionContext { layer_count: 2, ..Default::default() };
        assert!(registry.is_enabled("layer.remove", &ctx));

        let typing = ActionContext { layer_count: 2, text_editing: true, ..Default::default() };
        assert!(!registry.is_enabled("layer.remove", &typing));
        assert!(!registry.is_enabled("missing", &ctx));
    }

    #[test]
    fn test_rebind_conflict_and_reset() {
        let mut registry = ActionRegistry::new();
        registry.register(Action::new("level.save").shortcut(Shortcut::ctrl(KeyCode::S)));
        registry.register(Action::new("level.open").shortcut(Shortcut::ctrl(KeyCode::O)));

        assert_eq!(
            registry.rebind("level.open", Some(Shortcut::ctrl(KeyCode::S))),
            Err(RebindError::Conflict("level.save"))
        );
        assert!(registry.rebind("level.open", Some(Shortcut::ctrl(KeyCode::L))).is_ok());
        assert_eq!(registry.find_by_shortcut(&Shortcut::ctrl(KeyCode::L)), Some("level.open"));
        assert_eq!(registry.find_by_shortcut(&Shortcut::ctrl(KeyCode::O)), None);

        registry.reset_shortcut("level.open").unwrap();
        assert_eq!(registry.find_by_shortcut(&Shortcut::ctrl(KeyCode::O)), Some("level.open"));
        assert!(matches!(registry.rebind("nope", None), Err(RebindError::NotFound(_))));
    }

    #[test]
    fn test_category_keeps_registration_order() {
        let mut registry = ActionRegistry::new();
        registry.register(Action::new("b").category("Layer"));
        registry.register(Action::new("a").category("Layer"));
        registry.register(Action::new("c").category("Level"));
        let ids: Vec<_> = registry.actions_in_category("Layer").iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_tooltip() {
        let action = Action::new("catalog.refresh")
            .label("Refresh Catalog")
            .shortcut(Shortcut::key(KeyCode::F5));
        assert_eq!(action.tooltip(), "Refresh Catalog (F5)");
    }
}
