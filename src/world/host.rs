//! Scene host contract
//!
//! The placement store never owns rendered objects. It asks a host to spawn
//! one, keeps the returned handle for indexing, and hands the handle back
//! to `destroy` on replace, erase or layer removal.

use std::collections::BTreeMap;
use crate::math::Vec3;

/// Opaque reference to an instance living in the host's scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(pub u64);

/// What the store asks the host to create
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest<'a> {
    /// Display label (`L{layer}-[{col},{row}][{template}]`)
    pub label: &'a str,
    pub category: &'a str,
    pub template: &'a str,
    pub position: Vec3,
}

/// External scene that owns the lifetime of placed instances
pub trait SceneHost {
    /// Create an instance and return its handle
    fn spawn(&mut self, request: SpawnRequest<'_>) -> InstanceHandle;

    /// Destroy an instance. Unknown handles are ignored.
    fn destroy(&mut self, handle: InstanceHandle);

    /// Move an existing instance without recreating it
    fn reposition(&mut self, handle: InstanceHandle, position: Vec3);
}

/// A spawned instance as seen by the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub label: String,
    pub category: String,
    pub template: String,
    pub position: Vec3,
}

/// In-memory scene host
///
/// Used by the front end as the drawable scene and by tests to observe
/// spawn/destroy/reposition traffic.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<InstanceHandle, SceneNode>,
    next_id: u64,
    /// Lifetime counters
    pub spawned: usize,
    pub destroyed: usize,
    pub repositioned: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live node
    pub fn get(&self, handle: InstanceHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    /// Is the handle still alive
    pub fn contains(&self, handle: InstanceHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate live nodes in spawn order
    pub fn iter(&self) -> impl Iterator<Item = (InstanceHandle, &SceneNode)> {
        self.nodes.iter().map(|(h, n)| (*h, n))
    }
}

impl SceneHost for SceneGraph {
    fn spawn(&mut self, request: SpawnRequest<'_>) -> InstanceHandle {
        self.next_id += 1;
        let handle = InstanceHandle(self.next_id);
        self.nodes.insert(
            handle,
            SceneNode {
                label: request.label.to_string(),
                category: request.category.to_string(),
                template: request.template.to_string(),
                position: request.position,
            },
        );
        self.spawned += 1;
        handle
    }

    fn destroy(&mut self, handle: InstanceHandle) {
        if self.nodes.remove(&handle).is_some() {
            self.destroyed += 1;
        }
    }

    fn reposition(&mut self, handle: InstanceHandle, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.position = position;
            self.repositioned += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(template: &str) -> SpawnRequest<'_> {
        SpawnRequest {
            label: template,
            category: "Blocks",
            template,
            position: Vec3::ZERO,
        }
    }

    #[test]
    fn test_spawn_assigns_unique_handles() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(request("Rock"));
        let b = scene.spawn(request("Rock"));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_destroy_unknown_is_ignored() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(request("Rock"));
        scene.destroy(a);
        scene.destroy(a);
        assert_eq!(scene.destroyed, 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_reposition_keeps_handle() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(request("Rock"));
        scene.reposition(a, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.get(a).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.spawned, 1);
    }
}
