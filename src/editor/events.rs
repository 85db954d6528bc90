//! Editor events
//!
//! Components never call each other's listeners directly. They push events
//! into a queue owned by the session, and the frame loop drains it once per
//! tick. Nothing subscribes, so nothing can dangle when a panel closes.

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Events produced by the editor core
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Palette selection changed
    ItemSelected { category: String, variant: String },
    /// Catalog changed during a drain (one per drain, never per item)
    CatalogChanged { revision: u64 },
    /// Level content or shape changed
    LevelChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.send(EditorEvent::LevelChanged);
        queue.send(EditorEvent::CatalogChanged { revision: 3 });
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.iter().count(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![EditorEvent::LevelChanged, EditorEvent::CatalogChanged { revision: 3 }]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue: EventQueue<EditorEvent> = EventQueue::default();
        queue.send(EditorEvent::LevelChanged);
        queue.clear();
        assert!(queue.is_empty());
    }
}
