//! Content folder polling
//!
//! Produces create/delete notifications by diffing directory listings at a
//! fixed interval. The front end feeds them into the catalog queue.

use std::collections::BTreeSet;

use super::catalog::AssetEvent;
use crate::storage::{Storage, StorageError};

/// Seconds between listings
pub const DEFAULT_POLL_INTERVAL: f32 = 1.0;

#[derive(Debug)]
pub struct ContentPoller {
    root: String,
    interval: f32,
    elapsed: f32,
    known: Option<BTreeSet<String>>,
}

impl ContentPoller {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            interval: DEFAULT_POLL_INTERVAL,
            elapsed: 0.0,
            known: None,
        }
    }

    pub fn with_interval(mut self, seconds: f32) -> Self {
        self.interval = seconds.max(0.0);
        self
    }

    /// Advance the timer; lists the content root when the interval elapses
    pub fn update(&mut self, storage: &Storage, dt: f32) -> Vec<AssetEvent> {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return Vec::new();
        }
        self.elapsed = 0.0;
        match self.poll(storage) {
            Ok(events) => events,
            Err(e) => {
                log::debug!("Content poll failed: {}", e);
                Vec::new()
            }
        }
    }

    /// List now and report differences since the previous listing.
    /// The first listing only records the baseline.
    pub fn poll(&mut self, storage: &Storage) -> Result<Vec<AssetEvent>, StorageError> {
        let current = self.list(storage)?;
        let events = match &self.known {
            None => Vec::new(),
            Some(known) => {
                // Folders are created before their files and deleted after them
                let mut events: Vec<AssetEvent> = current
                    .difference(known)
                    .map(|p| AssetEvent::Created(p.clone()))
                    .collect();
                let mut gone: Vec<&String> = known.difference(&current).collect();
                gone.reverse();
                events.extend(gone.into_iter().map(|p| AssetEvent::Deleted(p.clone())));
                events
            }
        };
        self.known = Some(current);
        Ok(events)
    }

    fn list(&self, storage: &Storage) -> Result<BTreeSet<String>, StorageError> {
        let mut paths = BTreeSet::new();
        if !storage.exists(&self.root) {
            return Ok(paths);
        }
        for folder in storage.list_dirs(&self.root)? {
            for file in storage.list(&format!("{}/{}", self.root, folder))? {
                paths.insert(format!("{}/{}", folder, file));
            }
            paths.insert(folder);
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_poll_is_baseline() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("content/Blocks")).unwrap();
        let storage = Storage::with_base_dir(dir.path());
        let mut poller = ContentPoller::new("content");
        assert!(poller.poll(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_reports_created_and_deleted_in_order() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        std::fs::create_dir_all(content.join("Blocks")).unwrap();
        std::fs::write(content.join("Blocks/Rock.ron"), "()").unwrap();
        let storage = Storage::with_base_dir(dir.path());
        let mut poller = ContentPoller::new("content");
        poller.poll(&storage).unwrap();

        std::fs::create_dir_all(content.join("Enemies")).unwrap();
        std::fs::write(content.join("Enemies/Slime.ron"), "()").unwrap();
        std::fs::remove_dir_all(content.join("Blocks")).unwrap();

        let events = poller.poll(&storage).unwrap();
        assert_eq!(
            events,
            vec![
                AssetEvent::Created("Enemies".into()),
                AssetEvent::Created("Enemies/Slime.ron".into()),
                AssetEvent::Deleted("Blocks/Rock.ron".into()),
                AssetEvent::Deleted("Blocks".into()),
            ]
        );
        assert!(poller.poll(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_update_waits_for_interval() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("content")).unwrap();
        let storage = Storage::with_base_dir(dir.path());
        let mut poller = ContentPoller::new("content").with_interval(1.0);
        poller.update(&storage, 1.0);

        std::fs::create_dir_all(dir.path().join("content/Props")).unwrap();
        assert!(poller.update(&storage, 0.5).is_empty());
        assert_eq!(poller.update(&storage, 0.5), vec![AssetEvent::Created("Props".into())]);
    }
}
