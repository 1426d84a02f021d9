//! Message store: the enabled, priority-ordered rotation set.
//!
//! The whole set lives behind one `ArcSwap`: a reload builds a new sorted
//! vector and swaps it in, so a tick that took a [`Snapshot`] keeps seeing
//! the set it started with.

use std::sync::Arc;

use arc_swap::ArcSwap;
use herald_core::types::Message;
use rand::seq::SliceRandom;

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot(Arc<Vec<Arc<Message>>>);

impl Snapshot {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn random_pick(&self) -> Option<Arc<Message>> {
        self.0.choose(&mut rand::thread_rng()).cloned()
    }

    /// Message at `cursor mod len`.
    pub fn sequential_pick(&self, cursor: u64) -> Option<Arc<Message>> {
        if self.0.is_empty() {
            return None;
        }
        let index = (cursor % self.0.len() as u64) as usize;
        self.0.get(index).cloned()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Message>> {
        self.0.iter().find(|m| m.name == name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Message>> {
        self.0.iter()
    }
}

/// Authoritative set of dispatchable messages.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: ArcSwap<Vec<Arc<Message>>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set: disabled messages are dropped, the rest are
    /// sorted by priority (highest first, ties keep discovery order).
    /// Returns the number of messages kept.
    pub fn replace_all(&self, messages: impl IntoIterator<Item = Message>) -> usize {
        let mut enabled: Vec<Arc<Message>> = messages
            .into_iter()
            .filter(|m| {
                if !m.enabled {
                    tracing::debug!("Skipped disabled message: {}", m.name);
                }
                m.enabled
            })
            .map(Arc::new)
            .collect();
        enabled.sort_by(|a, b| b.priority.cmp(&a.priority));

        let count = enabled.len();
        self.messages.store(Arc::new(enabled));
        count
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.messages.load_full())
    }

    pub fn count(&self) -> usize {
        self.messages.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn random_pick(&self) -> Option<Arc<Message>> {
        self.snapshot().random_pick()
    }

    pub fn sequential_pick(&self, cursor: u64) -> Option<Arc<Message>> {
        self.snapshot().sequential_pick(cursor)
    }

    /// Enabled message by name.
    pub fn get(&self, name: &str) -> Option<Arc<Message>> {
        self.snapshot().get(name)
    }

    /// Names in rotation order.
    pub fn names(&self) -> Vec<String> {
        self.messages.load().iter().map(|m| m.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(name: &str, priority: i32, enabled: bool) -> Message {
        Message::chat(name, [name]).with_priority(priority).with_enabled(enabled)
    }

    #[test]
    fn test_replace_all_filters_and_sorts() {
        let store = MessageStore::new();
        let kept = store.replace_all([
            msg("off", 100, false),
            msg("high", 5, true),
            msg("low", 1, true),
        ]);
        assert_eq!(kept, 2);
        assert_eq!(store.count(), 2);
        assert_eq!(store.sequential_pick(0).unwrap().name, "high");
        assert!(store.get("off").is_none());
    }

    #[test]
    fn test_priority_ties_keep_discovery_order() {
        let store = MessageStore::new();
        store.replace_all([
            msg("a", 0, true),
            msg("b", 3, true),
            msg("c", 0, true),
            msg("d", 3, true),
        ]);
        assert_eq!(store.names(), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sequential_pick_cycles() {
        let store = MessageStore::new();
        store.replace_all([msg("m0", 0, true), msg("m1", 0, true), msg("m2", 0, true)]);
        let picked: Vec<String> = (0..5)
            .map(|cursor| store.sequential_pick(cursor).unwrap().name.clone())
            .collect();
        assert_eq!(picked, vec!["m0", "m1", "m2", "m0", "m1"]);
        assert_eq!(store.sequential_pick(u64::MAX).unwrap().name, "m0");
    }

    #[test]
    fn test_empty_store() {
        let store = MessageStore::new();
        assert_eq!(store.count(), 0);
        assert!(store.is_empty());
        assert!(store.random_pick().is_none());
        assert!(store.sequential_pick(7).is_none());
    }

    #[test]
    fn test_random_pick_stays_in_set() {
        let store = MessageStore::new();
        store.replace_all([msg("x", 0, true), msg("y", 0, true)]);
        for _ in 0..50 {
            let name = store.random_pick().unwrap().name.clone();
            assert!(name == "x" || name == "y");
        }
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let store = MessageStore::new();
        store.replace_all([msg("old", 0, true)]);
        let before = store.snapshot();

        store.replace_all([msg("new1", 0, true), msg("new2", 0, true)]);
        assert_eq!(before.len(), 1);
        assert_eq!(before.sequential_pick(0).unwrap().name, "old");
        assert_eq!(store.count(), 2);
    }
}
