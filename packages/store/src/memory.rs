use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::kv::{ChangeListener, KeyValueStore, ListenerSet, StorageChange, StoreError};

/// In-memory KeyValueStore for testing and native builds.
///
/// Clones share the same entries and listeners. Local writes never notify
/// listeners; use [`MemoryStore::apply_external_change`] to simulate another tab.
/// Listeners are held weakly, like every store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    listeners: Rc<ListenerSet>,
    fail_writes: Rc<Cell<bool>>,
    failing_removals: Rc<RefCell<HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail with a quota error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make `remove(key)` fail until the store is dropped.
    pub fn fail_removal_of(&self, key: &str) {
        self.failing_removals.borrow_mut().insert(key.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Live subscribers only.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Apply a change as if another browsing context made it, then notify listeners.
    pub fn apply_external_change(&self, key: &str, new_value: Option<&str>) {
        let old_value = {
            let mut entries = self.entries.borrow_mut();
            match new_value {
                Some(value) if !value.is_empty() => entries.insert(key.to_string(), value.to_string()),
                _ => entries.remove(key),
            }
        };
        let change = StorageChange {
            key: Some(key.to_string()),
            old_value,
            new_value: new_value.map(str::to_string),
        };
        self.notify(&change);
    }

    /// Deliver an arbitrary change to listeners without touching the entries.
    pub fn notify(&self, change: &StorageChange) {
        self.listeners.dispatch(change);
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.borrow())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.failing_removals.borrow().contains(key) {
            return Err(StoreError::Backend(format!("cannot remove `{key}`")));
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn on_external_change(&self, listener: &ChangeListener) {
        self.listeners.subscribe(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").is_none());

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.remove("a").unwrap();
        assert!(store.get("a").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_failure_injection() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.fail_writes(true);
        assert_eq!(
            store.set("c", "3"),
            Err(StoreError::QuotaExceeded { key: "c".into() })
        );
        assert!(store.get("c").is_none());

        store.fail_removal_of("a");
        assert!(store.remove("a").is_err());
        assert!(store.remove("b").is_ok());
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert!(store.get("b").is_none());
    }

    #[test]
    fn test_local_writes_do_not_notify() {
        let store = MemoryStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let listener: ChangeListener = Rc::new(move |change: &StorageChange| {
            sink.borrow_mut().push(change.clone());
        });
        store.on_external_change(&listener);

        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(seen.borrow().is_empty());

        store.set("k", "v").unwrap();
        store.apply_external_change("k", None);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].key.as_deref(), Some("k"));
        assert_eq!(seen[0].old_value.as_deref(), Some("v"));
        assert!(seen[0].is_removal());
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_dropping_listener_unsubscribes() {
        let store = MemoryStore::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let listener: ChangeListener = Rc::new(move |_: &StorageChange| counter.set(counter.get() + 1));
        store.on_external_change(&listener);
        assert_eq!(store.listener_count(), 1);

        store.apply_external_change("k", Some("1"));
        drop(listener);
        store.apply_external_change("k", Some("2"));

        assert_eq!(hits.get(), 1);
        assert_eq!(store.listener_count(), 0);
    }
}
