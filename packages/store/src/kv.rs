//! # Key-value storage seam
//!
//! Session state lives in the browser's persistent key-value storage. Everything
//! above this crate talks to it through [`KeyValueStore`] so the reconciliation
//! and guard logic can run against [`crate::MemoryStore`] in tests and against
//! [`crate::LocalStore`] (`window.localStorage`) in the browser.
//!
//! ## Contract
//!
//! | Method | Failure mode |
//! |--------|--------------|
//! | [`get`](KeyValueStore::get) | Never fails. An unavailable backend reads as "absent". |
//! | [`set`](KeyValueStore::set) | Returns [`StoreError`] (quota, disabled storage). |
//! | [`remove`](KeyValueStore::remove) | Returns [`StoreError`]. |
//! | [`on_external_change`](KeyValueStore::on_external_change) | Subscribes a listener to changes made by *another* browsing context. |
//!
//! Writes report errors instead of swallowing them so callers can wrap each side
//! effect in its own failure boundary.
//!
//! Stores hold listeners weakly through a [`ListenerSet`]. A subscription lasts
//! while the caller keeps its [`ChangeListener`] alive; dropping it unsubscribes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A change to shared storage made by another browsing context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    /// Changed key. `None` when the whole storage area was cleared.
    pub key: Option<String>,
    pub old_value: Option<String>,
    /// New value, `None` when the key was removed.
    pub new_value: Option<String>,
}

impl StorageChange {
    pub fn new(key: Option<&str>, old_value: Option<&str>, new_value: Option<&str>) -> Self {
        Self {
            key: key.map(str::to_string),
            old_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
        }
    }

    /// True when the change removed or emptied the value.
    pub fn is_removal(&self) -> bool {
        self.new_value.as_deref().map_or(true, str::is_empty)
    }
}

/// Callback invoked for every external storage change.
pub type ChangeListener = Rc<dyn Fn(&StorageChange)>;

/// Weakly held subscribers. Dead entries are pruned on subscribe and dispatch.
#[derive(Default)]
pub struct ListenerSet {
    listeners: RefCell<Vec<Weak<dyn Fn(&StorageChange)>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: &ChangeListener) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|weak| weak.strong_count() > 0);
        listeners.push(Rc::downgrade(listener));
    }

    /// Call every live listener with `change`.
    pub fn dispatch(&self, change: &StorageChange) {
        // Listeners may subscribe or write back into the store, so release the borrow first.
        let live: Vec<ChangeListener> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener(change);
        }
    }

    /// Number of listeners still alive.
    pub fn len(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet").field("live", &self.len()).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded while writing `{key}`")]
    QuotaExceeded { key: String },
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// Subscribe `listener` to changes made outside this context. The store keeps
    /// only a weak reference; the subscription ends when `listener` is dropped.
    fn on_external_change(&self, listener: &ChangeListener);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn on_external_change(&self, listener: &ChangeListener) {
        (**self).on_external_change(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_detection() {
        assert!(StorageChange::new(Some("k"), Some("v"), None).is_removal());
        assert!(StorageChange::new(Some("k"), Some("v"), Some("")).is_removal());
        assert!(!StorageChange::new(Some("k"), None, Some("{}")).is_removal());
    }

    #[test]
    fn test_dropped_listeners_are_pruned() {
        let set = ListenerSet::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let sink = calls.clone();
        let kept: ChangeListener = Rc::new(move |_: &StorageChange| sink.borrow_mut().push("kept"));
        let sink = calls.clone();
        let dropped: ChangeListener =
            Rc::new(move |_: &StorageChange| sink.borrow_mut().push("dropped"));
        set.subscribe(&kept);
        set.subscribe(&dropped);
        assert_eq!(set.len(), 2);

        drop(dropped);
        assert_eq!(set.len(), 1);

        set.dispatch(&StorageChange::new(Some("k"), None, Some("v")));
        assert_eq!(*calls.borrow(), vec!["kept"]);
        assert_eq!(set.listeners.borrow().len(), 1);
    }

    #[test]
    fn test_listener_may_subscribe_during_dispatch() {
        let set = Rc::new(ListenerSet::new());
        let late: ChangeListener = Rc::new(|_: &StorageChange| {});
        let inner = set.clone();
        let late_ref = late.clone();
        let first: ChangeListener = Rc::new(move |_: &StorageChange| inner.subscribe(&late_ref));
        set.subscribe(&first);

        set.dispatch(&StorageChange::new(Some("k"), None, None));
        assert_eq!(set.len(), 2);
    }
}
