//! # `localStorage` store — browser-side persistence
//!
//! [`LocalStore`] is the [`KeyValueStore`] used on the **web platform**. It reads and
//! writes `window.localStorage`, which is shared by every tab of the same origin.
//!
//! The storage handle is re-acquired on every call. Browsers can disable storage at
//! any time (private mode, user settings), and a missing handle simply reads as
//! "absent" and fails writes with [`StoreError::Unavailable`].
//!
//! Cross-tab changes arrive as `storage` events on `window`. The browser never
//! fires them in the tab that made the change, matching [`crate::MemoryStore`].
//! One `storage` closure is attached per document, the first time anything
//! subscribes. It fans out to a thread-local [`ListenerSet`], so client-side
//! navigation that mounts and drops guards does not pile up window listeners.

use std::cell::Cell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DomException, Storage, StorageEvent};

use crate::kv::{ChangeListener, KeyValueStore, ListenerSet, StorageChange, StoreError};

thread_local! {
    static SUBSCRIBERS: ListenerSet = ListenerSet::new();
    static ATTACHED: Cell<bool> = const { Cell::new(false) };
}

/// `window.localStorage`-backed KeyValueStore.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or(StoreError::Unavailable)
    }
}

fn map_js_error(key: &str, err: JsValue) -> StoreError {
    match err.dyn_into::<DomException>() {
        Ok(exception) if exception.name() == "QuotaExceededError" => StoreError::QuotaExceeded {
            key: key.to_string(),
        },
        Ok(exception) => StoreError::Backend(exception.message()),
        Err(other) => StoreError::Backend(format!("{other:?}")),
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage().ok()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| map_js_error(key, err))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| map_js_error(key, err))
    }

    fn on_external_change(&self, listener: &ChangeListener) {
        SUBSCRIBERS.with(|set| set.subscribe(listener));
        if !ATTACHED.with(Cell::get) {
            attach_window_listener();
        }
    }
}

fn attach_window_listener() {
    let Some(window) = web_sys::window() else {
        tracing::warn!("no window; storage listener not attached");
        return;
    };
    let closure = Closure::<dyn FnMut(StorageEvent)>::new(move |event: StorageEvent| {
        let change = StorageChange {
            key: event.key(),
            old_value: event.old_value(),
            new_value: event.new_value(),
        };
        SUBSCRIBERS.with(|set| set.dispatch(&change));
    });
    if let Err(err) =
        window.add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
    {
        tracing::warn!("failed to attach storage listener: {err:?}");
        return;
    }
    ATTACHED.with(|attached| attached.set(true));
    tracing::debug!("storage listener attached");
    // Lives as long as the document.
    closure.forget();
}
