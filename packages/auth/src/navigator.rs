//! # Navigation seam
//!
//! The guard never touches `window.location` directly. It asks a [`Navigator`]
//! for the current path and to leave the page.
//!
//! | Implementation | Used by |
//! |----------------|---------|
//! | [`LocationNavigator`] | the browser (`wasm32` + `web` feature) |
//! | [`RecordingNavigator`] | tests and native builds; records every call |

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation is unavailable")]
    Unavailable,
    #[error("navigation to `{target}` failed: {reason}")]
    Failed { target: String, reason: String },
}

pub trait Navigator {
    /// Path of the current page, e.g. `/app/painel.html`.
    fn current_path(&self) -> String;
    /// Navigate without leaving a history entry.
    fn replace(&self, target: &str) -> Result<(), NavigationError>;
    /// Plain navigation.
    fn assign(&self, target: &str) -> Result<(), NavigationError>;
}

impl<N: Navigator + ?Sized> Navigator for Rc<N> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn replace(&self, target: &str) -> Result<(), NavigationError> {
        (**self).replace(target)
    }

    fn assign(&self, target: &str) -> Result<(), NavigationError> {
        (**self).assign(target)
    }
}

/// Leave the page for `target`: `replace` first, `assign` when that fails.
pub fn redirect<N: Navigator + ?Sized>(navigator: &N, target: &str) -> Result<(), NavigationError> {
    match navigator.replace(target) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::warn!("replace({target}) failed, falling back to assign: {err}");
            navigator.assign(target)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationCall {
    Replace(String),
    Assign(String),
}

impl NavigationCall {
    pub fn target(&self) -> &str {
        match self {
            NavigationCall::Replace(target) | NavigationCall::Assign(target) => target,
        }
    }
}

/// Navigator that only records what it was asked to do.
///
/// Clones share the path and the call log. A successful navigation does not
/// change [`current_path`](Navigator::current_path); tests move between pages
/// with [`RecordingNavigator::set_path`].
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator {
    path: Rc<RefCell<String>>,
    calls: Rc<RefCell<Vec<NavigationCall>>>,
    fail_replace: Rc<Cell<bool>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        let navigator = Self::default();
        navigator.set_path(path);
        navigator
    }

    pub fn set_path(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
    }

    /// Make `replace` fail so the `assign` fallback is exercised.
    pub fn fail_replace(&self, fail: bool) {
        self.fail_replace.set(fail);
    }

    pub fn calls(&self) -> Vec<NavigationCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn replace(&self, target: &str) -> Result<(), NavigationError> {
        if self.fail_replace.get() {
            return Err(NavigationError::Failed {
                target: target.to_string(),
                reason: "replace disabled".to_string(),
            });
        }
        self.calls
            .borrow_mut()
            .push(NavigationCall::Replace(target.to_string()));
        Ok(())
    }

    fn assign(&self, target: &str) -> Result<(), NavigationError> {
        self.calls
            .borrow_mut()
            .push(NavigationCall::Assign(target.to_string()));
        Ok(())
    }
}

/// `window.location`-backed navigator.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationNavigator;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl LocationNavigator {
    pub fn new() -> Self {
        Self
    }

    fn location(&self) -> Result<web_sys::Location, NavigationError> {
        web_sys::window()
            .map(|window| window.location())
            .ok_or(NavigationError::Unavailable)
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl Navigator for LocationNavigator {
    fn current_path(&self) -> String {
        self.location()
            .ok()
            .and_then(|location| location.pathname().ok())
            .unwrap_or_default()
    }

    fn replace(&self, target: &str) -> Result<(), NavigationError> {
        self.location()?
            .replace(target)
            .map_err(|err| NavigationError::Failed {
                target: target.to_string(),
                reason: format!("{err:?}"),
            })
    }

    fn assign(&self, target: &str) -> Result<(), NavigationError> {
        self.location()?
            .set_href(target)
            .map_err(|err| NavigationError::Failed {
                target: target.to_string(),
                reason: format!("{err:?}"),
            })
    }
}
