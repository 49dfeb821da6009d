//! # Notifier — transient on-screen messages
//!
//! Page code calls [`show`] (or [`show_no_data`]) from anywhere inside the Dioxus
//! runtime; [`crate::NotificationHost`] renders whatever is queued. The notifier
//! never reads or writes session state.
//!
//! ## Timing
//!
//! | `timeout_ms` | Behaviour |
//! |--------------|-----------|
//! | `None` | auto-dismiss after [`DEFAULT_TIMEOUT_MS`], unless `options.sticky` |
//! | `Some(0)` | stays until dismissed |
//! | `Some(ms)` | auto-dismiss after `ms` |
//!
//! Dismissal first marks the entry as leaving (the host fades it out) and removes
//! it [`FADE_MS`] later. A timer that fires for an entry already leaving or gone
//! does nothing, so manual dismissal effectively cancels it.

use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;

pub const DEFAULT_TIMEOUT_MS: u32 = 4_000;
pub const FADE_MS: u32 = 300;
pub const NO_DATA_MESSAGE: &str = "Nenhum dado encontrado.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    pub fn class(self) -> &'static str {
        match self {
            Severity::Info => "notifier-item info",
            Severity::Warning => "notifier-item warning",
            Severity::Error => "notifier-item error",
            Severity::Success => "notifier-item success",
        }
    }
}

pub type NotificationId = u64;

/// Optional action button and dismissal behaviour.
#[derive(Clone)]
pub struct NotifyOptions {
    pub action_label: Option<String>,
    pub on_action: Option<Rc<dyn Fn()>>,
    /// Dismiss the notification once its action ran.
    pub dismiss_on_action: bool,
    /// Never auto-dismiss when no timeout is given.
    pub sticky: bool,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            action_label: None,
            on_action: None,
            dismiss_on_action: true,
            sticky: false,
        }
    }
}

impl NotifyOptions {
    /// Builder method to attach an action button.
    pub fn with_action(mut self, label: impl Into<String>, on_action: impl Fn() + 'static) -> Self {
        self.action_label = Some(label.into());
        self.on_action = Some(Rc::new(on_action));
        self
    }

    pub fn keep_open_on_action(mut self) -> Self {
        self.dismiss_on_action = false;
        self
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

impl std::fmt::Debug for NotifyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyOptions")
            .field("action_label", &self.action_label)
            .field("has_action", &self.on_action.is_some())
            .field("dismiss_on_action", &self.dismiss_on_action)
            .field("sticky", &self.sticky)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub options: NotifyOptions,
    pub leaving: bool,
}

impl Notification {
    pub fn class(&self) -> String {
        if self.leaving {
            format!("{} leaving", self.severity.class())
        } else {
            self.severity.class().to_string()
        }
    }
}

impl PartialEq for Notification {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.leaving == other.leaving
    }
}

/// Queue of displayed notifications.
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    next_id: NotificationId,
    entries: Vec<Notification>,
}

impl Notifications {
    /// Queue a message. Returns its id and the auto-dismiss delay, if any.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        timeout_ms: Option<u32>,
        options: NotifyOptions,
    ) -> (NotificationId, Option<u32>) {
        self.next_id += 1;
        let id = self.next_id;
        let timeout = effective_timeout(timeout_ms, options.sticky);
        self.entries.push(Notification {
            id,
            message: message.into(),
            severity,
            options,
            leaving: false,
        });
        (id, timeout)
    }

    /// Mark `id` as leaving. Returns false if it was already leaving or gone.
    pub fn begin_dismiss(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id && !n.leaving) {
            Some(entry) => {
                entry.leaving = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: NotificationId) {
        self.entries.retain(|n| n.id != id);
    }

    /// Action callback of `id` and whether running it should dismiss.
    pub fn action(&self, id: NotificationId) -> Option<(Rc<dyn Fn()>, bool)> {
        let entry = self.get(id).filter(|n| !n.leaving)?;
        let on_action = entry.options.on_action.clone()?;
        Some((on_action, entry.options.dismiss_on_action))
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn effective_timeout(timeout_ms: Option<u32>, sticky: bool) -> Option<u32> {
    match timeout_ms {
        Some(0) => None,
        Some(ms) => Some(ms),
        None if sticky => None,
        None => Some(DEFAULT_TIMEOUT_MS),
    }
}

pub static NOTIFICATIONS: GlobalSignal<Notifications> = Signal::global(Notifications::default);

/// Show a message. Must be called inside the Dioxus runtime.
pub fn show(
    message: impl Into<String>,
    severity: Severity,
    timeout_ms: Option<u32>,
    options: NotifyOptions,
) -> NotificationId {
    let message = message.into();
    tracing::debug!("notify {severity:?}: {message}");
    let (id, timeout) = NOTIFICATIONS.write().push(message, severity, timeout_ms, options);
    if let Some(ms) = timeout {
        spawn(async move {
            sleep(ms).await;
            dismiss(id);
        });
    }
    id
}

/// Persistent informational message for empty results.
pub fn show_no_data(message: &str) -> NotificationId {
    let message = if message.trim().is_empty() {
        NO_DATA_MESSAGE
    } else {
        message
    };
    show(message, Severity::Info, Some(0), NotifyOptions::default())
}

pub fn dismiss(id: NotificationId) {
    if !NOTIFICATIONS.write().begin_dismiss(id) {
        return;
    }
    spawn(async move {
        sleep(FADE_MS).await;
        NOTIFICATIONS.write().remove(id);
    });
}

/// Run the action attached to `id`.
pub fn invoke_action(id: NotificationId) {
    let Some((on_action, dismiss_after)) = NOTIFICATIONS.read().action(id) else {
        return;
    };
    on_action();
    if dismiss_after {
        dismiss(id);
    }
}

async fn sleep(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(Duration::from_millis(u64::from(ms))).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(Duration::from_millis(u64::from(ms))).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_timeouts() {
        let mut queue = Notifications::default();
        let (_, t) = queue.push("a", Severity::Info, None, NotifyOptions::default());
        assert_eq!(t, Some(DEFAULT_TIMEOUT_MS));
        let (_, t) = queue.push("b", Severity::Error, Some(0), NotifyOptions::default());
        assert_eq!(t, None);
        let (_, t) = queue.push("c", Severity::Warning, Some(1_500), NotifyOptions::default());
        assert_eq!(t, Some(1_500));
        let (_, t) = queue.push("d", Severity::Success, None, NotifyOptions::default().sticky());
        assert_eq!(t, None);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut queue = Notifications::default();
        let (a, _) = queue.push("a", Severity::Info, None, NotifyOptions::default());
        let (b, _) = queue.push("b", Severity::Info, None, NotifyOptions::default());
        assert_ne!(a, b);
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut queue = Notifications::default();
        let (id, _) = queue.push("a", Severity::Info, None, NotifyOptions::default());

        assert!(queue.begin_dismiss(id));
        assert!(queue.get(id).unwrap().leaving);
        assert_eq!(queue.get(id).unwrap().class(), "notifier-item info leaving");
        // A late auto-dismiss timer finds nothing to do.
        assert!(!queue.begin_dismiss(id));

        queue.remove(id);
        assert!(queue.is_empty());
        assert!(!queue.begin_dismiss(id));
    }

    #[test]
    fn test_action() {
        let ran = Rc::new(Cell::new(0));
        let counter = ran.clone();
        let mut queue = Notifications::default();
        let options = NotifyOptions::default()
            .with_action("Tentar novamente", move || counter.set(counter.get() + 1))
            .keep_open_on_action();
        let (id, _) = queue.push("falhou", Severity::Error, Some(0), options);

        let (on_action, dismiss_after) = queue.action(id).unwrap();
        on_action();
        assert_eq!(ran.get(), 1);
        assert!(!dismiss_after);
        assert_eq!(queue.get(id).unwrap().options.action_label.as_deref(), Some("Tentar novamente"));

        queue.begin_dismiss(id);
        assert!(queue.action(id).is_none());
    }

    #[test]
    fn test_no_action_by_default() {
        let mut queue = Notifications::default();
        let (id, _) = queue.push("a", Severity::Info, None, NotifyOptions::default());
        assert!(queue.action(id).is_none());
        assert!(queue.get(id).unwrap().options.dismiss_on_action);
    }
}
