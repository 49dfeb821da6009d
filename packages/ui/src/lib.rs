//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod notifier;
pub use notifier::{
    dismiss, invoke_action, show, show_no_data, NotificationId, Notifications, NotifyOptions,
    Severity,
};

mod notification_host;
pub use notification_host::NotificationHost;

mod session;
pub use session::{
    make_store, use_session, GuardBackend, LogoutButton, SessionContext, SessionProvider,
};
