//! Session guard wiring for component trees.
//!
//! [`SessionProvider`] starts the page guard when it mounts and shares the
//! resulting [`SessionContext`] with its children. Children are only rendered
//! when the page may be shown: unguarded pages always, guarded pages only with
//! an active session. After a redirect has been issued nothing is rendered.
//!
//! The router reuses one component for every page route, so the guard scope is
//! keyed by page and config. A new page remounts the scope and runs the guard
//! again. The old scope's handle is dropped with it, which also ends its
//! cross-tab subscription.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use auth::{init_guard, AuthHandle, GuardConfig, GuardStatus, Navigator, PageGuard, PageId, Session};
use dioxus::prelude::*;
use store::KeyValueStore;

/// Guard handle and start-up outcome for the current page.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionContext {
    pub handle: AuthHandle,
    pub status: GuardStatus,
}

impl SessionContext {
    /// Session resolved at start-up, if the page was guarded.
    pub fn session(&self) -> Option<&Session> {
        match &self.status {
            GuardStatus::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn may_render(&self) -> bool {
        !matches!(self.status, GuardStatus::Redirected)
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// Platform storage holding the session.
///
/// - **Web** (WASM + `web` feature): `window.localStorage` via [`store::LocalStore`]
/// - **Native**: an in-memory [`store::MemoryStore`]
pub fn make_store() -> impl KeyValueStore + Clone + 'static {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStore::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        store::MemoryStore::new()
    }
}

/// Storage and navigation a [`SessionProvider`] guards with.
///
/// Provide one as context above the providers to replace the platform
/// default ([`GuardBackend::platform`]).
#[derive(Clone)]
pub struct GuardBackend(Rc<dyn Fn(PageId, GuardConfig) -> (AuthHandle, GuardStatus)>);

impl GuardBackend {
    pub fn new<S, N>(store: S, navigator: N) -> Self
    where
        S: KeyValueStore + Clone + 'static,
        N: Navigator + Clone + 'static,
    {
        Self(Rc::new(move |page, config| {
            let guard = PageGuard::new(store.clone(), navigator.clone(), config);
            init_guard(guard.with_page(page))
        }))
    }

    pub fn platform() -> Self {
        #[cfg(all(target_arch = "wasm32", feature = "web"))]
        {
            Self::new(make_store(), auth::LocationNavigator::new())
        }
        #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
        {
            Self::new(make_store(), auth::RecordingNavigator::default())
        }
    }

    fn start(&self, page: &str, config: GuardConfig) -> SessionContext {
        let (handle, status) = (self.0)(PageId::new(page), config);
        SessionContext { handle, status }
    }
}

impl std::fmt::Debug for GuardBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardBackend").finish_non_exhaustive()
    }
}

fn scope_key(page: &str, config: &GuardConfig) -> String {
    let mut hasher = DefaultHasher::new();
    config.hash(&mut hasher);
    format!("{}#{:x}", page.to_lowercase(), hasher.finish())
}

/// Guard the page named `page` (e.g. `"painel.html"`) and provide its session.
#[component]
pub fn SessionProvider(
    page: String,
    #[props(default)] config: GuardConfig,
    children: Element,
) -> Element {
    let key = scope_key(&page, &config);

    rsx! {
        for key in std::iter::once(key) {
            GuardScope {
                key: "{key}",
                page: page.clone(),
                config: config.clone(),
                {children.clone()}
            }
        }
    }
}

#[component]
fn GuardScope(page: String, config: GuardConfig, children: Element) -> Element {
    let context = use_hook(move || {
        let backend = try_consume_context::<GuardBackend>().unwrap_or_else(GuardBackend::platform);
        let context = backend.start(&page, config);
        tracing::debug!("guard for `{page}` started: {:?}", context.status);
        context
    });
    let context = use_context_provider(move || context);

    if !context.may_render() {
        return rsx! {};
    }

    rsx! {
        {children}
    }
}

/// Button that clears the session and leaves for the login page.
#[component]
pub fn LogoutButton(
    #[props(default = "Sair".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let session = use_session();

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| session.handle.logout(),
            "{label}"
        }
    }
}
