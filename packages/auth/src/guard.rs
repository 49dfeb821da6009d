//! # Page guard
//!
//! [`PageGuard`] keeps a page behind the client-side session check. It owns the
//! storage, the navigator, the clock and the [`GuardConfig`], and knows which
//! page it is guarding.
//!
//! ## Operations
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | [`get_session`](PageGuard::get_session) | Resolve the session, migrating a legacy record on read. |
//! | [`require_auth`](PageGuard::require_auth) | Resolve; on failure purge both keys and redirect to the login page. |
//! | [`logout`](PageGuard::logout) | Purge both keys and redirect, whatever the current state. |
//! | [`handle_storage_change`](PageGuard::handle_storage_change) | Re-run `require_auth` when another tab cleared a session key. |
//!
//! Redirects are never issued from the login page itself. Every storage removal
//! is its own failure boundary: a failure is logged and the next removal is
//! still attempted.
//!
//! ## Start-up
//!
//! [`init_guard`] is the explicit entry point a page calls once. Unguarded pages
//! (login and public pages) are left alone. Guarded pages run `require_auth`
//! and, when the session holds, subscribe to cross-tab changes. The
//! subscription belongs to the returned [`AuthHandle`]: once every clone of the
//! handle is dropped, the store stops calling the guard.

use std::rc::Rc;

use serde_json::Value;
use store::{ChangeListener, KeyValueStore, StorageChange};

use crate::clock::{Clock, SystemClock};
use crate::config::GuardConfig;
use crate::navigator::{redirect, Navigator};
use crate::page::PageId;
use crate::resolver::resolve_session;
use crate::session::Session;
use crate::validate::has_active_session;

pub struct PageGuard<S, N, C = SystemClock> {
    store: S,
    navigator: N,
    clock: C,
    config: GuardConfig,
    page: PageId,
}

impl<S, N> PageGuard<S, N, SystemClock>
where
    S: KeyValueStore,
    N: Navigator,
{
    /// Guard for the page the navigator is currently on.
    pub fn new(store: S, navigator: N, config: GuardConfig) -> Self {
        let page = config.page_id(&navigator.current_path());
        Self {
            store,
            navigator,
            clock: SystemClock,
            config,
            page,
        }
    }
}

impl<S, N, C> PageGuard<S, N, C>
where
    S: KeyValueStore,
    N: Navigator,
    C: Clock,
{
    /// Builder method to override the page identity.
    pub fn with_page(mut self, page: PageId) -> Self {
        self.page = page;
        self
    }

    /// Builder method to swap the clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> PageGuard<S, N, C2> {
        PageGuard {
            store: self.store,
            navigator: self.navigator,
            clock,
            config: self.config,
            page: self.page,
        }
    }

    pub fn page(&self) -> &PageId {
        &self.page
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_unguarded(&self) -> bool {
        self.config.is_unguarded(&self.page)
    }

    pub fn on_login_page(&self) -> bool {
        self.config.is_login(&self.page)
    }

    pub fn get_session(&self) -> Option<Session> {
        resolve_session(&self.store, &self.config.keys, &self.clock)
    }

    pub fn has_active_session(&self, session: &Value) -> bool {
        has_active_session(session)
    }

    /// The active session, or `None` after purging storage and redirecting.
    pub fn require_auth(&self) -> Option<Session> {
        match self.get_session() {
            Some(session) => Some(session),
            None => {
                tracing::info!("no active session on `{}`", self.page);
                self.purge();
                self.redirect_to_login();
                None
            }
        }
    }

    pub fn logout(&self) {
        tracing::info!("logging out from `{}`", self.page);
        self.purge();
        self.redirect_to_login();
    }

    /// React to a change made by another tab. Returns whether the session was
    /// re-checked.
    pub fn handle_storage_change(&self, change: &StorageChange) -> bool {
        let Some(key) = change.key.as_deref() else {
            return false;
        };
        if !self.config.keys.contains(key) || !change.is_removal() {
            return false;
        }
        tracing::debug!("`{key}` cleared in another tab, re-checking session");
        self.require_auth();
        true
    }

    fn purge(&self) {
        for key in [&self.config.keys.primary, &self.config.keys.legacy] {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!("could not remove `{key}`: {err}");
            }
        }
    }

    /// Returns whether a redirect was issued.
    fn redirect_to_login(&self) -> bool {
        if self.on_login_page() {
            return false;
        }
        if let Err(err) = redirect(&self.navigator, &self.config.login_page) {
            tracing::warn!("redirect to `{}` failed: {err}", self.config.login_page);
        }
        true
    }
}

/// The capabilities a guard exposes to page code.
pub trait SessionGuard {
    fn get_session(&self) -> Option<Session>;
    fn require_auth(&self) -> Option<Session>;
    fn logout(&self);
    fn has_active_session(&self, session: &Value) -> bool;
}

impl<S, N, C> SessionGuard for PageGuard<S, N, C>
where
    S: KeyValueStore,
    N: Navigator,
    C: Clock,
{
    fn get_session(&self) -> Option<Session> {
        PageGuard::get_session(self)
    }

    fn require_auth(&self) -> Option<Session> {
        PageGuard::require_auth(self)
    }

    fn logout(&self) {
        PageGuard::logout(self)
    }

    fn has_active_session(&self, session: &Value) -> bool {
        PageGuard::has_active_session(self, session)
    }
}

/// Cloneable handle to a running guard, shared with page code.
#[derive(Clone)]
pub struct AuthHandle {
    guard: Rc<dyn SessionGuard>,
    subscription: Option<ChangeListener>,
}

impl AuthHandle {
    pub fn new(guard: Rc<dyn SessionGuard>) -> Self {
        Self {
            guard,
            subscription: None,
        }
    }

    /// Keep `listener` subscribed for as long as this handle (or a clone) lives.
    pub fn with_subscription(mut self, listener: ChangeListener) -> Self {
        self.subscription = Some(listener);
        self
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn get_session(&self) -> Option<Session> {
        self.guard.get_session()
    }

    pub fn require_auth(&self) -> Option<Session> {
        self.guard.require_auth()
    }

    pub fn logout(&self) {
        self.guard.logout()
    }

    pub fn has_active_session(&self, session: &Value) -> bool {
        self.guard.has_active_session(session)
    }
}

impl PartialEq for AuthHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.guard, &other.guard)
    }
}

impl std::fmt::Debug for AuthHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHandle")
            .field("subscribed", &self.is_subscribed())
            .finish_non_exhaustive()
    }
}

/// Outcome of [`init_guard`].
#[derive(Clone, Debug, PartialEq)]
pub enum GuardStatus {
    /// Login or public page: nothing was checked.
    Skipped,
    /// No active session: storage purged and a redirect issued.
    Redirected,
    /// Session active and the handle subscribed to cross-tab changes.
    Active(Session),
}

/// Start guarding the page. Call once per page (or per client-side navigation).
pub fn init_guard<S, N, C>(guard: PageGuard<S, N, C>) -> (AuthHandle, GuardStatus)
where
    S: KeyValueStore + 'static,
    N: Navigator + 'static,
    C: Clock + 'static,
{
    let guard = Rc::new(guard);
    let handle = AuthHandle::new(guard.clone());

    if guard.is_unguarded() {
        tracing::debug!("`{}` is unguarded", guard.page());
        return (handle, GuardStatus::Skipped);
    }

    let Some(session) = guard.require_auth() else {
        return (handle, GuardStatus::Redirected);
    };

    let weak = Rc::downgrade(&guard);
    let listener: ChangeListener = Rc::new(move |change: &StorageChange| {
        if let Some(guard) = weak.upgrade() {
            guard.handle_storage_change(change);
        }
    });
    guard.store().on_external_change(&listener);

    (handle.with_subscription(listener), GuardStatus::Active(session))
}
