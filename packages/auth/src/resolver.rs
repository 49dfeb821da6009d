//! # Session resolution with migration-on-read
//!
//! [`resolve_session`] is the one place that decides which stored record counts
//! as the current session:
//!
//! 1. The primary key, if its record is active, is returned as stored.
//! 2. Otherwise the legacy key is normalized. An active result is written back
//!    under the primary key so later reads take step 1, then returned.
//! 3. Otherwise there is no session.
//!
//! The write-back is best-effort. A failed write is logged and the normalized
//! session is still returned for the current decision.

use store::KeyValueStore;

use crate::clock::Clock;
use crate::config::StorageKeys;
use crate::normalize::normalize_legacy_session;
use crate::parse::safe_parse;
use crate::session::Session;
use crate::validate::has_active_session;

pub fn resolve_session<S, C>(store: &S, keys: &StorageKeys, clock: &C) -> Option<Session>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    let primary = safe_parse(store.get(&keys.primary).as_deref());
    if let Some(primary) = primary.filter(has_active_session) {
        tracing::debug!("session found under `{}`", keys.primary);
        return Session::from_value(primary);
    }

    let legacy = safe_parse(store.get(&keys.legacy).as_deref());
    let normalized = normalize_legacy_session(legacy.as_ref(), clock).filter(Session::is_active)?;

    match store.set(&keys.primary, &normalized.to_json()) {
        Ok(()) => tracing::info!(
            "migrated legacy session from `{}` to `{}`",
            keys.legacy,
            keys.primary
        ),
        Err(err) => tracing::warn!("could not persist migrated session: {err}"),
    }
    Some(normalized)
}
