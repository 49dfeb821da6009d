//! # Client-side session guard
//!
//! Reconciles the two historical session formats kept in browser storage into
//! one canonical [`Session`] and keeps guarded pages behind it.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`parse`] | Safe read of raw stored text |
//! | [`identity`] | Picks the astronomer identity out of many field aliases |
//! | [`normalize`] | Converts a legacy record into the canonical shape |
//! | [`validate`] | Decides whether a record is an active session |
//! | [`resolver`] | Primary-then-legacy lookup with migration-on-read |
//! | [`guard`] | Page guard, logout, cross-tab propagation, `init_guard` |
//! | [`config`] | `guard.toml`: login page, public pages, storage keys |
//! | [`navigator`] | Navigation seam over `window.location` |
//!
//! Nothing here validates credentials or tokens. The guard trusts whatever is
//! already in client-side storage; it only normalizes and gates on it.

pub mod clock;
pub mod coerce;
pub mod config;
pub mod guard;
pub mod identity;
pub mod navigator;
pub mod normalize;
pub mod page;
pub mod parse;
pub mod resolver;
pub mod session;
pub mod timestamp;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, GuardConfig, StorageKeys, LEGACY_KEY, LOGIN_PAGE, PRIMARY_KEY, PUBLIC_PAGES};
pub use guard::{init_guard, AuthHandle, GuardStatus, PageGuard, SessionGuard};
pub use identity::{pick_astronomo_id, AstronomoId, ID_ALIASES};
pub use navigator::{NavigationCall, NavigationError, Navigator, RecordingNavigator};
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use navigator::LocationNavigator;
pub use normalize::normalize_legacy_session;
pub use page::PageId;
pub use parse::safe_parse;
pub use resolver::resolve_session;
pub use session::Session;
pub use validate::has_active_session;
