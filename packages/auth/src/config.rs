//! # Guard configuration — `guard.toml`
//!
//! Everything the guard needs to know about the hosting site: which page is the
//! login page, which pages are public, and which storage keys hold the session.
//!
//! ```toml
//! login_page = "login.html"
//! default_page = "index.html"   # identity of an empty path ("" keeps it empty)
//! public_pages = ["index.html", "rotas.html"]
//!
//! [keys]
//! primary = "astronomo_session"
//! legacy = "userSession"
//! ```
//!
//! Every field has a default, so a missing or partial file is equivalent to
//! [`GuardConfig::default`]. [`GuardConfig::base`] reproduces the older
//! deployment that had no public pages and left an empty path unnamed.

use serde::{Deserialize, Serialize};

use crate::page::PageId;

pub const LOGIN_PAGE: &str = "login.html";
pub const DEFAULT_PAGE: &str = "index.html";
pub const PRIMARY_KEY: &str = "astronomo_session";
pub const LEGACY_KEY: &str = "userSession";

/// Pages reachable without a session.
pub const PUBLIC_PAGES: [&str; 7] = [
    "index.html",
    "rotas.html",
    "despesas.html",
    "historico.html",
    "feedbacks.html",
    "account.html",
    "apresentacao.html",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid guard config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize guard config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default = "default_login_page")]
    pub login_page: String,
    /// Page identity used when the path has no last segment.
    #[serde(default = "default_page")]
    pub default_page: String,
    #[serde(default = "default_public_pages")]
    pub public_pages: Vec<String>,
    #[serde(default)]
    pub keys: StorageKeys,
}

/// Storage keys holding the canonical and the legacy session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKeys {
    #[serde(default = "default_primary_key")]
    pub primary: String,
    #[serde(default = "default_legacy_key")]
    pub legacy: String,
}

fn default_login_page() -> String {
    LOGIN_PAGE.to_string()
}

fn default_page() -> String {
    DEFAULT_PAGE.to_string()
}

fn default_public_pages() -> Vec<String> {
    PUBLIC_PAGES.iter().map(|page| page.to_string()).collect()
}

fn default_primary_key() -> String {
    PRIMARY_KEY.to_string()
}

fn default_legacy_key() -> String {
    LEGACY_KEY.to_string()
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            primary: default_primary_key(),
            legacy: default_legacy_key(),
        }
    }
}

impl StorageKeys {
    pub fn contains(&self, key: &str) -> bool {
        key == self.primary || key == self.legacy
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_page: default_login_page(),
            default_page: default_page(),
            public_pages: default_public_pages(),
            keys: StorageKeys::default(),
        }
    }
}

impl GuardConfig {
    /// Configuration of the older deployment: only the login page is unguarded
    /// and an empty path stays unnamed.
    pub fn base() -> Self {
        Self {
            default_page: String::new(),
            public_pages: Vec::new(),
            ..Self::default()
        }
    }

    /// Builder method to replace the public pages.
    pub fn with_public_pages<I, P>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.public_pages = pages.into_iter().map(Into::into).collect();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "guard.toml"
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Identity of the page at `path`.
    pub fn page_id(&self, path: &str) -> PageId {
        PageId::from_path(path, &self.default_page)
    }

    pub fn is_login(&self, page: &PageId) -> bool {
        page.matches(&self.login_page)
    }

    pub fn is_public(&self, page: &PageId) -> bool {
        self.public_pages.iter().any(|public| page.matches(public))
    }

    /// Login and public pages never require a session.
    pub fn is_unguarded(&self, page: &PageId) -> bool {
        self.is_login(page) || self.is_public(page)
    }
}
