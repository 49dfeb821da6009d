use std::fmt;

/// Identity of the current page: the last path segment, lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    /// Identity of `path`. An empty last segment (`/`, `/app/`) becomes `default_page`.
    pub fn from_path(path: &str, default_page: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let last = path.rsplit('/').next().unwrap_or_default();
        if last.is_empty() {
            Self::new(default_page)
        } else {
            Self::new(last)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive comparison with a configured page name.
    pub fn matches(&self, name: &str) -> bool {
        self.0 == name.to_lowercase()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_segment_lowercased() {
        assert_eq!(PageId::from_path("/site/Painel.HTML", "index.html").as_str(), "painel.html");
        assert_eq!(PageId::from_path("login.html", "index.html").as_str(), "login.html");
        assert_eq!(PageId::from_path("/a/b.html?next=c#top", "").as_str(), "b.html");
    }

    #[test]
    fn test_empty_segment_uses_default() {
        assert_eq!(PageId::from_path("/", "index.html").as_str(), "index.html");
        assert_eq!(PageId::from_path("", "index.html").as_str(), "index.html");
        assert_eq!(PageId::from_path("/app/", "index.html").as_str(), "index.html");
        assert!(PageId::from_path("/", "").is_empty());
    }

    #[test]
    fn test_matches_ignores_case() {
        assert!(PageId::new("login.html").matches("Login.html"));
        assert!(!PageId::new("login.html").matches("logout.html"));
    }
}
