//! Environment helpers and type-safe wrappers for server tests.

use std::fmt;

/// Environment variable that points the harness at an existing database
/// instead of a fresh temporary `SQLite` file.
pub const TEST_DATABASE_ENV: &str = "SUPERLISTS_TEST_DATABASE_URL";

/// Newtype wrapping a database connection URL that provides ergonomic
/// conversions for type-safe handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbUrl(String);

impl DbUrl {
    /// Constructs a new database URL from any string-like type.
    pub fn new(url: impl Into<String>) -> Self { Self(url.into()) }
    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Database named by [`TEST_DATABASE_ENV`], if set and non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var(TEST_DATABASE_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self)
    }
}

impl From<&str> for DbUrl {
    fn from(value: &str) -> Self { Self(value.to_owned()) }
}

impl From<String> for DbUrl {
    fn from(value: String) -> Self { Self(value) }
}

impl AsRef<str> for DbUrl {
    fn as_ref(&self) -> &str { &self.0 }
}

impl fmt::Display for DbUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}
