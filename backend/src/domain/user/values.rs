//! Validated value types held by [`super::User`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::text::trimmed_non_blank;
use crate::domain::{DomainError, ValidationReason};

/// Minimum allowed length for a username, counted after trimming.
pub const USERNAME_MIN: usize = 3;

/// Account name chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Trim and validate a username.
    ///
    /// The trimmed name must be at least [`USERNAME_MIN`] characters long and
    /// must not contain control characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let username = trimmed_non_blank("username", raw.as_ref())?;
        if username.chars().count() < USERNAME_MIN {
            return Err(DomainError::validation(
                "username",
                ValidationReason::TooShort { min: USERNAME_MIN },
            ));
        }
        if username.chars().any(char::is_control) {
            return Err(DomainError::validation(
                "username",
                ValidationReason::NotPrintable,
            ));
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, no whitespace, and a dotted domain with non-empty labels
        // on both sides of its last dot.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s.]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised (trimmed, lower-cased) email address.
///
/// # Examples
/// ```
/// use civic_backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("  John.Doe@EXAMPLE.COM ")?;
/// assert_eq!(email.as_ref(), "john.doe@example.com");
/// assert!(EmailAddress::new("john@localhost").is_err());
/// # Ok::<(), civic_backend::domain::DomainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let email = trimmed_non_blank("email", raw.as_ref())?.to_lowercase();
        if !email_regex().is_match(&email) {
            return Err(DomainError::validation(
                "email",
                ValidationReason::MalformedEmail,
            ));
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Opaque credential hash. Stored verbatim and never echoed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Accept any hash that is not blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let hash = raw.into();
        if hash.trim().is_empty() {
            return Err(DomainError::blank("password_hash"));
        }
        Ok(Self(hash))
    }

    /// The raw hash, for persistence and credential checks.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
