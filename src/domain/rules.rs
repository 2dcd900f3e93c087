//! Allow-list and block-list rules for email domains.
//!
//! Both lists are comma-separated patterns. A pattern either equals the
//! domain exactly or contains `*` wildcards, each of which matches any run of
//! characters (including none) anywhere in the domain.

use regex::Regex;
use serde::Serialize;

use crate::domain::{Config, message::ErrorKind};

/// Default text for an address whose domain is on the block-list.
pub const DEFAULT_BLOCKED_MESSAGE: &str = "This email domain is not allowed.";

/// Default text for an address whose domain is missing from the allow-list.
pub const DEFAULT_NOT_ALLOWED_MESSAGE: &str = "This email domain is not in the allowed list.";

/// Text used when an address has no domain at all.
pub const MISSING_DOMAIN_MESSAGE: &str = "Invalid email format.";

/// The outcome of checking a candidate address against the domain rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The domain is acceptable (or no rules are configured).
    Valid,
    /// There is nothing after the `@`.
    InvalidFormat,
    /// The domain matches a block-list pattern.
    Blocked,
    /// An allow-list is configured and the domain matches none of it.
    NotAllowed,
}

impl Verdict {
    /// The error kind reported for this verdict, if it is a rejection.
    #[must_use]
    pub const fn error_kind(self) -> Option<ErrorKind> {
        match self {
            Self::Valid => None,
            Self::InvalidFormat => Some(ErrorKind::InvalidFormat),
            Self::Blocked => Some(ErrorKind::DomainBlocked),
            Self::NotAllowed => Some(ErrorKind::DomainNotAllowed),
        }
    }
}

/// A [`Verdict`] together with the message to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// What the rules decided.
    pub verdict: Verdict,
    /// User-facing text, present for every verdict except [`Verdict::Valid`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Classification {
    const fn valid() -> Self {
        Self {
            verdict: Verdict::Valid,
            message: None,
        }
    }

    fn rejected(verdict: Verdict, message: impl Into<String>) -> Self {
        Self {
            verdict,
            message: Some(message.into()),
        }
    }

    /// Returns `true` if the address passed the domain rules.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.verdict == Verdict::Valid
    }
}

/// Checks the domain of `candidate` against the configured rules.
///
/// The domain is the text between the first and second `@` (lower-cased).
/// The block-list is consulted before the allow-list, so an address that
/// both lists would reject is reported as [`Verdict::Blocked`].
#[must_use]
pub fn classify(candidate: &str, config: &Config) -> Classification {
    let Some(domain) = candidate
        .split('@')
        .nth(1)
        .filter(|domain| !domain.is_empty())
        .map(str::to_lowercase)
    else {
        return Classification::rejected(Verdict::InvalidFormat, MISSING_DOMAIN_MESSAGE);
    };

    let has_allowed = !config.allowed_domains.trim().is_empty();
    let has_blocked = !config.blocked_domains.trim().is_empty();

    if !has_allowed && !has_blocked {
        return Classification::valid();
    }

    if has_blocked && matches_any(&domain, &config.blocked_domains) {
        let message = config
            .message_override(ErrorKind::DomainBlocked)
            .unwrap_or(DEFAULT_BLOCKED_MESSAGE);
        return Classification::rejected(Verdict::Blocked, message);
    }

    if has_allowed && !matches_any(&domain, &config.allowed_domains) {
        let message = config
            .message_override(ErrorKind::DomainNotAllowed)
            .unwrap_or(DEFAULT_NOT_ALLOWED_MESSAGE);
        return Classification::rejected(Verdict::NotAllowed, message);
    }

    Classification::valid()
}

/// Returns `true` if `domain` matches any pattern of the comma-separated
/// `list`. Patterns are trimmed and lower-cased; empty ones are ignored.
fn matches_any(domain: &str, list: &str) -> bool {
    list.split(',')
        .map(|pattern| pattern.trim().to_lowercase())
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| domain_matches_pattern(domain, &pattern))
}

/// Returns `true` if `domain` matches `pattern`.
///
/// Without a `*` this is plain string equality. With one or more `*`, every
/// other character is taken literally and each `*` matches any sequence; the
/// whole domain must match.
///
/// ```
/// use mailfield::domain::rules::domain_matches_pattern;
///
/// assert!(domain_matches_pattern("example.com", "example.com"));
/// assert!(domain_matches_pattern("mail.example.com", "*.example.com"));
/// assert!(domain_matches_pattern("example.co.uk", "example.*"));
/// assert!(!domain_matches_pattern("example.com", "*.example.com"));
/// ```
#[must_use]
pub fn domain_matches_pattern(domain: &str, pattern: &str) -> bool {
    if domain == pattern {
        return true;
    }
    if !pattern.contains('*') {
        return false;
    }

    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    Regex::new(&format!("^{body}$")).is_ok_and(|re| re.is_match(domain))
}
