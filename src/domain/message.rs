//! Rejection kinds and the user-facing texts that describe them.
//!
//! Rejections are ordinary outcomes, not failures: a single candidate is
//! turned away with a [`Rejection`], while a batch reports one [`Removal`] per
//! filter that dropped something. Several messages are combined into an HTML
//! list by [`format_error_messages`].

use std::fmt::{self, Write as _};

use serde::Serialize;

/// The reasons a candidate or a collection can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The text does not look like an email address.
    InvalidFormat,
    /// An allow-list is configured and the domain is not on it.
    DomainNotAllowed,
    /// The domain is on the block-list.
    DomainBlocked,
    /// The address is already present, ignoring case.
    Duplicate,
    /// Accepting the address would exceed the effective maximum.
    OverCapacity,
    /// The field is required and holds no addresses.
    RequiredEmpty,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidFormat => "invalid format",
            Self::DomainNotAllowed => "domain not allowed",
            Self::DomainBlocked => "domain blocked",
            Self::Duplicate => "duplicate",
            Self::OverCapacity => "over capacity",
            Self::RequiredEmpty => "required",
        };
        f.write_str(name)
    }
}

/// A single candidate turned away by the fail-fast path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct Rejection {
    /// Why the candidate was rejected.
    pub kind: ErrorKind,
    /// The text shown to the user.
    pub message: String,
}

impl Rejection {
    /// Creates a rejection of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A summary of the candidates one batch filter dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    /// The filter that dropped them.
    pub kind: ErrorKind,
    /// How many candidates were dropped.
    pub count: usize,
    /// The summary shown to the user.
    pub message: String,
}

// Single-entry texts.

/// Shown when a typed address has an invalid format.
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
/// Shown when a typed address is already in the collection.
pub const ALREADY_ADDED: &str = "This email has already been added.";
/// Fallback for a domain rejection that carries no text of its own.
pub const DOMAIN_NOT_PERMITTED: &str = "Email domain is not allowed.";
/// Shown by form validation when a required field is empty.
pub const REQUIRED_EMPTY: &str = "Please enter at least one email address.";
/// Fallback for a collection entry whose domain fails the rules.
pub const INVALID_DOMAIN_PRESENT: &str = "One or more emails has an invalid domain";

/// `"You can only add up to {max} email addresses."`
#[must_use]
pub fn capacity_limit(max: usize) -> String {
    format!("You can only add up to {max} email addresses.")
}

// Batch texts.

pub(crate) fn invalid_format_removed(count: usize) -> String {
    if count == 1 {
        "1 email with invalid format was removed.".to_string()
    } else {
        format!("{count} emails with invalid format were removed.")
    }
}

pub(crate) fn not_allowed_removed(count: usize) -> String {
    if count == 1 {
        "1 email with domain not in the allowed list was removed.".to_string()
    } else {
        format!("{count} emails with domains not in the allowed list were removed.")
    }
}

pub(crate) fn blocked_removed(count: usize) -> String {
    if count == 1 {
        "1 email with blocked domain was removed.".to_string()
    } else {
        format!("{count} emails with blocked domains were removed.")
    }
}

pub(crate) fn duplicates_skipped(count: usize) -> String {
    if count == 1 {
        "1 duplicate email was skipped.".to_string()
    } else {
        format!("{count} duplicate emails were skipped.")
    }
}

pub(crate) fn capacity_reached(max: usize) -> String {
    format!("You can only add up to {max} email {}.", addresses(max))
}

pub(crate) fn excess_removed(max: usize, removed: usize) -> String {
    format!(
        "You can only add up to {max} email {}. {removed} excess {} removed.",
        addresses(max),
        were(removed, "email"),
    )
}

pub(crate) fn pasted_duplicates_removed(count: usize) -> String {
    format!(
        "{count} duplicate {} removed from the pasted content.",
        were(count, "email")
    )
}

pub(crate) fn duplicates_removed(count: usize) -> String {
    format!("{count} duplicate {} removed.", were(count, "email"))
}

const fn addresses(count: usize) -> &'static str {
    if count > 1 { "addresses" } else { "address" }
}

fn were(count: usize, noun: &str) -> String {
    if count > 1 {
        format!("{noun}s were")
    } else {
        format!("{noun} was")
    }
}

/// Combines messages for display.
///
/// No messages give an empty string and one message is returned verbatim.
/// Two or more become an HTML unordered list, one item per message, in the
/// order given.
#[must_use]
pub fn format_error_messages<S: AsRef<str>>(messages: &[S]) -> String {
    match messages {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        many => {
            let items = many.iter().fold(String::new(), |mut items, message| {
                let _ = write!(items, "<li>{}</li>", message.as_ref());
                items
            });
            format!(r#"<ul style="margin-left: 1rem; list-style-type: disc;">{items}</ul>"#)
        }
    }
}

/// Returns `true` if `message` should be rendered as markup.
///
/// This only looks for both `<` and `>`; it does not sanitize anything.
#[must_use]
pub fn is_rich(message: &str) -> bool {
    message.contains('<') && message.contains('>')
}
