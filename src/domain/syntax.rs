//! Email address syntax checks.
//!
//! This is a pragmatic, ASCII-oriented matcher rather than an RFC 5322
//! parser: a dot-atom or quoted local part, an `@`, then either a bracketed
//! IPv4 literal or a dotted host whose final label has at least two letters.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*)|(?:".+"))@(?:(?:\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(?:(?:[a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

/// An address wrapped in angle brackets, as in `Jane Doe <jane@example.com>`.
pub(crate) static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})>")
        .expect("bracketed email pattern is valid")
});

/// Returns `true` if `candidate` looks like a single email address.
///
/// The whole string must match; surrounding whitespace is not trimmed.
///
/// ```
/// use mailfield::domain::syntax::is_valid_format;
///
/// assert!(is_valid_format("jane.doe@example.com"));
/// assert!(is_valid_format("\"jane doe\"@[192.168.0.1]"));
/// assert!(!is_valid_format("jane@example"));
/// assert!(!is_valid_format("a@b@example.com"));
/// ```
#[must_use]
pub fn is_valid_format(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        for email in [
            "a@b.co",
            "first.last@example.com",
            "user+tag@mail.example.org",
            "o'brien@example.ie",
            "x@sub-domain.example.travel",
            "\"quoted local\"@example.com",
            "admin@[10.0.0.1]",
        ] {
            assert!(is_valid_format(email), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            "user@@example.com",
            "a@b@example.com",
            "user name@example.com",
            ".user@example.com",
            "user.@example.com",
            "user..name@example.com",
            "user@exa_mple.com",
            " user@example.com",
        ] {
            assert!(!is_valid_format(email), "{email:?} should be invalid");
        }
    }

    #[test]
    fn bracketed_pattern_captures_inner_address() {
        let captures = BRACKETED_RE
            .captures("Jane Doe <jane@example.com>")
            .unwrap();
        assert_eq!(&captures[1], "jane@example.com");
        assert!(BRACKETED_RE.captures("<not an address>").is_none());
    }
}
