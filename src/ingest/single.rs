//! The typing path: one candidate, fail fast.

use crate::domain::{
    Config, EmailEntry, ErrorKind, Rejection, classify, is_valid_format,
    message::{self, ALREADY_ADDED, DOMAIN_NOT_PERMITTED, INVALID_EMAIL},
};

/// Decides whether one typed candidate may join `existing`.
///
/// The candidate is trimmed first; blank input yields `Ok(None)`. Checks run
/// in order (format, domain rules, capacity, duplicates) and the first
/// failure is returned. On success the trimmed address is returned.
///
/// # Errors
///
/// Returns a [`Rejection`] naming the first rule the candidate broke, with
/// the configured replacement text when there is one.
pub fn admit<'a>(
    raw: &'a str,
    existing: &[EmailEntry],
    config: &Config,
) -> Result<Option<&'a str>, Rejection> {
    let email = raw.trim();
    if email.is_empty() {
        return Ok(None);
    }

    if !is_valid_format(email) {
        return Err(rejection(config, ErrorKind::InvalidFormat, INVALID_EMAIL));
    }

    let classification = classify(email, config);
    if let Some(kind) = classification.verdict.error_kind() {
        let message = classification
            .message
            .unwrap_or_else(|| DOMAIN_NOT_PERMITTED.to_string());
        return Err(Rejection::new(kind, message));
    }

    let max = config.effective_max_emails();
    if existing.len() >= max {
        return Err(rejection(
            config,
            ErrorKind::OverCapacity,
            &message::capacity_limit(max),
        ));
    }

    if existing.iter().any(|entry| entry.matches(email)) {
        return Err(rejection(config, ErrorKind::Duplicate, ALREADY_ADDED));
    }

    Ok(Some(email))
}

fn rejection(config: &Config, kind: ErrorKind, default: &str) -> Rejection {
    Rejection::new(kind, config.message_override(kind).unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MaxEmails, rules::DEFAULT_NOT_ALLOWED_MESSAGE};

    #[test]
    fn blank_input_is_a_no_op() {
        assert_eq!(admit("   ", &[], &Config::default()), Ok(None));
    }

    #[test]
    fn trims_accepted_addresses() {
        assert_eq!(
            admit("  jane@example.com\t", &[], &Config::default()),
            Ok(Some("jane@example.com"))
        );
    }

    #[test]
    fn rejects_bad_format_with_default_or_override() {
        let rejection = admit("not-an-email", &[], &Config::default()).unwrap_err();
        assert_eq!(rejection.kind, ErrorKind::InvalidFormat);
        assert_eq!(rejection.message, INVALID_EMAIL);

        let config = Config {
            invalid_email_error_message: "Check the address".to_string(),
            ..Config::default()
        };
        let rejection = admit("not-an-email", &[], &config).unwrap_err();
        assert_eq!(rejection.message, "Check the address");
    }

    #[test]
    fn rejects_domains_outside_the_allow_list() {
        let config = Config {
            allowed_domains: "*.example.com".to_string(),
            ..Config::default()
        };
        assert_eq!(
            admit("a@mail.example.com", &[], &config),
            Ok(Some("a@mail.example.com"))
        );
        let rejection = admit("a@example.org", &[], &config).unwrap_err();
        assert_eq!(rejection.kind, ErrorKind::DomainNotAllowed);
        assert_eq!(rejection.message, DEFAULT_NOT_ALLOWED_MESSAGE);
    }

    #[test]
    fn capacity_is_checked_before_duplicates() {
        let existing = vec![EmailEntry::new("a@x.com")];
        let config = Config {
            max_emails: Some(MaxEmails::Number(1)),
            ..Config::default()
        };
        let rejection = admit("A@x.com", &existing, &config).unwrap_err();
        assert_eq!(rejection.kind, ErrorKind::OverCapacity);
        assert_eq!(
            rejection.message,
            "You can only add up to 1 email addresses."
        );
    }

    #[test]
    fn rejects_case_insensitive_duplicates() {
        let existing = vec![EmailEntry::new("a@x.com")];
        let rejection = admit("A@X.com", &existing, &Config::default()).unwrap_err();
        assert_eq!(rejection.kind, ErrorKind::Duplicate);
        assert_eq!(rejection.message, ALREADY_ADDED);
    }
}
