//! Property-based invariant tests for the email field.
//!
//! Verifies:
//! 1. Capacity: the collection never exceeds the effective maximum after any
//!    sequence of adds, key presses, pastes, removals and clears
//! 2. Uniqueness: no two accepted addresses are equal ignoring case
//! 3. `emailList` always equals `emailCollection` joined by commas
//! 4. `report_validity` is idempotent
//! 5. Patterns without `*` match by equality
//! 6. Patterns with `*` match like an anchored wildcard
//! 7. Addresses without `@` never pass the format check

use std::collections::HashSet;

use mailfield::{
    Config, EmailField, Key,
    domain::{MaxEmails, domain_matches_pattern, is_valid_format},
};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_local() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9._]{0,6}"
}

fn arb_domain() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("example.com".to_string()),
        Just("Example.COM".to_string()),
        Just("mail.example.com".to_string()),
        Just("bad.com".to_string()),
        Just("other.org".to_string()),
    ]
}

fn arb_address() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (arb_local(), arb_domain()).prop_map(|(local, domain)| format!("{local}@{domain}")),
        1 => Just("not-an-email".to_string()),
        1 => Just("broken@".to_string()),
    ]
}

fn arb_separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(", "), Just(";"), Just("\n"), Just(" ")]
}

fn arb_paste() -> impl Strategy<Value = String> {
    prop::collection::vec((arb_address(), arb_separator()), 1..12).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(address, separator)| format!("{address}{separator}"))
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Enter(String),
    Paste(String),
    Clear,
    RemoveFirst,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_address().prop_map(Op::Add),
        arb_address().prop_map(Op::Enter),
        arb_paste().prop_map(Op::Paste),
        Just(Op::Clear),
        Just(Op::RemoveFirst),
    ]
}

fn arb_config() -> impl Strategy<Value = Config> {
    (
        prop::option::of(0i64..8),
        prop_oneof![Just(""), Just("*.example.com, example.com")],
        prop_oneof![Just(""), Just("bad.com")],
    )
        .prop_map(|(max, allowed, blocked)| Config {
            max_emails: max.map(MaxEmails::Number),
            allowed_domains: allowed.to_string(),
            blocked_domains: blocked.to_string(),
            ..Config::default()
        })
}

fn apply(field: &mut EmailField, op: &Op) {
    match op {
        Op::Add(text) => field.add_email(text),
        Op::Enter(text) => {
            field.key_down(Key::Enter, text);
        }
        Op::Paste(text) => field.paste(text),
        Op::Clear => field.clear_emails(),
        Op::RemoveFirst => {
            if let Some(id) = field.entries().first().map(|entry| entry.id()) {
                field.remove_email(id);
            }
        }
    }
}

// ── Field invariants ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn collection_never_exceeds_the_maximum(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..20),
    ) {
        let max = config.effective_max_emails();
        let mut field = EmailField::new(config);
        field.connected();
        for op in &ops {
            apply(&mut field, op);
            prop_assert!(field.entries().len() <= max);
        }
    }

    #[test]
    fn accepted_addresses_are_unique_ignoring_case(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..20),
    ) {
        let mut field = EmailField::new(config);
        field.connected();
        for op in &ops {
            apply(&mut field, op);
            let mut seen = HashSet::new();
            for entry in field.entries() {
                prop_assert!(seen.insert(entry.value().to_lowercase()), "duplicate {}", entry.value());
            }
        }
    }

    #[test]
    fn email_list_mirrors_the_collection(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..20),
    ) {
        let mut field = EmailField::new(config);
        field.connected();
        for op in &ops {
            apply(&mut field, op);
            prop_assert_eq!(field.email_list(), field.email_collection().join(","));
            let values: Vec<&str> = field.entries().iter().map(|entry| entry.value()).collect();
            prop_assert_eq!(field.email_collection(), values.as_slice());
        }
    }

    #[test]
    fn report_validity_is_idempotent(
        config in arb_config(),
        required in any::<bool>(),
        emails in prop::collection::vec(arb_address(), 0..10),
    ) {
        let mut field = EmailField::new(Config { required, ..config });
        field.set_emails(emails);

        let first = field.report_validity();
        let first_error = field.error().clone();
        prop_assert_eq!(field.report_validity(), first);
        prop_assert_eq!(field.error(), &first_error);
        prop_assert_eq!(field.check_validity(), first);
    }
}

// ── Syntax and pattern properties ─────────────────────────────────────

proptest! {
    #[test]
    fn patterns_without_wildcards_match_by_equality(
        domain in "[a-z.()+?^$]{1,12}",
        pattern in "[a-z.()+?^$]{1,12}",
    ) {
        prop_assert_eq!(domain_matches_pattern(&domain, &pattern), domain == pattern);
        prop_assert!(domain_matches_pattern(&domain, &domain));
    }

    #[test]
    fn wildcard_patterns_match_any_infix(
        prefix in "[a-z.]{0,6}",
        infix in "[a-z.+()]{0,6}",
        suffix in "[a-z.]{0,6}",
    ) {
        let pattern = format!("{prefix}*{suffix}");
        let domain = format!("{prefix}{infix}{suffix}");
        prop_assert!(domain_matches_pattern(&domain, &pattern));
    }

    #[test]
    fn wildcard_patterns_are_anchored(
        body in "[a-z]{1,6}",
        extra in "[a-z]{1,3}",
    ) {
        let pattern = format!("*.{body}");
        let extended = format!("x.{body}{extra}");
        prop_assert!(!domain_matches_pattern(&extended, &pattern));
        prop_assert!(!domain_matches_pattern(&body, &pattern));
    }

    #[test]
    fn text_without_at_is_never_an_address(text in "[^@]{0,30}") {
        prop_assert!(!is_valid_format(&text));
    }

    #[test]
    fn plain_addresses_are_valid(
        local in "[a-z0-9][a-z0-9_%+-]{0,4}(\\.[a-z0-9_%+-]{1,4}){0,2}",
        host in "[a-z0-9]{1,8}",
        tld in "[a-z]{2,4}",
    ) {
        let address = format!("{local}@{host}.{tld}");
        prop_assert!(is_valid_format(&address), "{}", address);
    }
}
