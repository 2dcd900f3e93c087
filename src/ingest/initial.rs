//! Reconciling host-supplied initial values with the configuration.
//!
//! Initial values are assumed to be well-formed already, so unlike a paste
//! there is no format filter: only domain rules, the maximum and duplicates
//! are applied.

use tracing::instrument;

use crate::{
    domain::{Config, ErrorKind, Removal, Verdict, classify, message},
    ingest::{BatchReport, batch::dedup_ignoring_case},
};

/// Filters the host's initial addresses.
///
/// Steps, each skipped once nothing remains: drop addresses outside the
/// allow-list, drop blocked addresses, truncate to the effective maximum,
/// then drop case-insensitive duplicates.
#[must_use]
#[instrument(level = "debug", skip(config))]
pub fn reconcile_initial(values: &[String], config: &Config) -> BatchReport {
    let mut survivors = values.to_vec();
    let mut report = BatchReport::default();

    for (verdict, kind, describe) in [
        (
            Verdict::NotAllowed,
            ErrorKind::DomainNotAllowed,
            message::not_allowed_removed as fn(usize) -> String,
        ),
        (
            Verdict::Blocked,
            ErrorKind::DomainBlocked,
            message::blocked_removed as fn(usize) -> String,
        ),
    ] {
        let before = survivors.len();
        survivors.retain(|value| classify(value, config).verdict != verdict);
        let count = before - survivors.len();
        if count > 0 {
            tracing::debug!("{kind} filter removed {count} initial values");
            report.removals.push(Removal {
                kind,
                count,
                message: describe(count),
            });
        }
        if survivors.is_empty() {
            return report;
        }
    }

    let max = config.effective_max_emails();
    if survivors.len() > max {
        let truncated = survivors.len() - max;
        survivors.truncate(max);
        tracing::debug!("truncated {truncated} initial values beyond the maximum of {max}");
        let message = config
            .message_override(ErrorKind::OverCapacity)
            .map_or_else(|| message::excess_removed(max, truncated), ToString::to_string);
        report.removals.push(Removal {
            kind: ErrorKind::OverCapacity,
            count: truncated,
            message,
        });
    }

    let duplicates = dedup_ignoring_case(&mut survivors);
    if duplicates > 0 {
        let message = config
            .message_override(ErrorKind::Duplicate)
            .map_or_else(|| message::duplicates_removed(duplicates), ToString::to_string);
        report.removals.push(Removal {
            kind: ErrorKind::Duplicate,
            count: duplicates,
            message,
        });
    }

    tracing::info!("accepting {} initial addresses", survivors.len());
    report.accepted = survivors;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MaxEmails;

    fn values(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn keeps_everything_without_rules() {
        let report = reconcile_initial(&values(&["a@x.com", "b@y.com"]), &Config::default());
        assert_eq!(report.accepted, ["a@x.com", "b@y.com"]);
        assert!(report.removals.is_empty());
    }

    #[test]
    fn does_not_check_format() {
        let report = reconcile_initial(&values(&["not an email"]), &Config::default());
        assert_eq!(report.accepted, ["not an email"]);
    }

    #[test]
    fn stops_when_the_allow_list_removes_everything() {
        let config = Config {
            allowed_domains: "ok.com".to_string(),
            max_emails: Some(MaxEmails::Number(0)),
            ..Config::default()
        };
        let report = reconcile_initial(&values(&["a@no.com", "b@no.com"]), &config);
        assert!(report.accepted.is_empty());
        assert_eq!(
            report.error_message(),
            "2 emails with domains not in the allowed list were removed."
        );
    }

    #[test]
    fn applies_domains_then_maximum_then_duplicates() {
        let config = Config {
            blocked_domains: "bad.com".to_string(),
            max_emails: Some(MaxEmails::Text("3".to_string())),
            ..Config::default()
        };
        let report = reconcile_initial(
            &values(&["a@x.com", "z@bad.com", "A@X.com", "b@x.com", "c@x.com"]),
            &config,
        );
        assert_eq!(report.accepted, ["a@x.com", "b@x.com"]);
        let messages: Vec<_> = report.messages().collect();
        assert_eq!(
            messages,
            [
                "1 email with blocked domain was removed.",
                "You can only add up to 3 email addresses. 1 excess email was removed.",
                "1 duplicate email was removed.",
            ]
        );
    }
}
