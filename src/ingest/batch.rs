//! The paste pipeline: many candidates, partial success.
//!
//! Candidates pass through a fixed sequence of filters. Each filter that
//! drops something records one [`Removal`], and a filter that leaves nothing
//! behind stops the pipeline early.

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use crate::{
    domain::{
        Config, EmailEntry, ErrorKind, Removal, Verdict, classify, is_valid_format,
        message::{self, format_error_messages},
    },
    ingest::extract_candidates,
};

/// What a batch decided: the addresses to append and why others were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Addresses to append, in the order they appeared.
    pub accepted: Vec<String>,
    /// One summary per filter that dropped something, in pipeline order.
    pub removals: Vec<Removal>,
}

impl BatchReport {
    /// The removal summaries, in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.removals.iter().map(|removal| removal.message.as_str())
    }

    /// The combined error text; empty when nothing was dropped.
    #[must_use]
    pub fn error_message(&self) -> String {
        let messages: Vec<&str> = self.messages().collect();
        format_error_messages(&messages)
    }

    /// How many candidates were dropped in total.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removals.iter().map(|removal| removal.count).sum()
    }
}

/// Runs pasted `text` through the batch pipeline.
///
/// Returns `None` when the text contains no `@`-bearing tokens at all; such a
/// paste is ordinary typing, not an ingestion event. Otherwise the report
/// lists what to append to `existing` and what was dropped.
#[must_use]
#[instrument(level = "debug", skip(existing, config))]
pub fn ingest_batch(text: &str, existing: &[EmailEntry], config: &Config) -> Option<BatchReport> {
    let candidates = extract_candidates(text);
    if candidates.is_empty() {
        tracing::debug!("no address-like tokens in pasted text");
        return None;
    }
    tracing::debug!("extracted {} candidates", candidates.len());

    Some(filter_candidates(candidates, existing, config))
}

fn filter_candidates(
    mut survivors: Vec<String>,
    existing: &[EmailEntry],
    config: &Config,
) -> BatchReport {
    let mut report = BatchReport::default();

    let filters: [(ErrorKind, fn(usize) -> String, &dyn Fn(&str) -> bool); 4] = [
        (
            ErrorKind::InvalidFormat,
            message::invalid_format_removed,
            &|candidate| !is_valid_format(candidate),
        ),
        (
            ErrorKind::DomainNotAllowed,
            message::not_allowed_removed,
            &|candidate| classify(candidate, config).verdict == Verdict::NotAllowed,
        ),
        (
            ErrorKind::DomainBlocked,
            message::blocked_removed,
            &|candidate| classify(candidate, config).verdict == Verdict::Blocked,
        ),
        (
            ErrorKind::Duplicate,
            message::duplicates_skipped,
            &|candidate| existing.iter().any(|entry| entry.matches(candidate)),
        ),
    ];
    for (kind, describe, reject) in filters {
        drop_where(&mut survivors, &mut report, kind, describe, reject);
        if survivors.is_empty() {
            return report;
        }
    }

    let max = config.effective_max_emails();
    let remaining_slots = max.saturating_sub(existing.len());
    if remaining_slots == 0 {
        tracing::debug!("collection already holds {max} addresses, rejecting batch");
        let message = config
            .message_override(ErrorKind::OverCapacity)
            .map_or_else(|| message::capacity_reached(max), ToString::to_string);
        return BatchReport {
            accepted: Vec::new(),
            removals: vec![Removal {
                kind: ErrorKind::OverCapacity,
                count: survivors.len(),
                message,
            }],
        };
    }

    if survivors.len() > remaining_slots {
        let truncated = survivors.len() - remaining_slots;
        survivors.truncate(remaining_slots);
        tracing::debug!("truncated {truncated} candidates beyond the maximum of {max}");
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
        tracing::debug!("removed {duplicates} duplicates within the batch");
        let message = config
            .message_override(ErrorKind::Duplicate)
            .map_or_else(
                || message::pasted_duplicates_removed(duplicates),
                ToString::to_string,
            );
        report.removals.push(Removal {
            kind: ErrorKind::Duplicate,
            count: duplicates,
            message,
        });
    }

    tracing::info!(
        "accepting {} pasted addresses ({} removed)",
        survivors.len(),
        report.removed()
    );
    report.accepted = survivors;
    report
}

/// Removes every candidate `reject` returns `true` for, recording a removal
/// summary when anything was dropped.
fn drop_where(
    survivors: &mut Vec<String>,
    report: &mut BatchReport,
    kind: ErrorKind,
    describe: fn(usize) -> String,
    reject: &dyn Fn(&str) -> bool,
) {
    let before = survivors.len();
    survivors.retain(|candidate| !reject(candidate.as_str()));
    let count = before - survivors.len();
    if count > 0 {
        tracing::debug!("{kind} filter removed {count} candidates");
        report.removals.push(Removal {
            kind,
            count,
            message: describe(count),
        });
    }
}

/// Keeps the first occurrence of each address (ignoring case) and returns
/// how many later occurrences were dropped.
pub(crate) fn dedup_ignoring_case(addresses: &mut Vec<String>) -> usize {
    let before = addresses.len();
    let mut seen = HashSet::new();
    addresses.retain(|address| seen.insert(address.to_lowercase()));
    before - addresses.len()
}
