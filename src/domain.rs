//! Domain models for the email input.
//!
//! This module contains the stateless building blocks: address syntax,
//! domain rules, configuration, accepted entries and rejection messages.

/// Email address syntax checks.
pub mod syntax;
pub use syntax::is_valid_format;

/// Allow-list and block-list domain rules.
pub mod rules;
pub use rules::{Classification, Verdict, classify, domain_matches_pattern};

mod config;
pub use config::{ABSOLUTE_MAX_EMAILS, Config, ConfigError, MaxEmails};

mod entry;
pub use entry::{EmailEntry, EntryId};

/// Rejection kinds and user-facing texts.
pub mod message;
pub use message::{ErrorKind, Rejection, Removal};
