//! A multi-address email input field.
//!
//! Users type or paste several addresses into one field. Each address is
//! checked for format, allowed and blocked domains, a maximum count and
//! duplicates, and the accepted list is exposed both as an array and as a
//! comma-joined string.

pub mod domain;
pub use domain::{Config, EmailEntry, ErrorKind, Rejection};

pub mod ingest;
pub use ingest::{BatchReport, admit, ingest_batch};

pub mod field;
pub use field::{EmailField, ErrorState, Key, Notification, ValidationOutcome};

pub mod editor;
pub use editor::{ConfigurationChange, Property, PropertyEditor};
