//! Accepted addresses and their opaque ids.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Opaque identity of an accepted address.
///
/// Ids exist only so a view can diff and remove individual entries; they
/// carry no meaning and are never derived from the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "email-{}", self.0.simple())
    }
}

/// An accepted address, exactly as the user entered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailEntry {
    id: EntryId,
    value: String,
}

impl EmailEntry {
    /// Wraps `value` with a freshly generated id.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: EntryId::generate(),
            value: value.into(),
        }
    }

    /// The entry's id.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// The address, with its original case.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this entry holds `candidate`, ignoring case.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.value.to_lowercase() == candidate.to_lowercase()
    }
}
