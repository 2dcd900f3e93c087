//! Deferred application of host-supplied initial values.
//!
//! The host may hand over initial addresses before it has delivered
//! `maxEmails`. Applying them at once would truncate against the wrong limit,
//! so they are stashed until either the re-check timer fires or the field is
//! attached, whichever comes first. Initial values are applied at most once.

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitState {
    /// No initial values have been applied yet.
    Pending {
        /// Values waiting for the configuration to settle.
        stash: Option<Vec<String>>,
    },
    /// Initial values have been applied; further supplies are ignored.
    Applied,
}

impl Default for InitState {
    fn default() -> Self {
        Self::Pending { stash: None }
    }
}

/// What the field should do with a supply of initial values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Supply {
    /// Apply these values now.
    Apply(Vec<String>),
    /// The values were stashed; arm the re-check unless already armed.
    Deferred,
    /// Nothing to do.
    Ignored,
}

#[derive(Debug, Default)]
pub struct InitController {
    state: InitState,
}

impl InitController {
    pub const fn state(&self) -> &InitState {
        &self.state
    }

    /// Handles a supply of initial values.
    ///
    /// Only a non-empty supply into an empty collection while pending counts.
    /// If `maxEmails` is already known the values are applied immediately;
    /// otherwise they replace any previous stash.
    pub fn supply(
        &mut self,
        values: &[String],
        collection_empty: bool,
        max_known: bool,
    ) -> Supply {
        let InitState::Pending { stash } = &mut self.state else {
            return Supply::Ignored;
        };
        if values.is_empty() || !collection_empty {
            return Supply::Ignored;
        }

        if max_known {
            tracing::debug!("maxEmails known, applying {} initial values", values.len());
            self.state = InitState::Applied;
            Supply::Apply(values.to_vec())
        } else {
            tracing::debug!("maxEmails not known yet, stashing {} initial values", values.len());
            *stash = Some(values.to_vec());
            Supply::Deferred
        }
    }

    /// Takes the stash if it is still pending, moving to [`InitState::Applied`].
    ///
    /// Used by both the timer and the attach hook; whichever runs second
    /// finds nothing to do.
    pub fn take_pending(&mut self) -> Option<Vec<String>> {
        let InitState::Pending { stash } = &mut self.state else {
            return None;
        };
        let values = stash.take()?;
        self.state = InitState::Applied;
        Some(values)
    }
}
