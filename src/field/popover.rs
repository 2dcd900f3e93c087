//! The help popover and its dismiss listeners.
//!
//! While open, the popover listens for a click outside it and for Escape.
//! Those listeners are a resource: they are attached a short delay after
//! opening (so the opening click does not immediately dismiss it) and must be
//! detached on every way out, including teardown of the field.

use serde::Serialize;

/// Number of listeners attached while the popover is listening: one for
/// outside clicks, one for Escape.
const DISMISS_LISTENERS: usize = 2;

/// Which side of the help button the popover opens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Above the button.
    Top,
    /// Below the button.
    #[default]
    Bottom,
}

impl Placement {
    /// Opens on the side with more room; ties go above.
    #[must_use]
    pub const fn choose(space_above: u32, space_below: u32) -> Self {
        if space_above < space_below {
            Self::Bottom
        } else {
            Self::Top
        }
    }
}

/// State of the help popover.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct HelpPopover {
    open: bool,
    placement: Placement,
    active_listeners: usize,
}

impl HelpPopover {
    /// Whether the popover is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Where the popover was last placed.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// How many dismiss listeners are currently attached.
    #[must_use]
    pub const fn active_listeners(&self) -> usize {
        self.active_listeners
    }

    /// Whether outside clicks and Escape currently reach the popover.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.active_listeners > 0
    }

    /// Opens or closes the popover. Returns `true` when it was opened, in
    /// which case the caller must schedule [`HelpPopover::attach_listeners`].
    pub(crate) fn toggle(&mut self, space_above: u32, space_below: u32) -> bool {
        if self.open {
            self.close();
            return false;
        }
        self.open = true;
        self.placement = Placement::choose(space_above, space_below);
        tracing::debug!(placement = ?self.placement, "help popover opened");
        true
    }

    /// Attaches the dismiss listeners if the popover is still open and not
    /// already listening.
    pub(crate) fn attach_listeners(&mut self) {
        if self.open && !self.is_listening() {
            self.active_listeners = DISMISS_LISTENERS;
            tracing::trace!("dismiss listeners attached");
        }
    }

    /// Closes the popover and detaches its listeners.
    pub(crate) fn close(&mut self) {
        if self.open {
            tracing::debug!("help popover closed");
        }
        self.open = false;
        self.detach_listeners();
    }

    pub(crate) fn detach_listeners(&mut self) {
        if self.is_listening() {
            tracing::trace!("dismiss listeners detached");
        }
        self.active_listeners = 0;
    }
}
