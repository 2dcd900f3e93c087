//! The stateful email field.
//!
//! [`EmailField`] owns the accepted addresses, the text currently in the
//! input, and the error shown to the user. It applies the decisions made by
//! [`crate::ingest`] and tells the host about every change through an outbox
//! of [`Notification`]s.
//!
//! Nothing here blocks or spawns. Handlers run to completion, and the few
//! deferred steps (re-checking initial values, restoring a snapshot after a
//! failed [`EmailField::validate`], attaching the help popover's dismiss
//! listeners) run when the host calls [`EmailField::advance`].

use std::time::Duration;

use serde::Serialize;
use tracing::instrument;

use crate::{
    domain::{
        Config, EmailEntry, EntryId, ErrorKind, classify,
        message::{self, INVALID_DOMAIN_PRESENT, REQUIRED_EMPTY, format_error_messages},
    },
    ingest::{BatchReport, admit, ingest_batch, reconcile_initial},
};

mod init;
pub use init::InitState;
use init::{InitController, Supply};

mod notify;
pub use notify::{AttributeValue, Notification, OutputAttribute};

mod popover;
pub use popover::{HelpPopover, Placement};

mod timers;
pub use timers::{DISMISS_ATTACH_DELAY, INITIAL_RECHECK_DELAY};
use timers::{Task, Timers};

/// The keys the field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Commits the typed address.
    Enter,
    /// Commits the typed address.
    Space,
    /// Commits the typed address and moves focus as usual.
    Tab,
    /// Dismisses the help popover.
    Escape,
    /// Any other key.
    Other,
}

/// The error currently shown under the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorState {
    has_error: bool,
    message: String,
}

impl ErrorState {
    /// Whether an error is showing.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.has_error
    }

    /// The error text; empty when there is no error.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the message should be rendered as markup.
    #[must_use]
    pub fn is_rich(&self) -> bool {
        message::is_rich(&self.message)
    }

    fn set(&mut self, message: impl Into<String>) {
        self.has_error = true;
        self.message = message.into();
    }

    fn clear(&mut self) {
        self.has_error = false;
        self.message.clear();
    }

    /// Shows `message`, or clears the error if it is empty.
    fn show(&mut self, message: String) {
        if message.is_empty() {
            self.clear();
        } else {
            self.set(message);
        }
    }
}

/// The result of [`EmailField::validate`], shaped for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Whether the field may be submitted.
    pub is_valid: bool,
    /// The error shown to the user, when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Lifecycle {
    #[default]
    Created,
    Connected,
    Disconnected,
}

/// A multi-address email input.
#[derive(Debug, Default)]
pub struct EmailField {
    config: Config,
    entries: Vec<EmailEntry>,
    input: String,
    error: ErrorState,
    value: Vec<String>,
    email_collection: Vec<String>,
    init: InitController,
    timers: Timers,
    outbox: Vec<Notification>,
    help: HelpPopover,
    lifecycle: Lifecycle,
}

impl EmailField {
    /// Creates an empty field with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The current configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration. The host may change any setting
    /// at any time; every later decision reads the new values.
    pub const fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The accepted addresses, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[EmailEntry] {
        &self.entries
    }

    /// The `emailCollection` output binding.
    #[must_use]
    pub fn email_collection(&self) -> &[String] {
        &self.email_collection
    }

    /// The `emailList` output binding: the collection joined by commas.
    #[must_use]
    pub fn email_list(&self) -> String {
        self.email_collection.join(",")
    }

    /// The host-facing `value` binding.
    #[must_use]
    pub fn value(&self) -> &[String] {
        &self.value
    }

    /// The text currently in the input.
    #[must_use]
    pub fn input_value(&self) -> &str {
        &self.input
    }

    /// The error currently shown.
    #[must_use]
    pub const fn error(&self) -> &ErrorState {
        &self.error
    }

    /// Where the initial-value controller is.
    #[must_use]
    pub const fn init_state(&self) -> &InitState {
        self.init.state()
    }

    /// The help popover.
    #[must_use]
    pub const fn help(&self) -> &HelpPopover {
        &self.help
    }

    /// Whether any deferred work is waiting for [`EmailField::advance`].
    #[must_use]
    pub fn has_pending_tasks(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Takes the notifications emitted since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    // --- lifecycle ---

    /// The host sets the `value` binding.
    ///
    /// The first non-empty value supplied while the collection is empty
    /// becomes the initial collection. If `maxEmails` is not known yet the
    /// values wait for [`INITIAL_RECHECK_DELAY`] or for
    /// [`EmailField::connected`], whichever comes first.
    #[instrument(level = "debug", skip(self))]
    pub fn set_value(&mut self, values: Vec<String>) {
        let supply = self.init.supply(
            &values,
            self.entries.is_empty(),
            self.config.max_emails_known(),
        );
        self.value = values;
        match supply {
            Supply::Apply(values) => self.apply_initial(&values),
            Supply::Deferred => {
                if !self.timers.contains(&Task::RecheckInitial) {
                    self.timers
                        .schedule(INITIAL_RECHECK_DELAY, Task::RecheckInitial);
                }
            }
            Supply::Ignored => {}
        }
    }

    /// The field has been attached to the page.
    pub fn connected(&mut self) {
        self.lifecycle = Lifecycle::Connected;
        if let Some(values) = self.init.take_pending() {
            tracing::debug!("applying deferred initial values on attach");
            self.apply_initial(&values);
        }
    }

    /// The field has been removed from the page.
    pub fn disconnected(&mut self) {
        self.lifecycle = Lifecycle::Disconnected;
        self.help.detach_listeners();
    }

    /// Moves the clock forward and runs every deferred task that is due.
    ///
    /// `advance(Duration::ZERO)` runs work deferred to "after the current
    /// turn".
    pub fn advance(&mut self, elapsed: Duration) {
        self.timers.advance(elapsed);
        while let Some(task) = self.timers.pop_due() {
            self.run(task);
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::RecheckInitial => {
                tracing::debug!(
                    max_known = self.config.max_emails_known(),
                    "re-checking deferred initial values"
                );
                if let Some(values) = self.init.take_pending() {
                    self.apply_initial(&values);
                }
            }
            Task::RestoreSnapshot(snapshot) => {
                if self.lifecycle == Lifecycle::Disconnected {
                    tracing::debug!("field detached, skipping snapshot restore");
                    return;
                }
                tracing::debug!("restoring {} entries after failed validation", snapshot.len());
                self.entries = snapshot;
                self.refresh_mirrors();
            }
            Task::AttachDismissListeners => {
                if self.lifecycle != Lifecycle::Disconnected {
                    self.help.attach_listeners();
                }
            }
        }
    }

    // --- event handlers ---

    /// A key was pressed in the input, which now holds `text`.
    ///
    /// Returns `true` if the key's default action should be suppressed.
    pub fn key_down(&mut self, key: Key, text: &str) -> bool {
        if self.config.disabled {
            return true;
        }
        if self.error.has_error() {
            self.error.clear();
        }
        text.clone_into(&mut self.input);

        match key {
            Key::Enter | Key::Space | Key::Tab if !text.trim().is_empty() => {
                self.commit(text);
                key != Key::Tab
            }
            _ => false,
        }
    }

    /// The input's text changed to `text`.
    pub fn input(&mut self, text: &str) {
        if self.config.disabled {
            return;
        }
        text.clone_into(&mut self.input);
        if self.error.has_error() {
            self.error.clear();
        }
    }

    /// The input lost focus while holding `text`.
    pub fn blur(&mut self, text: &str) {
        if self.config.disabled || text.trim().is_empty() {
            return;
        }
        self.commit(text);
    }

    /// The add button was pressed while the input held `text`.
    pub fn add_email(&mut self, text: &str) {
        if self.config.disabled {
            return;
        }
        self.commit(text);
    }

    /// `text` was pasted into the input.
    ///
    /// Text with address-like tokens goes through the batch pipeline; any
    /// other text simply becomes the input's content.
    #[instrument(level = "debug", skip(self))]
    pub fn paste(&mut self, text: &str) {
        if self.config.disabled || text.trim().is_empty() {
            return;
        }
        let Some(report) = ingest_batch(text, &self.entries, &self.config) else {
            text.clone_into(&mut self.input);
            return;
        };
        self.apply_batch(report);
    }

    /// The pill with `id` was dismissed.
    pub fn remove_email(&mut self, id: EntryId) {
        if self.config.disabled {
            return;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        if self.entries.len() == before {
            tracing::debug!(%id, "no entry to remove");
            return;
        }
        self.notify();
    }

    // --- help popover ---

    /// Opens or closes the help popover. The space around the help button
    /// decides which side it opens on.
    pub fn toggle_help(&mut self, space_above: u32, space_below: u32) {
        if self.help.toggle(space_above, space_below) {
            self.timers
                .schedule(DISMISS_ATTACH_DELAY, Task::AttachDismissListeners);
        }
    }

    /// The popover's close button was pressed.
    pub fn close_help(&mut self) {
        self.help.close();
    }

    /// A click landed outside the popover.
    pub fn outside_click(&mut self) {
        if self.help.is_listening() {
            self.help.close();
        }
    }

    /// A key was pressed anywhere on the page.
    pub fn document_key_down(&mut self, key: Key) {
        if key == Key::Escape && self.help.is_listening() {
            self.help.close();
        }
    }

    // --- programmatic API ---

    /// Replaces the collection without validation.
    pub fn set_emails<I, S>(&mut self, emails: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries = emails.into_iter().map(EmailEntry::new).collect();
        self.notify();
    }

    /// Empties the collection, the input and the error. Ignored while
    /// disabled.
    pub fn clear_emails(&mut self) {
        if self.config.disabled {
            return;
        }
        self.entries.clear();
        self.input.clear();
        self.error.clear();
        self.notify();
    }

    // --- validation ---

    /// The problems with the current collection, in a fixed order: required
    /// but empty, over capacity, then the first entry breaking a domain rule.
    #[must_use]
    pub fn collect_validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.config.required && self.entries.is_empty() {
            errors.push(REQUIRED_EMPTY.to_string());
        }

        let max = self.config.effective_max_emails();
        if self.entries.len() > max {
            errors.push(
                self.config
                    .message_override(ErrorKind::OverCapacity)
                    .map_or_else(|| message::capacity_limit(max), ToString::to_string),
            );
        }

        let domain_violation = self
            .config
            .has_domain_rules()
            .then(|| {
                self.entries
                    .iter()
                    .map(|entry| classify(entry.value(), &self.config))
                    .find(|classification| !classification.is_valid())
            })
            .flatten();
        if let Some(classification) = domain_violation {
            errors.push(
                classification
                    .message
                    .unwrap_or_else(|| INVALID_DOMAIN_PRESENT.to_string()),
            );
        }

        errors
    }

    /// Whether the collection is currently valid. No side effects.
    #[must_use]
    pub fn check_validity(&self) -> bool {
        self.collect_validation_errors().is_empty()
    }

    /// Like [`EmailField::check_validity`], but also shows the problems (or
    /// clears the error when there are none).
    pub fn report_validity(&mut self) -> bool {
        let errors = self.collect_validation_errors();
        if errors.is_empty() {
            self.error.clear();
            true
        } else {
            self.error.set(format_error_messages(&errors));
            false
        }
    }

    /// Validates before the host navigates away.
    ///
    /// When invalid, the collection as it was on entry is put back after the
    /// current turn, without notifying the host.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&mut self) -> ValidationOutcome {
        let snapshot = self.entries.clone();
        if self.report_validity() {
            return ValidationOutcome {
                is_valid: true,
                error_message: None,
            };
        }
        self.timers
            .schedule(Duration::ZERO, Task::RestoreSnapshot(snapshot));
        ValidationOutcome {
            is_valid: false,
            error_message: Some(self.error.message().to_string()),
        }
    }

    // --- internals ---

    /// Runs one typed candidate through the fail-fast path.
    fn commit(&mut self, text: &str) {
        match admit(text, &self.entries, &self.config) {
            Ok(None) => {}
            Ok(Some(email)) => {
                tracing::info!("accepted {email}");
                self.entries.push(EmailEntry::new(email));
                self.input.clear();
                self.error.clear();
                self.notify();
            }
            Err(rejection) => {
                tracing::debug!(kind = %rejection.kind, "rejected typed address");
                self.error.set(rejection.message);
            }
        }
    }

    fn apply_batch(&mut self, report: BatchReport) {
        let message = report.error_message();
        if report.accepted.is_empty() {
            self.error.show(message);
            return;
        }
        self.entries
            .extend(report.accepted.into_iter().map(EmailEntry::new));
        self.input.clear();
        self.error.show(message);
        self.notify();
    }

    fn apply_initial(&mut self, values: &[String]) {
        let report = reconcile_initial(values, &self.config);
        let message = report.error_message();
        self.set_emails(report.accepted);
        self.error.show(message);
    }

    fn refresh_mirrors(&mut self) {
        let emails: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.value().to_string())
            .collect();
        self.value.clone_from(&emails);
        self.email_collection = emails;
    }

    fn notify(&mut self) {
        self.refresh_mirrors();
        self.outbox
            .extend(notify::change_set(&self.email_collection));
    }
}
