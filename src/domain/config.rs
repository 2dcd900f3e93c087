//! Field settings and their versioned TOML file format.

use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::domain::message::ErrorKind;

/// Hard ceiling on the number of addresses, whatever the configuration says.
pub const ABSOLUTE_MAX_EMAILS: usize = 150;

/// The raw `maxEmails` setting as the host supplies it.
///
/// Hosts frequently pass numbers as strings, and an unresolved variable
/// reference arrives as its literal text. Anything that does not start with
/// an integer is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxEmails {
    /// A numeric value.
    Number(i64),
    /// A numeric string, or text that is not (yet) a number.
    Text(String),
}

impl MaxEmails {
    /// Parses the setting to an integer.
    ///
    /// Text uses leading-integer semantics: surrounding whitespace is
    /// skipped, an optional sign and the leading digits are read, and
    /// anything after them is ignored. Returns `None` when there are no
    /// leading digits.
    #[must_use]
    pub fn parse(&self) -> Option<i64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(text) => parse_leading_int(text),
        }
    }
}

impl From<i64> for MaxEmails {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MaxEmails {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }
    // Too many digits to fit is still "a number", just out of range.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Settings for one email input field.
///
/// The host owns the configuration and may change it at any time, so the
/// field reads it afresh for every decision rather than caching derived
/// values such as [`Config::effective_max_emails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Field label.
    pub label: String,

    /// Placeholder shown in the empty input.
    pub placeholder: String,

    /// Whether at least one address is required.
    pub required: bool,

    /// Optional help text shown in the help popover.
    pub help_text: Option<String>,

    /// Maximum number of addresses; `None` until the host provides it.
    pub max_emails: Option<MaxEmails>,

    /// Whether the field ignores user input.
    pub disabled: bool,

    /// Comma-separated allow-list patterns; empty means unrestricted.
    pub allowed_domains: String,

    /// Comma-separated block-list patterns; empty means none blocked.
    pub blocked_domains: String,

    /// Replaces the default text for a domain missing from the allow-list.
    pub allowed_domains_error_message: String,

    /// Replaces the default text for a blocked domain.
    pub blocked_domains_error_message: String,

    /// Replaces the default text for an invalid address.
    pub invalid_email_error_message: String,

    /// Replaces the default text when the maximum is reached.
    pub max_emails_error_message: String,

    /// Replaces the default text for a duplicate address.
    pub duplicate_email_error_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label: default_label(),
            placeholder: default_placeholder(),
            required: false,
            help_text: None,
            max_emails: None,
            disabled: false,
            allowed_domains: String::new(),
            blocked_domains: String::new(),
            allowed_domains_error_message: String::new(),
            blocked_domains_error_message: String::new(),
            invalid_email_error_message: String::new(),
            max_emails_error_message: String::new(),
            duplicate_email_error_message: String::new(),
        }
    }
}

/// Errors raised while reading or writing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[source] io::Error),
    /// The file is not valid configuration TOML.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// The file could not be written.
    #[error("failed to write config file: {0}")]
    Write(#[source] io::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Whether the host has supplied `maxEmails` at all.
    ///
    /// A supplied value that does not parse still counts as known; it simply
    /// resolves to [`ABSOLUTE_MAX_EMAILS`].
    #[must_use]
    pub const fn max_emails_known(&self) -> bool {
        self.max_emails.is_some()
    }

    /// The maximum number of addresses currently in force.
    ///
    /// Falls back to [`ABSOLUTE_MAX_EMAILS`] when `maxEmails` is unset,
    /// unparsable, negative or above the ceiling.
    #[must_use]
    pub fn effective_max_emails(&self) -> usize {
        self.max_emails
            .as_ref()
            .and_then(MaxEmails::parse)
            .and_then(|max| usize::try_from(max).ok())
            .filter(|max| *max <= ABSOLUTE_MAX_EMAILS)
            .unwrap_or(ABSOLUTE_MAX_EMAILS)
    }

    /// The configured replacement text for `kind`, if it is not blank.
    #[must_use]
    pub fn message_override(&self, kind: ErrorKind) -> Option<&str> {
        let text = match kind {
            ErrorKind::InvalidFormat => &self.invalid_email_error_message,
            ErrorKind::DomainNotAllowed => &self.allowed_domains_error_message,
            ErrorKind::DomainBlocked => &self.blocked_domains_error_message,
            ErrorKind::Duplicate => &self.duplicate_email_error_message,
            ErrorKind::OverCapacity => &self.max_emails_error_message,
            ErrorKind::RequiredEmpty => return None,
        };
        (!text.trim().is_empty()).then_some(text.as_str())
    }

    /// Whether an allow-list or a block-list is configured.
    #[must_use]
    pub fn has_domain_rules(&self) -> bool {
        !self.allowed_domains.trim().is_empty() || !self.blocked_domains.trim().is_empty()
    }
}

fn default_label() -> String {
    "Email".to_string()
}

fn default_placeholder() -> String {
    "Enter an email address".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_label")]
        label: String,

        #[serde(default = "default_placeholder")]
        placeholder: String,

        #[serde(default)]
        required: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        help_text: Option<String>,

        /// Either an integer or a string such as `"25"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_emails: Option<MaxEmails>,

        #[serde(default)]
        disabled: bool,

        #[serde(default)]
        allowed_domains: String,

        #[serde(default)]
        blocked_domains: String,

        #[serde(default, skip_serializing_if = "Messages::is_empty")]
        messages: Messages,
    },
}

/// Custom error texts, grouped under `[messages]` in the file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Messages {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    allowed_domains: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    blocked_domains: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    invalid_email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    max_emails: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    duplicate_email: String,
}

impl Messages {
    fn is_empty(&self) -> bool {
        self.allowed_domains.is_empty()
            && self.blocked_domains.is_empty()
            && self.invalid_email.is_empty()
            && self.max_emails.is_empty()
            && self.duplicate_email.is_empty()
    }
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                label,
                placeholder,
                required,
                help_text,
                max_emails,
                disabled,
                allowed_domains,
                blocked_domains,
                messages,
            } => Self {
                label,
                placeholder,
                required,
                help_text,
                max_emails,
                disabled,
                allowed_domains,
                blocked_domains,
                allowed_domains_error_message: messages.allowed_domains,
                blocked_domains_error_message: messages.blocked_domains,
                invalid_email_error_message: messages.invalid_email,
                max_emails_error_message: messages.max_emails,
                duplicate_email_error_message: messages.duplicate_email,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            label: config.label,
            placeholder: config.placeholder,
            required: config.required,
            help_text: config.help_text,
            max_emails: config.max_emails,
            disabled: config.disabled,
            allowed_domains: config.allowed_domains,
            blocked_domains: config.blocked_domains,
            messages: Messages {
                allowed_domains: config.allowed_domains_error_message,
                blocked_domains: config.blocked_domains_error_message,
                invalid_email: config.invalid_email_error_message,
                max_emails: config.max_emails_error_message,
                duplicate_email: config.duplicate_email_error_message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn with_max(max: impl Into<MaxEmails>) -> Config {
        Config {
            max_emails: Some(max.into()),
            ..Config::default()
        }
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nlabel = \"Recipients\"\nrequired = true\nmax_emails = \"5\"\nblocked_domains = \"spam.com\"\n\n[messages]\nduplicate_email = \"Already there\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.label, "Recipients");
        assert_eq!(config.placeholder, "Enter an email address");
        assert!(config.required);
        assert_eq!(config.max_emails, Some(MaxEmails::Text("5".to_string())));
        assert_eq!(config.effective_max_emails(), 5);
        assert_eq!(config.blocked_domains, "spam.com");
        assert_eq!(
            config.message_override(ErrorKind::Duplicate),
            Some("Already there")
        );
    }

    #[test]
    fn load_accepts_integer_max() {
        let config: Config = toml::from_str("_version = \"1\"\nmax_emails = 12\n").unwrap();
        assert_eq!(config.max_emails, Some(MaxEmails::Number(12)));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read(_)));
        assert!(error.to_string().starts_with("failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nrequired = \"yes\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("mailfield.toml");
        let config = Config {
            max_emails: Some(MaxEmails::Number(3)),
            allowed_domains: "*.example.com".to_string(),
            invalid_email_error_message: "Nope".to_string(),
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising an empty file returns the default configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn effective_max_falls_back_to_ceiling() {
        assert_eq!(Config::default().effective_max_emails(), ABSOLUTE_MAX_EMAILS);
        assert_eq!(with_max(-1).effective_max_emails(), ABSOLUTE_MAX_EMAILS);
        assert_eq!(with_max(151).effective_max_emails(), ABSOLUTE_MAX_EMAILS);
        assert_eq!(with_max("lots").effective_max_emails(), ABSOLUTE_MAX_EMAILS);
        assert_eq!(
            with_max("{!maxRecipients}").effective_max_emails(),
            ABSOLUTE_MAX_EMAILS
        );
        assert_eq!(
            with_max("99999999999999999999999").effective_max_emails(),
            ABSOLUTE_MAX_EMAILS
        );
    }

    #[test]
    fn effective_max_accepts_range_bounds() {
        assert_eq!(with_max(0).effective_max_emails(), 0);
        assert_eq!(with_max(150).effective_max_emails(), 150);
        assert_eq!(with_max(" 7").effective_max_emails(), 7);
        assert_eq!(with_max("12abc").effective_max_emails(), 12);
        assert_eq!(with_max("+4").effective_max_emails(), 4);
    }

    #[test]
    fn unparsable_max_still_counts_as_known() {
        assert!(!Config::default().max_emails_known());
        assert!(with_max("soon").max_emails_known());
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = Config {
            max_emails_error_message: "  ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.message_override(ErrorKind::OverCapacity), None);
        assert_eq!(config.message_override(ErrorKind::RequiredEmpty), None);
    }
}
