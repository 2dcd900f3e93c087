//! The configuration panel.
//!
//! A workflow designer edits the field's properties in a panel that the
//! builder hosts. The builder hands the panel its current "input variables"
//! and expects a `configuration_editor_input_value_changed` event for every
//! edit. Values may be literals or references to workflow variables
//! (`{!name}`), which are only resolved when the flow runs; see
//! [`PropertyEditor::resolve`].

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{Config, MaxEmails};

/// The event the builder listens for.
pub const VALUE_CHANGED_EVENT: &str = "configuration_editor_input_value_changed";

const DEFAULT_LABEL: &str = "Email";
const DEFAULT_PLACEHOLDER: &str = "Enter an email address";

/// The builder's data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Text.
    String,
    /// A flag.
    Boolean,
    /// A whole number.
    Integer,
}

/// A property value as the builder stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// A flag.
    Bool(bool),
    /// A whole number.
    Number(i64),
    /// Text, possibly a `{!name}` reference.
    Text(String),
}

impl VariableValue {
    /// The name inside a `{!name}` reference, if this is one.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        let Self::Text(text) = self else {
            return None;
        };
        text.trim()
            .strip_prefix("{!")
            .and_then(|rest| rest.strip_suffix('}'))
            .map(str::trim)
    }

    fn truthy(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Number(number) => *number != 0,
            Self::Text(text) => text.trim().eq_ignore_ascii_case("true"),
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Bool(flag) => flag.to_string(),
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One property as the builder hands it to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputVariable {
    /// The property name, e.g. `maxEmails`.
    pub name: String,
    /// The stored value, if any.
    #[serde(default)]
    pub value: Option<VariableValue>,
    /// The builder's type for the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_data_type: Option<DataType>,
}

/// The field's configurable properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// The label above the input.
    Label,
    /// Placeholder text shown in the empty input.
    Placeholder,
    /// Help text behind the info icon.
    HelpText,
    /// Whether at least one address is required.
    Required,
    /// Whether the field rejects interaction.
    Disabled,
    /// The address limit, as a number or a `{!reference}`.
    MaxEmails,
    /// Comma-separated allow-list of domain patterns.
    AllowedDomains,
    /// Comma-separated block-list of domain patterns.
    BlockedDomains,
    /// Override for the invalid-format message.
    InvalidEmailErrorMessage,
    /// Override for the capacity message.
    MaxEmailsErrorMessage,
    /// Override for the duplicate message.
    DuplicateEmailErrorMessage,
    /// Override for the not-allowed domain message.
    AllowedDomainsErrorMessage,
    /// Override for the blocked domain message.
    BlockedDomainsErrorMessage,
}

impl Property {
    /// Every property, in panel order.
    pub const ALL: [Self; 13] = [
        Self::Label,
        Self::Placeholder,
        Self::HelpText,
        Self::Required,
        Self::Disabled,
        Self::MaxEmails,
        Self::AllowedDomains,
        Self::BlockedDomains,
        Self::InvalidEmailErrorMessage,
        Self::MaxEmailsErrorMessage,
        Self::DuplicateEmailErrorMessage,
        Self::AllowedDomainsErrorMessage,
        Self::BlockedDomainsErrorMessage,
    ];

    /// The name the builder knows the property by.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Placeholder => "placeholder",
            Self::HelpText => "helpText",
            Self::Required => "required",
            Self::Disabled => "disabled",
            Self::MaxEmails => "maxEmails",
            Self::AllowedDomains => "allowedDomains",
            Self::BlockedDomains => "blockedDomains",
            Self::InvalidEmailErrorMessage => "invalidEmailErrorMessage",
            Self::MaxEmailsErrorMessage => "maxEmailsErrorMessage",
            Self::DuplicateEmailErrorMessage => "duplicateEmailErrorMessage",
            Self::AllowedDomainsErrorMessage => "allowedDomainsErrorMessage",
            Self::BlockedDomainsErrorMessage => "blockedDomainsErrorMessage",
        }
    }

    /// The type edits to this property are reported with.
    #[must_use]
    pub const fn data_type(self) -> DataType {
        match self {
            Self::Required | Self::Disabled => DataType::Boolean,
            Self::MaxEmails => DataType::Integer,
            _ => DataType::String,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = EditError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|property| property.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EditError::UnknownProperty(name.to_string()))
    }
}

/// Errors raised while turning panel input into a change.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    /// No property has this name.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    /// A flag was set to something other than `true` or `false`.
    #[error("{property} expects true or false, got '{value}'")]
    NotABoolean {
        /// The property being edited.
        property: Property,
        /// The rejected input.
        value: String,
    },
    /// A number was set to something that does not start with digits.
    #[error("{property} expects a whole number, got '{value}'")]
    NotAnInteger {
        /// The property being edited.
        property: Property,
        /// The rejected input.
        value: String,
    },
}

/// The payload of a [`VALUE_CHANGED_EVENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationChange {
    /// The property that changed.
    pub name: Property,
    /// Its new value; `None` clears it.
    pub new_value: Option<VariableValue>,
    /// The builder type of the new value.
    pub new_value_data_type: DataType,
}

impl ConfigurationChange {
    /// Writes the change into a configuration.
    pub fn apply_to(&self, config: &mut Config) {
        let value = self.new_value.as_ref();
        let text = || value.cloned().map(VariableValue::into_text).unwrap_or_default();
        let flag = || value.is_some_and(VariableValue::truthy);
        match self.name {
            Property::Label => config.label = text(),
            Property::Placeholder => config.placeholder = text(),
            Property::HelpText => config.help_text = Some(text()).filter(|help| !help.is_empty()),
            Property::Required => config.required = flag(),
            Property::Disabled => config.disabled = flag(),
            Property::MaxEmails => config.max_emails = value.cloned().and_then(to_max_emails),
            Property::AllowedDomains => config.allowed_domains = text(),
            Property::BlockedDomains => config.blocked_domains = text(),
            Property::InvalidEmailErrorMessage => config.invalid_email_error_message = text(),
            Property::MaxEmailsErrorMessage => config.max_emails_error_message = text(),
            Property::DuplicateEmailErrorMessage => config.duplicate_email_error_message = text(),
            Property::AllowedDomainsErrorMessage => config.allowed_domains_error_message = text(),
            Property::BlockedDomainsErrorMessage => config.blocked_domains_error_message = text(),
        }
    }
}

/// Reads and edits the field's properties the way the builder's panel does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEditor {
    input_variables: Vec<InputVariable>,
}

impl PropertyEditor {
    /// Creates a panel over the builder's current input variables.
    #[must_use]
    pub const fn new(input_variables: Vec<InputVariable>) -> Self {
        Self { input_variables }
    }

    /// Builds the input variables that describe `config`.
    ///
    /// Blank text settings and unset optional ones are omitted, as the
    /// builder omits properties nobody has set.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let text = |property: Property, text: &str| {
            (!text.is_empty()).then(|| variable(property, VariableValue::Text(text.to_string())))
        };
        let input_variables = [
            text(Property::Label, &config.label),
            text(Property::Placeholder, &config.placeholder),
            config
                .help_text
                .as_deref()
                .and_then(|help| text(Property::HelpText, help)),
            Some(variable(Property::Required, VariableValue::Bool(config.required))),
            Some(variable(Property::Disabled, VariableValue::Bool(config.disabled))),
            config.max_emails.as_ref().map(|max| {
                let value = match max {
                    MaxEmails::Number(number) => VariableValue::Number(*number),
                    MaxEmails::Text(text) => VariableValue::Text(text.clone()),
                };
                variable(Property::MaxEmails, value)
            }),
            text(Property::AllowedDomains, &config.allowed_domains),
            text(Property::BlockedDomains, &config.blocked_domains),
            text(
                Property::InvalidEmailErrorMessage,
                &config.invalid_email_error_message,
            ),
            text(Property::MaxEmailsErrorMessage, &config.max_emails_error_message),
            text(
                Property::DuplicateEmailErrorMessage,
                &config.duplicate_email_error_message,
            ),
            text(
                Property::AllowedDomainsErrorMessage,
                &config.allowed_domains_error_message,
            ),
            text(
                Property::BlockedDomainsErrorMessage,
                &config.blocked_domains_error_message,
            ),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self { input_variables }
    }

    /// The input variables as last supplied or edited.
    #[must_use]
    pub fn input_variables(&self) -> &[InputVariable] {
        &self.input_variables
    }

    /// The stored value of `property`, if any.
    #[must_use]
    pub fn get(&self, property: Property) -> Option<&VariableValue> {
        self.input_variables
            .iter()
            .find(|variable| variable.name == property.name())
            .and_then(|variable| variable.value.as_ref())
    }

    /// The label, defaulting to `"Email"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.text_or(Property::Label, DEFAULT_LABEL)
    }

    /// The placeholder, defaulting to `"Enter an email address"`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        self.text_or(Property::Placeholder, DEFAULT_PLACEHOLDER)
    }

    /// Whether the field is marked required.
    #[must_use]
    pub fn required(&self) -> bool {
        self.get(Property::Required)
            .is_some_and(VariableValue::truthy)
    }

    /// Whether the field is marked disabled.
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.get(Property::Disabled)
            .is_some_and(VariableValue::truthy)
    }

    /// The stored text of a text property, if set.
    #[must_use]
    pub fn text(&self, property: Property) -> Option<String> {
        self.get(property).map(ToString::to_string)
    }

    fn text_or(&self, property: Property, default: &str) -> String {
        self.text(property)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Turns raw panel input for `property` into a change event payload.
    ///
    /// Text properties take the input verbatim. Flags accept `true` or
    /// `false`. `maxEmails` reads the leading whole number; blank input
    /// clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if a flag or number cannot be read from `raw`.
    pub fn edit(property: Property, raw: &str) -> Result<ConfigurationChange, EditError> {
        let new_value = match property.data_type() {
            DataType::String => Some(VariableValue::Text(raw.to_string())),
            DataType::Boolean => {
                let flag = raw.trim().to_ascii_lowercase().parse::<bool>().map_err(|_| {
                    EditError::NotABoolean {
                        property,
                        value: raw.to_string(),
                    }
                })?;
                Some(VariableValue::Bool(flag))
            }
            DataType::Integer if raw.trim().is_empty() => None,
            DataType::Integer => {
                let number = MaxEmails::from(raw).parse().ok_or_else(|| {
                    EditError::NotAnInteger {
                        property,
                        value: raw.to_string(),
                    }
                })?;
                Some(VariableValue::Number(number))
            }
        };
        tracing::debug!(%property, ?new_value, "property edited");
        Ok(ConfigurationChange {
            name: property,
            new_value,
            new_value_data_type: property.data_type(),
        })
    }

    /// Records a change, as the builder does when it echoes the event back.
    pub fn apply(&mut self, change: &ConfigurationChange) {
        let name = change.name.name();
        if let Some(variable) = self
            .input_variables
            .iter_mut()
            .find(|variable| variable.name == name)
        {
            variable.value.clone_from(&change.new_value);
            variable.value_data_type = Some(change.new_value_data_type);
            return;
        }
        self.input_variables.push(InputVariable {
            name: name.to_string(),
            value: change.new_value.clone(),
            value_data_type: Some(change.new_value_data_type),
        });
    }

    /// Produces the field configuration, resolving `{!name}` references
    /// against `bindings`.
    ///
    /// A reference with no binding counts as unset: `maxEmails` stays
    /// unknown, flags are `false` and text is empty (the label and
    /// placeholder then fall back to their defaults).
    #[must_use]
    pub fn resolve(&self, bindings: &HashMap<String, VariableValue>) -> Config {
        let lookup = |property: Property| -> Option<VariableValue> {
            let value = self.get(property)?;
            let Some(name) = value.reference() else {
                return Some(value.clone());
            };
            let bound = bindings.get(name).cloned();
            if bound.is_none() {
                tracing::debug!(%property, reference = name, "unresolved reference");
            }
            bound
        };
        let text = |property: Property| {
            lookup(property)
                .map(VariableValue::into_text)
                .unwrap_or_default()
        };
        let text_or = |property: Property, default: &str| {
            Some(text(property))
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let flag = |property: Property| lookup(property).is_some_and(|value| value.truthy());

        Config {
            label: text_or(Property::Label, DEFAULT_LABEL),
            placeholder: text_or(Property::Placeholder, DEFAULT_PLACEHOLDER),
            required: flag(Property::Required),
            help_text: Some(text(Property::HelpText)).filter(|help| !help.is_empty()),
            max_emails: lookup(Property::MaxEmails).and_then(to_max_emails),
            disabled: flag(Property::Disabled),
            allowed_domains: text(Property::AllowedDomains),
            blocked_domains: text(Property::BlockedDomains),
            allowed_domains_error_message: text(Property::AllowedDomainsErrorMessage),
            blocked_domains_error_message: text(Property::BlockedDomainsErrorMessage),
            invalid_email_error_message: text(Property::InvalidEmailErrorMessage),
            max_emails_error_message: text(Property::MaxEmailsErrorMessage),
            duplicate_email_error_message: text(Property::DuplicateEmailErrorMessage),
        }
    }
}

fn variable(property: Property, value: VariableValue) -> InputVariable {
    InputVariable {
        name: property.name().to_string(),
        value: Some(value),
        value_data_type: Some(property.data_type()),
    }
}

fn to_max_emails(value: VariableValue) -> Option<MaxEmails> {
    match value {
        VariableValue::Number(number) => Some(MaxEmails::Number(number)),
        VariableValue::Text(text) if !text.trim().is_empty() => Some(MaxEmails::Text(text)),
        VariableValue::Text(_) | VariableValue::Bool(_) => None,
    }
}
