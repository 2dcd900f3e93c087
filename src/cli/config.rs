use std::path::Path;

use clap::Parser;
use mailfield::{
    Property, PropertyEditor,
    editor::{ConfigurationChange, VALUE_CHANGED_EVENT},
};
use serde::Serialize;
use tracing::instrument;

use super::{OutputFormat, load_config, terminal::Colorize};

/// Parse a property name as the configuration panel knows it.
fn parse_property(s: &str) -> Result<Property, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show the current properties
    Show {
        /// Output format
        #[arg(long, value_name = "FORMAT", default_value = "table")]
        output: OutputFormat,
    },

    /// Set a property
    ///
    /// Properties use the panel's names, e.g. `maxEmails` or
    /// `blockedDomainsErrorMessage`. An empty value for `maxEmails` clears it.
    Set {
        /// The property to set
        #[arg(value_parser = parse_property)]
        property: Property,

        /// The new value
        value: String,
    },
}

#[derive(Debug, Serialize)]
struct Event<'a> {
    event: &'static str,
    detail: &'a ConfigurationChange,
}

impl ConfigArgs {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let mut config = load_config(config_path)?;

        match self.command {
            ConfigCommand::Show { output } => {
                let editor = PropertyEditor::from_config(&config);
                match output {
                    OutputFormat::Table => print_properties(&editor),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string_pretty(editor.input_variables())?
                    ),
                }
            }
            ConfigCommand::Set { property, value } => {
                let change = PropertyEditor::edit(property, &value)?;
                change.apply_to(&mut config);
                config.save(config_path)?;

                tracing::debug!(
                    "{}",
                    serde_json::to_string(&Event {
                        event: VALUE_CHANGED_EVENT,
                        detail: &change,
                    })?
                );
                let shown = change
                    .new_value
                    .as_ref()
                    .map_or_else(|| "(unset)".to_string(), ToString::to_string);
                println!("{}", format!("✅ {property} = {shown}").success());
            }
        }
        Ok(())
    }
}

fn print_properties(editor: &PropertyEditor) {
    let width = Property::ALL
        .iter()
        .map(|property| property.name().len())
        .max()
        .unwrap_or(0);
    for property in Property::ALL {
        let value = match property {
            Property::Label => editor.label(),
            Property::Placeholder => editor.placeholder(),
            Property::Required => editor.required().to_string(),
            Property::Disabled => editor.disabled().to_string(),
            _ => editor.text(property).unwrap_or_default(),
        };
        let name = format!("{:width$}", property.name());
        if value.is_empty() {
            println!("  {}  {}", name.info(), "-".dim());
        } else {
            println!("  {}  {value}", name.info());
        }
    }
}
