use std::path::{Path, PathBuf};

mod add;
mod check;
mod config;
mod init;
mod paste;
mod terminal;
mod validate;

use add::Add;
use check::Check;
use clap::ArgAction;
use config::ConfigArgs;
use init::Init;
use mailfield::{
    Config, EmailField, ErrorState,
    domain::{ConfigError, message::is_rich},
};
use paste::Paste;
use serde::Serialize;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the field configuration file
    #[arg(short, long, default_value = "mailfield.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Write a default configuration file
    Init(Init),

    /// Check addresses against the format and domain rules
    Check(Check),

    /// Paste text into the field
    ///
    /// The text is split into candidates the way a paste into the field
    /// would be, then filtered for format, domain rules, duplicates and the
    /// maximum.
    Paste(Paste),

    /// Type addresses into the field one at a time
    Add(Add),

    /// Load addresses into the field and validate it
    ///
    /// Exits with status 1 when the field is invalid.
    Validate(Validate),

    /// Show or modify the field's properties
    Config(ConfigArgs),
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(config_path)?,
            Self::Check(command) => command.run(config_path)?,
            Self::Paste(command) => command.run(config_path)?,
            Self::Add(command) => command.run(config_path)?,
            Self::Validate(command) => command.run(config_path)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Loads the configuration, falling back to defaults when the file cannot be
/// read. A file that exists but does not parse is an error.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    match Config::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Read(error)) => {
            tracing::debug!(path = %path.display(), %error, "using default configuration");
            Ok(Config::default())
        }
        Err(error) => Err(error.into()),
    }
}

/// A connected field with no pending work, ready for a command to drive.
fn open_field(config: Config) -> EmailField {
    let mut field = EmailField::new(config);
    field.connected();
    field
}

/// The field's outputs after a command has run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldSummary<'a> {
    email_collection: &'a [String],
    email_list: String,
    input: &'a str,
    error: &'a ErrorState,
}

impl<'a> FieldSummary<'a> {
    fn of(field: &'a EmailField) -> Self {
        Self {
            email_collection: field.email_collection(),
            email_list: field.email_list(),
            input: field.input_value(),
            error: field.error(),
        }
    }

    fn print_table(&self) {
        use terminal::Colorize;

        if self.email_collection.is_empty() {
            println!("{}", "No addresses accepted".dim());
        }
        for email in self.email_collection {
            println!("  • {email}");
        }
        println!("{}", format!("emailList: {}", self.email_list).dim());
        if !self.input.is_empty() {
            println!("{}", format!("input: {}", self.input).dim());
        }
        print_error(self.error.message());
    }
}

/// Prints an error message, one line per item when it is a list.
fn print_error(message: &str) {
    use terminal::Colorize;

    for line in plain_lines(message) {
        eprintln!("{}", format!("✗ {line}").warning());
    }
}

/// Splits a (possibly rich) error message into plain lines.
fn plain_lines(message: &str) -> Vec<&str> {
    if message.is_empty() {
        return Vec::new();
    }
    if !is_rich(message) {
        return vec![message];
    }
    message
        .split("<li>")
        .skip(1)
        .filter_map(|item| item.split("</li>").next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_unwraps_lists() {
        assert!(plain_lines("").is_empty());
        assert_eq!(plain_lines("one"), ["one"]);
        assert_eq!(
            plain_lines(r#"<ul style="x"><li>one</li><li>two</li></ul>"#),
            ["one", "two"]
        );
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "_version = \"1\"\nrequired = 3\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
