use std::path::Path;

use clap::Parser;
use tracing::instrument;

use super::{OutputFormat, load_config, open_field, print_error, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Validate {
    /// The addresses to load into the field
    emails: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;
        let mut field = open_field(config);
        field.set_emails(self.emails);

        let outcome = field.validate();

        match self.output {
            OutputFormat::Table => {
                if outcome.is_valid {
                    println!(
                        "{}",
                        format!("✓ {} address(es) valid", field.entries().len()).success()
                    );
                } else {
                    print_error(outcome.error_message.as_deref().unwrap_or_default());
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        }

        if !outcome.is_valid {
            std::process::exit(1);
        }

        Ok(())
    }
}
