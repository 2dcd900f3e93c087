use std::{io::Read, path::Path};

use clap::Parser;
use tracing::instrument;

use super::{FieldSummary, OutputFormat, load_config, open_field};

#[derive(Debug, Parser)]
pub struct Paste {
    /// The pasted text; read from stdin when omitted
    text: Option<String>,

    /// Addresses already in the field
    #[arg(long, short, value_delimiter = ',')]
    existing: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Paste {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;

        let text = match self.text {
            Some(text) => text,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let mut field = open_field(config);
        field.set_emails(self.existing);
        field.paste(&text);

        let summary = FieldSummary::of(&field);
        match self.output {
            OutputFormat::Table => summary.print_table(),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        }
        Ok(())
    }
}
