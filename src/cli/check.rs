use std::path::Path;

use clap::Parser;
use mailfield::domain::{Classification, Verdict, classify, is_valid_format};
use serde::Serialize;
use tracing::instrument;

use super::{OutputFormat, load_config, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Check {
    /// The addresses to check
    #[arg(required = true)]
    emails: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    email: &'a str,
    valid_format: bool,
    #[serde(flatten)]
    classification: Classification,
}

impl Row<'_> {
    const fn passed(&self) -> bool {
        self.valid_format && matches!(self.classification.verdict, Verdict::Valid)
    }
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;

        let rows: Vec<Row> = self
            .emails
            .iter()
            .map(|email| Row {
                email,
                valid_format: is_valid_format(email),
                classification: classify(email, &config),
            })
            .collect();

        match self.output {
            OutputFormat::Table => print_table(&rows),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        }
        Ok(())
    }
}

fn print_table(rows: &[Row]) {
    let width = rows.iter().map(|row| row.email.len()).max().unwrap_or(0);
    for row in rows {
        if row.passed() {
            println!("{}", format!("✓ {}", row.email).success());
            continue;
        }
        let reason = if row.valid_format {
            row.classification.message.as_deref().unwrap_or_default()
        } else {
            "invalid format"
        };
        println!(
            "{}  {}",
            format!("✗ {:width$}", row.email).warning(),
            reason.dim()
        );
    }
}
