use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tracing::instrument;

use super::{FieldSummary, OutputFormat, load_config, open_field, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Add {
    /// The addresses to type, in order
    #[arg(required = true)]
    emails: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Attempt {
    email: String,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    attempts: Vec<Attempt>,
    #[serde(flatten)]
    field: FieldSummary<'a>,
}

impl Add {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;
        let mut field = open_field(config);

        let mut attempts = Vec::with_capacity(self.emails.len());
        for email in self.emails {
            let before = field.entries().len();
            field.input(&email);
            field.add_email(&email);
            let accepted = field.entries().len() > before;
            let error = field
                .error()
                .has_error()
                .then(|| field.error().message().to_string());
            attempts.push(Attempt {
                email,
                accepted,
                error,
            });
        }

        match self.output {
            OutputFormat::Table => {
                for attempt in &attempts {
                    match &attempt.error {
                        None if attempt.accepted => {
                            println!("{}", format!("✓ {}", attempt.email).success());
                        }
                        Some(error) => {
                            println!(
                                "{}  {}",
                                format!("✗ {}", attempt.email).warning(),
                                error.dim()
                            );
                        }
                        None => println!("{}", format!("- {} (ignored)", attempt.email).dim()),
                    }
                }
                println!();
                let summary = FieldSummary::of(&field);
                println!("{}", format!("emailList: {}", summary.email_list).info());
            }
            OutputFormat::Json => {
                let report = Report {
                    attempts,
                    field: FieldSummary::of(&field),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Ok(())
    }
}
