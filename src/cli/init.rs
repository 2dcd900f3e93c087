use std::path::Path;

use clap::Parser;
use mailfield::Config;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Init {}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Configuration already exists at {}",
                config_path.display()
            );
        }

        Config::default()
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", config_path.display()))?;

        println!(
            "{}",
            format!("✅ Wrote default configuration to {}", config_path.display()).success()
        );
        println!();
        println!("Next steps:");
        println!("  mailfield config set maxEmails 10");
        println!("  mailfield paste \"Jane <jane@example.com>, bob@example.com\"");

        Ok(())
    }
}
