use anyhow::Result;
use clap::{Parser, Subcommand};
use dialog_stack::{tui, Settings};
use std::path::PathBuf;
use tracing::{debug, info};

/// dialog-stack - stacked modal and non-modal dialogs for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "dialog-stack",
    version,
    about = "Stacked modal and non-modal dialogs for the terminal",
    long_about = r#"An interactive demo of the dialog stack: open windows, modals,
confirmations, prompts and embedded pages, and watch how they stack.

Examples:
  dialog-stack                         # Start the demo
  dialog-stack --config dialogs.json   # Use an explicit settings file
  dialog-stack settings                # Print the effective settings"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Settings file to use instead of the default search paths
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive demo (default)
    Demo,
    /// Print the effective settings as JSON
    Settings,
}

impl Cli {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "dialog_stack=debug"
        } else {
            "dialog_stack=warn"
        }
    }

    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let settings = Settings::init(self.config.as_deref()).await?;
        debug!("Settings initialized");

        match self.command.unwrap_or(Commands::Demo) {
            Commands::Settings => {
                println!("{}", serde_json::to_string_pretty(&settings)?);
                Ok(())
            }
            Commands::Demo => {
                info!("Starting demo");
                tui::run(settings).await?;
                info!("Demo finished");
                Ok(())
            }
        }
    }
}
