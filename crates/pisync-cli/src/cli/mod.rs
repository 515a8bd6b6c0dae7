//! CLI for the pisync upload queue.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pisync_core::client::PiClient;
use pisync_core::config;
use std::path::PathBuf;

use commands::{run_send, run_status};

/// Top-level CLI for pisync.
#[derive(Debug, Parser)]
#[command(name = "pisync")]
#[command(about = "pisync: queue local files for upload to a sync endpoint", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Queue files for upload and wait until all of them have finished.
    Send {
        /// Files to upload, processed strictly in the given order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Category tag appended to the upload path (e.g. "music", "audiobook").
        #[arg(long)]
        category: Option<String>,
    },

    /// Query the endpoint status.
    Status,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let client = PiClient::new(&cfg.endpoint_url, &cfg.api_key)?;

        match cli.command {
            CliCommand::Send { files, category } => {
                run_send(client, files, category.as_deref()).await?;
            }
            CliCommand::Status => run_status(client).await?,
        }

        Ok(())
    }
}
