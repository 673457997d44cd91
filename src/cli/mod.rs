//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "pulsecheck",
    version,
    about = "Unattended CI stability trials against a hosted repository"
)]
pub struct Cli {
    /// Config file to load instead of pulsecheck.yaml / pulsecheck.local.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one stability batch now and print the summary
    Run,
    /// Run a batch every day at the configured UTC time
    Schedule,
    /// Check the configuration and hosting connectivity, then exit
    Validate,
}
