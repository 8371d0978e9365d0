//! Command-line interface definitions and dispatch

pub mod commands;

use clap::{Parser, Subcommand};

use self::commands::import::ImportArgs;

#[derive(Parser)]
#[command(
    name = "crm-import-cli",
    version,
    about = "Bulk-import CRM opportunities from spreadsheets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit every row of a spreadsheet to the opportunities endpoint
    Import(ImportArgs),
}

/// Dispatch the parsed command line to its handler
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Import(args) => commands::import::handler::handle_import_command(args).await,
    }
}
