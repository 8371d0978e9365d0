pub mod handler;

use clap::Args;
use std::path::PathBuf;

/// Arguments for the import command
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Spreadsheet with one opportunity per row (.xlsx, .xls or .csv)
    pub file: PathBuf,

    /// Endpoint URL receiving each opportunity
    #[arg(long)]
    pub url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per record; only timeouts and connection failures are retried
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Directory receiving the success/failure log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Validate the file and print the payloads without submitting anything
    #[arg(long)]
    pub dry: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
