mod api;
mod cli;
mod config;
mod import;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = cli::Cli::parse();
    cli::run(cli).await
}
