mod cli;
mod config;
mod platform;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = config::AppConfig::resolve(&args)?;
    platform::logging::initialize(platform::logging::LogDestination::File, &config.log_file);
    platform::run_app(config)
}
