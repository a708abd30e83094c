use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone, Default)]
#[command(
    name = "lottrace",
    version,
    about = "Terminal dashboard for uploading pipeline inputs and exporting LOT traces"
)]
pub struct Cli {
    /// Base URL of the pipeline backend [default: http://127.0.0.1:5000]
    #[arg(long)]
    pub server: Option<String>,

    /// Directory that receives exports and followed downloads [default: .]
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// RON config file; flags given here override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Connect timeout in seconds [default: 10]
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds; unlimited when omitted
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Log file [default: ./lottrace.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Files to select at start-up
    pub files: Vec<PathBuf>,
}
