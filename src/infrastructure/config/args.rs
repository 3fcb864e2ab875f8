use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "metadims",
    version,
    about = "Adds image dimensions to page metadata",
    long_about = None
)]
pub struct CliArgs {
    /// Metadata JSON files to resolve. Reads stdin when empty or `-`.
    #[arg(value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "METADIMS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Image request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Public URL of the site whose images are read from `--content-root`.
    #[arg(long, value_name = "URL")]
    pub site_url: Option<String>,

    /// Local directory serving the site's images.
    #[arg(long, value_name = "PATH")]
    pub content_root: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}
