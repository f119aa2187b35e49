use clap::{Parser, Subcommand, Args};

use crate::models::ScanType;

#[derive(Parser)]
#[command(name = "scanctl", version, about = "Stop running scans and reconcile cached views")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cancel one or more running scans
    Stop(StopArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct StopArgs {
    /// Scan IDs to cancel
    #[arg(required = true)]
    pub scan_ids: Vec<String>,

    /// Scan type: vulnerability, secret, malware, compliance, cloud-compliance
    #[arg(short = 't', long = "type")]
    pub scan_type: Option<ScanType>,

    /// Stop every listed scan instead of only the first
    #[arg(long)]
    pub all: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the result record as JSON
    #[arg(long)]
    pub json: bool,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// API base URL (overrides config and SCANCTL_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
