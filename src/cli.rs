use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "credit-risk",
    version,
    about = "Loan applicant credit risk scoring CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding credit-risk.toml
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score an applicant profile (TOML, or JSON by extension)
    Assess(AssessCommand),
    /// Check a model artifact against the feature layout contract
    Validate(ValidateCommand),
    /// Print the rating bands for the configured score scale
    Bands,
}

#[derive(Args)]
pub struct AssessCommand {
    pub profile: PathBuf,
    /// Model artifact overriding [model] path
    #[arg(long)]
    pub model: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Skip narrative insight generation
    #[arg(long)]
    pub no_insights: bool,
}

#[derive(Args)]
pub struct ValidateCommand {
    /// Model artifact overriding [model] path
    #[arg(long)]
    pub model: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
