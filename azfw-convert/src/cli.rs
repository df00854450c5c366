use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "azfw-convert")]
#[command(about = "Convert tab-delimited firewall rule exports into Azure Firewall policy ARM templates")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Convert a rule export into an ARM template.
    Convert(ConvertArgs),
    /// Show how a rule export groups into sections without writing a template.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Rule export to convert (`-` reads stdin).
    pub input: PathBuf,
    /// Output file path. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Fail on lines that would otherwise be skipped.
    #[arg(long)]
    pub strict: bool,
    /// Spaces per indentation level.
    #[arg(long, conflicts_with = "compact")]
    pub indent: Option<usize>,
    /// Emit single-line JSON.
    #[arg(long)]
    pub compact: bool,
    /// Optional settings TOML file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print a one-line conversion summary to stderr.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Rule export to inspect (`-` reads stdin).
    pub input: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Fail on lines that would otherwise be skipped.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
