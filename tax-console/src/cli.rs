//! Command-line and session command definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tax rate console.
///
/// Loads tax rates from the configured source and lists, summarises,
/// calculates with or exports them. `session` keeps one in-memory store
/// alive and reads commands from stdin, one per line.
#[derive(Debug, Parser)]
#[command(name = "tax-console", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file. Defaults to `tax-console.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Source backend (`fixture` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Source location, e.g. the fixture path. Implies `--backend fixture`
    /// unless a backend is given.
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Log filter: a bare level or any `RUST_LOG`-style directive.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the tax rate table.
    List(ListArgs),
    /// Print rate counts.
    Summary,
    /// Apply the active rate for a region to an amount.
    #[command(alias = "calc")]
    Calculate(CalculateArgs),
    /// Write the rates as CSV.
    Export(ExportArgs),
    /// Read commands from stdin against one store until `quit` or EOF.
    Session,
}

/// One line typed into a session.
#[derive(Debug, Parser)]
#[command(
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{all-args}"
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Add a new, active tax rate.
    Add(RateArgs),
    /// Edit a tax rate; omitted fields keep their current values.
    Edit(EditArgs),
    /// Activate or deactivate a tax rate.
    Toggle { id: String },
    /// Delete a tax rate.
    #[command(alias = "rm")]
    Delete { id: String },
    /// Print the tax rate table.
    #[command(alias = "ls")]
    List(ListArgs),
    /// Print rate counts.
    Summary,
    /// Apply the active rate for a region to an amount.
    #[command(alias = "calc")]
    Calculate(CalculateArgs),
    /// Write the rates as CSV.
    Export(ExportArgs),
    /// Change the log filter.
    Log { level: String },
    /// End the session.
    #[command(alias = "exit")]
    Quit,
}

/// Tax rate form fields. The rate is a percentage (`13` or `13%`).
#[derive(Debug, Clone, Default, Args)]
pub struct RateArgs {
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Percentage, e.g. `13` for 13%.
    #[arg(long)]
    pub rate: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    pub id: String,
    #[command(flatten)]
    pub fields: RateArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Only rates for this country (exact match).
    #[arg(long)]
    pub country: Option<String>,
    /// Only active rates.
    #[arg(long)]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CalculateArgs {
    #[arg(long, default_value = "")]
    pub region: String,
    #[arg(long, default_value = "")]
    pub amount: String,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExportArgs {
    /// Output file or directory; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}
