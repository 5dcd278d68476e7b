use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The adlayer developers",
    version,
    about = "adlayer CLI - A command-line interface for adlayer, an editor core for molecular-machine adsorbate layouts on reconstructed crystal surfaces.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the positional atom listing of a saved session.
    Export(ExportArgs),
    /// Summarize the contents of a saved session.
    Inspect(InspectArgs),
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the saved session file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub session: PathBuf,

    /// Path to the molecule catalog file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub catalog: PathBuf,

    /// Directory holding the structure template files.
    #[arg(short = 't', long, required = true, value_name = "DIR")]
    pub structures: PathBuf,

    /// Path for the output atom listing. Writes to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of layers to draw, top-down. Defaults to the whole stack.
    #[arg(short, long, value_name = "INT")]
    pub layers: Option<usize>,

    /// Terminate the deepest drawn layer's occupied sites with hydrogen pairs.
    #[arg(long)]
    pub terminate: bool,

    /// Override the surface layer's atom labels (five comma-separated labels).
    #[arg(long, value_name = "LABELS")]
    pub surface_labels: Option<String>,

    /// Override the substrate layers' atom labels (five comma-separated labels).
    #[arg(long, value_name = "LABELS")]
    pub substrate_labels: Option<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the saved session file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub session: PathBuf,

    /// Path to the molecule catalog file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub catalog: PathBuf,
}
