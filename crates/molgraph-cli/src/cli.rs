use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "molgraph - inspect, convert and search chemical structures stored as MDL molfiles.",
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

    /// Set the number of threads used to search targets in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print formula, weight, ring and valence information for structures.
    Inspect(InspectArgs),
    /// Read a molfile and write it back out in normalized V2000 form.
    Convert(ConvertArgs),
    /// Find the structures that contain (or equal) a query structure.
    Search(SearchArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Toml,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Molfiles or SD files to inspect.
    #[arg(required = true, value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Output format of the report.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Count superatoms as single atoms instead of expanding them.
    #[arg(long)]
    pub no_expand: bool,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input molfile.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output molfile.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Replace every superatom by its expanded template before writing.
    #[arg(long)]
    pub expand_superatoms: bool,

    /// Read atom-atom map numbers, as for a molfile taken from a reaction.
    #[arg(long)]
    pub reaction: bool,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Molfile holding the query structure.
    #[arg(required = true, value_name = "QUERY")]
    pub query: PathBuf,

    /// Molfiles or SD files holding the target structures.
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<PathBuf>,

    /// Require the whole target to match the query instead of a substructure.
    #[arg(long)]
    pub full: bool,

    /// Require wedge, hash and wavy bonds to agree.
    #[arg(long)]
    pub stereo: bool,

    /// Ignore substitution, unsaturation, ring-bond and hydrogen-count query features.
    #[arg(long)]
    pub ignore_query_features: bool,

    /// Give up on a target after this many search steps.
    #[arg(long, value_name = "INT")]
    pub max_steps: Option<u64>,

    /// Print the atom-atom mapping of every hit.
    #[arg(long)]
    pub show_mapping: bool,
}
