use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vl",
    about = "valuelens — structural diff and field paths for values files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with lens settings (cache_ttl_secs, context_lines)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show changed regions between two versions of a document
    Diff(DiffArgs),
    /// Show the structural path of a line
    Path(PathArgs),
    /// Find lines containing a query, with their paths
    Search(SearchArgs),
    /// List every keyed line with its path
    Keys(KeysArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Lines of context around each change
    #[arg(short = 'U', long)]
    pub context: Option<usize>,
}

#[derive(Args)]
pub struct PathArgs {
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
}

#[derive(Args)]
pub struct SearchArgs {
    pub file: PathBuf,
    pub query: String,
}

#[derive(Args)]
pub struct KeysArgs {
    pub file: PathBuf,
}
