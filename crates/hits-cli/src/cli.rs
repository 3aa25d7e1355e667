//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Export the items flagged by interesting-file rule-sets
#[derive(Parser, Debug)]
#[command(name = "hits")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Copy every flagged item into per-set folders and write manifests
    ///
    /// Exit status is 0 when everything was exported, 2 when some items
    /// failed, and 1 when the run could not complete.
    ///
    /// Examples:
    ///   hits export --catalog case.toml --output ./report
    ///   hits export --catalog case.json --out-dir ./out --jobs 4
    Export(ExportArgs),

    /// List the rule-sets that flagged items in a case
    Sets {
        /// Case catalog (.toml, .json, .yaml)
        #[arg(long, env = "HITS_CATALOG")]
        catalog: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   hits completions bash > ~/.local/share/bash-completion/completions/hits
    ///   hits completions zsh > ~/.zfunc/_hits
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments of `hits export`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ExportArgs {
    /// Case catalog (.toml, .json, .yaml)
    #[arg(long, env = "HITS_CATALOG")]
    pub catalog: PathBuf,

    /// Directory that catalog `source` paths are relative to
    /// [default: the catalog's directory]
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Export root; overrides the output template
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Value of the #OUT_DIR# macro in the output template
    #[arg(long, env = "HITS_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Export settings file (.toml, .json, .yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of rule-sets exported in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Deepest directory nesting below a flagged directory
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Output the export report as JSON
    #[arg(long)]
    pub json: bool,
}
