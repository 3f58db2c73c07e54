//! CLI parse: clap types for allotree. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Allotree CLI - allocate quantity trees into addressable handles
#[derive(Parser)]
#[command(name = "allotree")]
#[command(about = "Allocate hierarchical quantity trees into sequenced, addressable handles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory holding allotree.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

/// Overrides for the `[run]` section of the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Output root, or the directory to read for `edf`
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Level source file (.json or .toml)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Allocator key (emp, rsp, bge, edf)
    #[arg(long)]
    pub allocator: Option<String>,

    /// Allocate from the first level with this label
    #[arg(long)]
    pub offset: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the path of every allocated handle
    Paths {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Print per-category counts
    Stats {
        #[command(flatten)]
        run: RunArgs,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create one directory per handle under a base directory
    Materialize {
        #[command(flatten)]
        run: RunArgs,
        /// Base directory for the created tree
        #[arg(long)]
        into: PathBuf,
    },
    /// List registered allocator keys
    Allocators,
}
