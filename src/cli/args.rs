//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Rewrite permalink-style documentation links into relative file links
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: relink.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Manifest of `<path> : permalink: <url>` lines (default: permalinks.txt)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Root directory of the documentation tree (default: .)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Page file extension, without the dot (default: mdx)
    #[arg(short, long = "ext")]
    pub extension: Option<String>,

    /// Documentation-root marker that permalinks are normalized from
    /// (default: /docs/handbook/)
    #[arg(long)]
    pub marker: Option<String>,

    /// Skip hidden files and directories while walking the tree
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub skip_hidden: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
