use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitterdone", version)]
#[command(
    about = "Keep a Git working copy and a Perforce depot in step",
    long_about = None
)]
pub struct Cli {
    /// Repository root (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to gitterdone.toml in the root)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Regenerate the ignore file from the wishlist
    #[arg(short, long)]
    pub git: bool,

    /// Let global ignore patterns override the wishlist
    #[arg(long)]
    pub strict: bool,

    /// Open every file operation of BRANCH in a new changelist
    #[arg(short, long, value_name = "BRANCH")]
    pub changelist: Option<String>,

    /// Include unpushed trunk commits in the changelist
    #[arg(long)]
    pub include_trunk: bool,

    /// Branches whose commits are left out of the changelist
    #[arg(long, value_name = "BRANCH", num_args = 1..)]
    pub ignored_branches: Vec<String>,
}

impl Cli {
    pub fn has_action(&self) -> bool {
        self.git || self.changelist.is_some()
    }
}
