//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - watch: follow the newest chat log (default)
//! - demo: show the built-in messages

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Lanescroll - scroll chat log messages across terminal lanes
#[derive(Parser, Debug)]
#[command(name = "lanescroll")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow the newest chat log and display new messages
    Watch(WatchArgs),

    /// Display the built-in demo messages
    Demo(DisplayArgs),
}

/// Options shared by every display command
#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// Number of lanes
    #[arg(short = 'n', long)]
    pub lanes: Option<usize>,

    /// Columns moved per tick
    #[arg(long)]
    pub speed: Option<f64>,

    /// Run without a terminal, logging lane activity only
    #[arg(long)]
    pub headless: bool,
}

/// Options for the watch command
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Chat logs directory
    #[arg(short, long)]
    pub log_dir: Option<PathBuf>,

    /// File name pattern of chat logs
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Show messages already in the newest log at startup
    #[arg(long)]
    pub replay_existing: bool,

    #[command(flatten)]
    pub display: DisplayArgs,
}
