use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Canopy: workspace layouts for multi-window desktops.
#[derive(Parser, Debug)]
#[command(name = "canopy", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a layout document and report every violation.
    Validate {
        /// JSON file holding one layout or an array of layouts.
        file: PathBuf,
    },
    /// Open a layout document headlessly and print the resulting trees.
    Inspect {
        file: PathBuf,
        /// Print the resolved lock flags of every box as well.
        #[arg(long)]
        locks: bool,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
