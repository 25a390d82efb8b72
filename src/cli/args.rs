//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "sofle-flash")]
#[command(about = "🚀 Sofle flash utility - download ZMK firmware and flash both halves")]
pub struct Cli {
    /// download: re-download even if up to date; flashing: skip setup instructions
    #[arg(long, global = true)]
    pub force: bool,

    /// Path to a TOML config file (defaults to <config dir>/sofle-flash/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Download the latest firmware (skipped if already downloaded)
    Download,
    /// Show the version of the downloaded firmware
    Version,
    /// Flash both halves (right, then left)
    All,
    /// Flash the left half only
    Left,
    /// Flash the right half only
    Right,
    /// Clear bluetooth pairings and reflash both halves
    Btclear,
}
