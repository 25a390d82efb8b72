//! Command Line Interface module
//!
//! Argument parsing and the command implementations.

pub mod args;
pub mod commands;

pub use args::*;

use anyhow::{Context, Result};
use clap::CommandFactory;
use std::backtrace::{Backtrace, BacktraceStatus};

use crate::config::AppConfig;
use crate::errors::FlashError;

/// Print usage to stdout
pub fn print_usage() -> Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

/// Main CLI application runner
pub async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        return print_usage();
    };

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    commands::execute_command(command, &cli, &config).await
}

/// Text printed to stderr for a failed run.
///
/// Domain errors get their suggested remedy; anything else gets the full
/// error chain and a stack backtrace.
pub fn error_report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<FlashError>() {
        Some(FlashError::Interrupted) => "⚠️  Interrupted by user".to_string(),
        Some(flash_err) => match flash_err.remedy() {
            Some(remedy) => format!("❌ Error: {:#}\n💡 {}", err, remedy),
            None => format!("❌ Error: {:#}", err),
        },
        None => {
            let mut report = format!("❌ Error: {:#}\n{:?}", err, err);
            // `{:?}` already includes a backtrace captured via RUST_BACKTRACE
            if err.backtrace().status() != BacktraceStatus::Captured {
                report.push_str(&format!(
                    "\n\nStack backtrace:\n{}",
                    Backtrace::force_capture()
                ));
            }
            report
        }
    }
}
