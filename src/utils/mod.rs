//! Utility functions and helpers used throughout sofle-flash

pub mod logging;
pub mod process;

pub use process::{CommandOutput, run_command};

/// Local wall-clock timestamp for progress lines
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
