//! sofle-flash - Sofle split keyboard flash utility
//!
//! Downloads prebuilt ZMK firmware from GitHub Actions, waits for each half's
//! UF2 bootloader drive and copies the matching image onto it.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod platform;
pub mod remote;
pub mod services;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;

/// sofle-flash version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "sofle-flash";
