//! Remote CI service access
//!
//! Firmware is built by GitHub Actions; this module lists runs, looks up
//! release tags and downloads artifacts.

pub mod github;

pub use github::{CiClient, GhCli, WorkflowRun};
