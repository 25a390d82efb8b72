//! Error types for sofle-flash

pub mod types;

pub use types::*;
