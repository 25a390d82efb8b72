//! Data models and types used throughout sofle-flash

pub mod firmware;
pub mod version;

// Re-export commonly used types
pub use firmware::*;
pub use version::*;
