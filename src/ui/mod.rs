//! Terminal interaction: prompts and printed instructions

pub mod instructions;
pub mod prompt;

pub use prompt::{Prompter, TerminalPrompter};
