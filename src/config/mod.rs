//! Configuration management for sofle-flash

pub mod app_config;

pub use app_config::*;
