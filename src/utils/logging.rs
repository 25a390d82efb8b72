//! Logging initialization for the sofle-flash CLI

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Map `-q` / `-v` flags to a log level
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Initialize stderr logging. `RUST_LOG` still takes precedence per module.
pub fn init_cli_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = level_for(verbose, quiet);

    Builder::new()
        .target(Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init()?;

    log_panics::init();

    log::debug!("sofle-flash logging initialized with level: {:?}", level);
    Ok(())
}
