//! CLI command implementations

pub mod download;
pub mod flash;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute_command(command: Commands, cli: &Cli, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Download => download::execute_download_command(config, cli.force).await,
        Commands::Version => version::execute_version_command(config),
        Commands::All | Commands::Left | Commands::Right | Commands::Btclear => {
            flash::execute_flash_command(command, config, cli.force).await
        }
    }
}
