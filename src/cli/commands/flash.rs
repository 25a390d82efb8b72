//! Flash commands: `all`, `left`, `right` and `btclear`

use anyhow::{Context, Result};
use std::sync::Arc;

use super::version::print_version_summary;
use crate::cli::args::Commands;
use crate::config::AppConfig;
use crate::models::{FirmwareSet, Half, ImageKind, VersionDescriptor};
use crate::platform::DiskutilOperations;
use crate::services::{
    CredentialCache, FlashSequencer, SequencerSettings, SudoEscalator, find_firmware,
};
use crate::ui::TerminalPrompter;
use crate::utils::timestamp;

pub async fn execute_flash_command(
    command: Commands,
    config: &AppConfig,
    unattended: bool,
) -> Result<()> {
    let credentials = CredentialCache::load(
        &config.paths.credential_file,
        Arc::new(SudoEscalator),
        &TerminalPrompter,
    )
    .await
    .context("Failed to obtain sudo credentials")?;

    println!("{} - 🚀 Automatic Sofle V2 flashing", timestamp());

    let firmware = find_firmware(&config.paths.download_dir, &config.firmware)?;
    if let Some(info) = VersionDescriptor::load(&config.version_file())? {
        print_version_summary(&info);
        println!();
    }
    print_firmware_set(&firmware);

    let sequencer = FlashSequencer::new(
        DiskutilOperations::new(credentials, config),
        SequencerSettings::from_config(config, unattended),
    );

    match command {
        Commands::All => {
            sequencer.flash_all(&firmware).await?;
        }
        Commands::Left => {
            sequencer
                .flash_half(&firmware.left, Half::Left, ImageKind::Main)
                .await?;
        }
        Commands::Right => {
            sequencer
                .flash_half(&firmware.right, Half::Right, ImageKind::Main)
                .await?;
        }
        Commands::Btclear => {
            sequencer.clear_btpairs(&firmware).await?;
        }
        Commands::Download | Commands::Version => {
            anyhow::bail!("{:?} is not a flash command", command);
        }
    }

    println!("{} - 🎉 Done!", timestamp());
    Ok(())
}

fn print_firmware_set(firmware: &FirmwareSet) {
    println!("✅ Firmware found:");
    println!("   Left   = {}", firmware.left.display());
    println!("   Right  = {}", firmware.right.display());
    if let Some(reset) = &firmware.reset {
        println!("   Reset  = {}", reset.display());
    }
}
