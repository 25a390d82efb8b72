//! Flash firmware onto each half through its bootloader drive
//!
//! Per half the sequencer walks
//! `WaitingForVolume -> Unmounting -> Mounting -> Copying -> UnmountingAgain
//! -> WaitingForDisconnect -> Done`, or ends in `Timeout` when the drive never
//! appears.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{FlashError, Result};
use crate::models::{FirmwareSet, FlashPass, Half, ImageKind, pass_label};
use crate::platform::{DiskOperations, find_volume};
use crate::ui::instructions;

/// Smallest poll interval; zero would spin
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Steps of a single-half flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashState {
    WaitingForVolume,
    Unmounting,
    Mounting,
    Copying,
    UnmountingAgain,
    WaitingForDisconnect,
    Done,
    Timeout,
}

/// Settings the sequencer needs from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct SequencerSettings {
    pub volume_token: String,
    pub mount_dir: PathBuf,
    pub filesystem: String,
    pub fallback_device: Option<String>,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    /// Skip the printed setup instructions
    pub unattended: bool,
}

impl SequencerSettings {
    pub fn from_config(config: &AppConfig, unattended: bool) -> Self {
        Self {
            volume_token: config.device.volume_token.clone(),
            mount_dir: config.paths.mount_dir.clone(),
            filesystem: config.device.filesystem.clone(),
            fallback_device: config.device.fallback_device.clone(),
            wait_timeout: config.wait_timeout(),
            poll_interval: config.poll_interval().max(MIN_POLL_INTERVAL),
            unattended,
        }
    }
}

/// Drives the per-half flashing procedure
pub struct FlashSequencer<D: DiskOperations> {
    disk: D,
    settings: SequencerSettings,
}

impl<D: DiskOperations> FlashSequencer<D> {
    pub fn new(disk: D, settings: SequencerSettings) -> Self {
        Self { disk, settings }
    }

    pub fn disk(&self) -> &D {
        &self.disk
    }

    fn enter(&self, label: &str, state: FlashState) {
        log::debug!("[{}] {:?}", label, state);
    }

    /// Flash `file` onto one half
    pub async fn flash_half(&self, file: &Path, half: Half, image: ImageKind) -> Result<FlashPass> {
        let label = pass_label(half, image);
        let token = &self.settings.volume_token;

        if !file.is_file() {
            return Err(FlashError::MissingFirmware {
                dir: file.parent().map(Path::to_path_buf).unwrap_or_default(),
                detail: format!("{} does not exist", file.display()),
            });
        }

        if !self.settings.unattended {
            instructions::print_setup_instructions(
                &label,
                half,
                token,
                self.settings.wait_timeout.as_secs(),
            );
        }

        self.enter(&label, FlashState::WaitingForVolume);
        let Some(mount_point) = self.wait_for_volume().await? else {
            self.enter(&label, FlashState::Timeout);
            instructions::print_alternate_bootloader_procedure(token);
            return Err(FlashError::VolumeTimeout {
                token: token.clone(),
                seconds: self.settings.wait_timeout.as_secs(),
            });
        };
        log::debug!("{} connected: {}", label, mount_point.display());
        instructions::print_volume_connected(&mount_point);

        let device = self.resolve_device(&mount_point).await?;

        if !self.disk.refresh_privileges().await {
            log::warn!("Could not refresh sudo credentials");
        }

        self.enter(&label, FlashState::Unmounting);
        self.unmount_volume(&mount_point).await?;

        self.enter(&label, FlashState::Mounting);
        let mount_dir = &self.settings.mount_dir;
        tokio::fs::create_dir_all(mount_dir).await?;
        let mounted = self.disk.mount(&device, mount_dir).await;
        if mounted.failed() {
            return Err(FlashError::Mount {
                device,
                mount_dir: mount_dir.clone(),
                filesystem: self.settings.filesystem.clone(),
                detail: mounted.detail(),
            });
        }

        self.enter(&label, FlashState::Copying);
        let copied = self.disk.copy_firmware(file, mount_dir).await?;
        log::debug!("Copied {} to {}", file.display(), copied.display());
        instructions::print_flashed(&label);

        self.enter(&label, FlashState::UnmountingAgain);
        let unmounted = self.disk.unmount(mount_dir, false).await;
        if unmounted.failed() {
            // The device reboots on its own once the image lands
            log::debug!("Unmount after copy: {}", unmounted.detail());
        }

        self.enter(&label, FlashState::WaitingForDisconnect);
        instructions::print_waiting_for_disconnect(token);
        self.wait_for_disconnect().await?;
        instructions::print_disconnected();
        instructions::print_method_b_hint();

        self.enter(&label, FlashState::Done);
        Ok(FlashPass {
            half,
            image,
            file: file.to_path_buf(),
        })
    }

    /// Right half, then left half
    pub async fn flash_all(&self, firmware: &FirmwareSet) -> Result<Vec<FlashPass>> {
        let mut passes = Vec::with_capacity(2);

        instructions::print_banner("📋 Flashing the right half");
        passes.push(
            self.flash_half(&firmware.right, Half::Right, ImageKind::Main)
                .await?,
        );

        instructions::print_blank_line();
        instructions::print_banner("📋 Flashing the left half");
        passes.push(
            self.flash_half(&firmware.left, Half::Left, ImageKind::Main)
                .await?,
        );

        instructions::print_post_flash_help();
        Ok(passes)
    }

    /// Wipe bluetooth pairings on both halves, then flash the main firmware.
    ///
    /// Both halves must be reset before either gets the main image, otherwise
    /// stale pairing data desynchronizes the split link.
    pub async fn clear_btpairs(&self, firmware: &FirmwareSet) -> Result<Vec<FlashPass>> {
        if firmware.reset.is_none() {
            return Err(missing_reset_image(firmware));
        }

        instructions::print_btclear_warning();

        let plan = [
            ("Reset right half", Half::Right, ImageKind::SettingsReset),
            ("Reset left half", Half::Left, ImageKind::SettingsReset),
            ("Main firmware, right half", Half::Right, ImageKind::Main),
            ("Main firmware, left half", Half::Left, ImageKind::Main),
        ];

        let total = plan.len();
        let mut passes = Vec::with_capacity(total);
        for (step, (title, half, image)) in plan.into_iter().enumerate() {
            let file = firmware
                .image_for(half, image)
                .ok_or_else(|| missing_reset_image(firmware))?;
            if step == 2 {
                instructions::print_pairings_cleared();
            }
            instructions::print_blank_line();
            instructions::print_banner(&format!("📋 STEP {}/{}: {}", step + 1, total, title));
            passes.push(self.flash_half(file, half, image).await?);
        }

        instructions::print_btclear_complete();
        instructions::print_post_flash_help();
        Ok(passes)
    }

    async fn wait_for_volume(&self) -> Result<Option<PathBuf>> {
        let timeout = self.settings.wait_timeout;
        let interval = self.settings.poll_interval;
        let mut elapsed = Duration::ZERO;

        while elapsed < timeout {
            let volumes = self.disk.list_volumes().await?;
            if let Some(volume) = find_volume(&volumes, &self.settings.volume_token) {
                instructions::print_blank_line();
                return Ok(Some(volume.clone()));
            }

            instructions::print_countdown((timeout - elapsed).as_secs());
            tokio::time::sleep(interval).await;
            elapsed += interval;
        }

        Ok(None)
    }

    async fn wait_for_disconnect(&self) -> Result<()> {
        loop {
            let volumes = self.disk.list_volumes().await?;
            if find_volume(&volumes, &self.settings.volume_token).is_none() {
                return Ok(());
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    async fn resolve_device(&self, mount_point: &Path) -> Result<String> {
        if let Some(device) = self.disk.resolve_device(mount_point).await {
            log::debug!("{} is backed by /dev/{}", mount_point.display(), device);
            return Ok(device);
        }

        match &self.settings.fallback_device {
            Some(fallback) => {
                log::warn!(
                    "Could not resolve the device for {}, using configured fallback /dev/{}",
                    mount_point.display(),
                    fallback
                );
                Ok(fallback.clone())
            }
            None => Err(FlashError::DeviceResolution {
                mount_point: mount_point.to_path_buf(),
            }),
        }
    }

    async fn unmount_volume(&self, mount_point: &Path) -> Result<()> {
        let normal = self.disk.unmount(mount_point, false).await;
        if normal.success {
            return Ok(());
        }

        log::debug!(
            "Normal unmount of {} failed: {}",
            mount_point.display(),
            normal.detail()
        );
        instructions::print_forced_unmount_attempt(&normal.detail());
        let forced = self.disk.unmount(mount_point, true).await;
        if forced.failed() {
            return Err(FlashError::Unmount {
                mount_point: mount_point.to_path_buf(),
                detail: forced.detail(),
            });
        }

        instructions::print_forced_unmount_succeeded();
        Ok(())
    }
}

fn missing_reset_image(firmware: &FirmwareSet) -> FlashError {
    FlashError::MissingFirmware {
        dir: firmware
            .left
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        detail: "no settings reset image".to_string(),
    }
}
