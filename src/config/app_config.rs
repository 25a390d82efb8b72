//! Application configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{FlashError, Result};

/// Name of the version descriptor inside the download directory
pub const VERSION_FILE_NAME: &str = ".version.json";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub repository and workflow producing the firmware
    pub github: GithubConfig,
    /// Local file system locations
    pub paths: PathsConfig,
    /// Bootloader volume handling
    pub device: DeviceConfig,
    /// Firmware file naming
    pub firmware: FirmwareConfig,
}

/// CI source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Repository in `owner/name` form
    pub repo: String,
    /// Workflow file name building the firmware
    pub workflow: String,
}

/// File system locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where artifacts are downloaded and flattened
    pub download_dir: PathBuf,
    /// Where the bootloader device is remounted for copying
    pub mount_dir: PathBuf,
    /// Cached sudo password (owner-only permissions)
    pub credential_file: PathBuf,
    /// OS directory listing mounted volumes
    pub volumes_root: PathBuf,
}

/// Bootloader volume configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Token contained in the bootloader volume name
    pub volume_token: String,
    /// File system type passed to `mount -t`
    pub filesystem: String,
    /// Options passed to `mount -o`
    pub mount_options: String,
    /// Device name used when the mount point cannot be resolved.
    /// Unset means resolution failure is fatal.
    pub fallback_device: Option<String>,
    /// How long to wait for the volume to appear
    pub wait_timeout_secs: u64,
    /// Interval between volume checks
    pub poll_interval_ms: u64,
}

/// Firmware file name patterns (glob syntax, relative to the download directory)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    pub left_pattern: String,
    pub right_pattern: String,
    pub reset_pattern: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: "mshegolev/zmk-config-s".to_string(),
            workflow: "build.yml".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            download_dir: home.join("Downloads").join("zmk-firmware"),
            mount_dir: home.join("nicenano_mount"),
            credential_file: home.join("pss_file"),
            volumes_root: PathBuf::from("/Volumes"),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            volume_token: "NICENANO".to_string(),
            filesystem: "msdos".to_string(),
            mount_options: "rw,auto,nobrowse".to_string(),
            fallback_device: None,
            wait_timeout_secs: 60,
            poll_interval_ms: 1000,
        }
    }
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            left_pattern: "sofle_left-*.uf2".to_string(),
            right_pattern: "sofle_right-*.uf2".to_string(),
            reset_pattern: "settings_reset-*.uf2".to_string(),
        }
    }
}

impl AppConfig {
    /// Default config file location: `<config dir>/sofle-flash/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sofle-flash").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is tried
    /// and built-in defaults are used when no file is there.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    log::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FlashError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Path of the persisted version descriptor
    pub fn version_file(&self) -> PathBuf {
        self.paths.download_dir.join(VERSION_FILE_NAME)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.device.wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.device.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_device() {
        let config = AppConfig::default();
        assert_eq!(config.github.repo, "mshegolev/zmk-config-s");
        assert_eq!(config.github.workflow, "build.yml");
        assert_eq!(config.device.volume_token, "NICENANO");
        assert_eq!(config.device.wait_timeout_secs, 60);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(config.device.fallback_device.is_none());
        assert!(config.version_file().ends_with("zmk-firmware/.version.json"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[github]
repo = "someone/zmk-config"

[device]
wait_timeout_secs = 90
fallback_device = "disk4"
"#,
        )
        .expect("Failed to parse partial config");

        assert_eq!(config.github.repo, "someone/zmk-config");
        assert_eq!(config.github.workflow, "build.yml");
        assert_eq!(config.device.wait_timeout_secs, 90);
        assert_eq!(config.device.fallback_device.as_deref(), Some("disk4"));
        assert_eq!(config.device.filesystem, "msdos");
        assert_eq!(config.firmware.left_pattern, "sofle_left-*.uf2");
    }

    #[test]
    fn test_explicit_missing_file_is_config_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/sofle-flash.toml")));
        assert!(matches!(result, Err(FlashError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result: std::result::Result<AppConfig, FlashError> =
            toml::from_str::<AppConfig>("[device]\nwait_timeout_secs = \"soon\"")
                .map_err(FlashError::from);
        assert!(matches!(result, Err(FlashError::Config(_))));
    }
}
