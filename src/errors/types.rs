//! Custom error types for sofle-flash

use std::fmt;
use std::path::PathBuf;

/// Main error type for firmware download and flashing operations
#[derive(Debug)]
pub enum FlashError {
    /// Configuration file could not be read or parsed
    Config(String),
    /// A required external tool is not installed
    ToolMissing { tool: String, install_hint: String },
    /// An external tool is installed but not logged in
    NotAuthenticated { tool: String, login_hint: String },
    /// The CI service returned no successful run for the workflow
    NoSuccessfulRun { repo: String, workflow: String },
    /// An external command failed in a way the caller cannot recover from
    Command { program: String, detail: String },
    /// The sudo password was rejected after an interactive prompt
    Credential(String),
    /// Required firmware files are missing from the download directory
    MissingFirmware { dir: PathBuf, detail: String },
    /// The bootloader volume never appeared
    VolumeTimeout { token: String, seconds: u64 },
    /// The block device behind a mounted volume could not be determined
    DeviceResolution { mount_point: PathBuf },
    /// Both the normal and the forced unmount failed
    Unmount { mount_point: PathBuf, detail: String },
    /// Mounting the bootloader device failed
    Mount {
        device: String,
        mount_dir: PathBuf,
        filesystem: String,
        detail: String,
    },
    /// The user pressed Ctrl-C
    Interrupted,
    /// General I/O errors
    Io(std::io::Error),
    /// Serialization errors
    Serialization(String),
}

impl FlashError {
    /// Suggested manual remedy printed after the diagnostic
    pub fn remedy(&self) -> Option<String> {
        match self {
            FlashError::Config(_) => {
                Some("Check the TOML syntax or remove the file to use defaults".to_string())
            }
            FlashError::ToolMissing { install_hint, .. } => {
                Some(format!("Install it: {}", install_hint))
            }
            FlashError::NotAuthenticated { login_hint, .. } => {
                Some(format!("Run: {}", login_hint))
            }
            FlashError::NoSuccessfulRun { repo, .. } => Some(format!(
                "Check the Actions tab of https://github.com/{} for a green build",
                repo
            )),
            FlashError::Command { .. } => None,
            FlashError::Credential(_) => {
                Some("Run again and enter the password of an administrator account".to_string())
            }
            FlashError::MissingFirmware { .. } => {
                Some("Download the firmware first: sofle-flash download".to_string())
            }
            FlashError::VolumeTimeout { .. } => Some(
                "Enter the bootloader with method B above, then run the command again".to_string(),
            ),
            FlashError::DeviceResolution { mount_point } => Some(format!(
                "Find the device with `df {}` and set device.fallback_device in the config",
                mount_point.display()
            )),
            FlashError::Unmount { mount_point, .. } => Some(format!(
                "Try manually: sudo diskutil unmount force {}",
                mount_point.display()
            )),
            FlashError::Mount {
                device,
                mount_dir,
                filesystem,
                ..
            } => Some(format!(
                "Try manually: sudo mount -t {} /dev/{} {}",
                filesystem,
                device,
                mount_dir.display()
            )),
            FlashError::Interrupted | FlashError::Io(_) | FlashError::Serialization(_) => None,
        }
    }
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FlashError::ToolMissing { tool, .. } => write!(f, "{} is not installed", tool),
            FlashError::NotAuthenticated { tool, .. } => write!(f, "Not logged in to {}", tool),
            FlashError::NoSuccessfulRun { repo, workflow } => write!(
                f,
                "No successful run of workflow {} found in {}",
                workflow, repo
            ),
            FlashError::Command { program, detail } => {
                write!(f, "Command `{}` failed: {}", program, detail)
            }
            FlashError::Credential(msg) => write!(f, "Credential error: {}", msg),
            FlashError::MissingFirmware { dir, detail } => {
                write!(f, "Firmware not found in {}: {}", dir.display(), detail)
            }
            FlashError::VolumeTimeout { token, seconds } => write!(
                f,
                "Timed out after {} s waiting for the {} volume",
                seconds, token
            ),
            FlashError::DeviceResolution { mount_point } => write!(
                f,
                "Could not resolve the block device for {}",
                mount_point.display()
            ),
            FlashError::Unmount {
                mount_point,
                detail,
            } => write!(
                f,
                "Forced unmount of {} failed: {}",
                mount_point.display(),
                detail
            ),
            FlashError::Mount {
                device,
                mount_dir,
                detail,
                ..
            } => write!(
                f,
                "Mounting /dev/{} at {} failed: {}",
                device,
                mount_dir.display(),
                detail
            ),
            FlashError::Interrupted => write!(f, "Interrupted by user"),
            FlashError::Io(err) => write!(f, "I/O error: {}", err),
            FlashError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for FlashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlashError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FlashError {
    fn from(err: std::io::Error) -> Self {
        FlashError::Io(err)
    }
}

impl From<serde_json::Error> for FlashError {
    fn from(err: serde_json::Error) -> Self {
        FlashError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for FlashError {
    fn from(err: toml::de::Error) -> Self {
        FlashError::Config(err.to_string())
    }
}

/// Result type alias for sofle-flash operations
pub type Result<T> = std::result::Result<T, FlashError>;
