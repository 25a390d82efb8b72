//! Disk operations used while flashing
//!
//! The flashing sequencer only talks to [`DiskOperations`]; the macOS
//! implementation drives `diskutil`, `mount` and `df`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::utils::CommandOutput;

pub mod macos;

pub use macos::DiskutilOperations;

/// Volume and mount handling for the bootloader drive
#[async_trait]
pub trait DiskOperations: Send + Sync {
    /// Currently mounted volumes under the volumes root
    async fn list_volumes(&self) -> Result<Vec<PathBuf>>;

    /// Block device name (without `/dev/`) backing `mount_point`
    async fn resolve_device(&self, mount_point: &Path) -> Option<String>;

    /// Extend cached privileges before the privileged steps
    async fn refresh_privileges(&self) -> bool;

    /// Unmount `path`, optionally forced
    async fn unmount(&self, path: &Path, force: bool) -> CommandOutput;

    /// Mount `/dev/<device>` read-write at `mount_dir`
    async fn mount(&self, device: &str, mount_dir: &Path) -> CommandOutput;

    /// Copy `file` into `mount_dir`, returning the destination path
    async fn copy_firmware(&self, file: &Path, mount_dir: &Path) -> Result<PathBuf>;
}

/// First volume whose name contains `token`, compared case-insensitively
pub fn find_volume<'a>(volumes: &'a [PathBuf], token: &str) -> Option<&'a PathBuf> {
    let token = token.to_uppercase();
    volumes.iter().find(|volume| {
        volume
            .file_name()
            .map(|name| name.to_string_lossy().to_uppercase().contains(&token))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_volume_is_case_insensitive() {
        let volumes = vec![
            PathBuf::from("/Volumes/Macintosh HD"),
            PathBuf::from("/Volumes/NiceNano"),
        ];
        assert_eq!(
            find_volume(&volumes, "NICENANO"),
            Some(&PathBuf::from("/Volumes/NiceNano"))
        );
    }

    #[test]
    fn test_find_volume_ignores_parent_directories() {
        let volumes = vec![PathBuf::from("/NICENANO/Data")];
        assert_eq!(find_volume(&volumes, "NICENANO"), None);
    }
}
