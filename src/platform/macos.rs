//! macOS disk handling through `diskutil`, `mount` and `df`

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::DiskOperations;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::credentials::CredentialCache;
use crate::utils::{CommandOutput, run_command};

/// [`DiskOperations`] running privileged commands through the credential cache
#[derive(Debug)]
pub struct DiskutilOperations {
    credentials: CredentialCache,
    volumes_root: PathBuf,
    filesystem: String,
    mount_options: String,
}

impl DiskutilOperations {
    pub fn new(credentials: CredentialCache, config: &AppConfig) -> Self {
        Self {
            credentials,
            volumes_root: config.paths.volumes_root.clone(),
            filesystem: config.device.filesystem.clone(),
            mount_options: config.device.mount_options.clone(),
        }
    }
}

#[async_trait]
impl DiskOperations for DiskutilOperations {
    async fn list_volumes(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.volumes_root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut volumes = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            volumes.push(entry.path());
        }
        Ok(volumes)
    }

    async fn resolve_device(&self, mount_point: &Path) -> Option<String> {
        let output = run_command("df", &[], None).await;
        if output.failed() {
            log::debug!("df failed: {}", output.detail());
            return None;
        }
        parse_df_device(&output.stdout, mount_point)
    }

    async fn refresh_privileges(&self) -> bool {
        self.credentials.refresh().await
    }

    async fn unmount(&self, path: &Path, force: bool) -> CommandOutput {
        let path = path.to_string_lossy().into_owned();
        let mut args = vec!["unmount"];
        if force {
            args.push("force");
        }
        args.push(path.as_str());
        self.credentials.run_privileged("diskutil", &args).await
    }

    async fn mount(&self, device: &str, mount_dir: &Path) -> CommandOutput {
        let device_path = format!("/dev/{}", device);
        let mount_dir = mount_dir.to_string_lossy().into_owned();
        self.credentials
            .run_privileged(
                "mount",
                &[
                    "-t",
                    self.filesystem.as_str(),
                    "-o",
                    self.mount_options.as_str(),
                    device_path.as_str(),
                    mount_dir.as_str(),
                ],
            )
            .await
    }

    async fn copy_firmware(&self, file: &Path, mount_dir: &Path) -> Result<PathBuf> {
        let file_name = file.file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file: {}", file.display()),
            )
        })?;
        let destination = mount_dir.join(file_name);
        tokio::fs::copy(file, &destination).await?;
        Ok(destination)
    }
}

/// Find the `/dev/...` device of the `df` line whose mount point is exactly `mount_point`
pub fn parse_df_device(df_output: &str, mount_point: &Path) -> Option<String> {
    let mount_point = mount_point.to_string_lossy();
    df_output
        .lines()
        .filter(|line| line.starts_with("/dev/"))
        .find(|line| {
            line.strip_suffix(&*mount_point)
                .map(|rest| rest.ends_with(char::is_whitespace))
                .unwrap_or(false)
        })
        .and_then(|line| line.split_whitespace().next())
        .map(|device| device.trim_start_matches("/dev/").to_string())
}
