//! Fetch the latest firmware build from CI into the download directory

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::errors::{FlashError, Result};
use crate::models::{VersionDescriptor, short_commit};
use crate::remote::CiClient;

/// Extension of the firmware images produced by the build
pub const FIRMWARE_EXTENSION: &str = "uf2";

/// Result of [`FirmwareFetcher::download`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The local descriptor already names the remote commit; nothing was touched
    UpToDate {
        remote: VersionDescriptor,
        local: VersionDescriptor,
    },
    /// Artifacts were downloaded and the descriptor replaced
    Downloaded {
        descriptor: VersionDescriptor,
        files: Vec<PathBuf>,
    },
}

/// Downloads firmware artifacts and tracks which build is on disk
pub struct FirmwareFetcher<C: CiClient> {
    client: C,
    repo: String,
    workflow: String,
    download_dir: PathBuf,
    version_file: PathBuf,
}

impl<C: CiClient> FirmwareFetcher<C> {
    pub fn new(client: C, config: &AppConfig) -> Self {
        Self {
            client,
            repo: config.github.repo.clone(),
            workflow: config.github.workflow.clone(),
            download_dir: config.paths.download_dir.clone(),
            version_file: config.version_file(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Describe the most recent successful build, including its tag if one exists
    pub async fn fetch_remote_descriptor(&self) -> Result<VersionDescriptor> {
        self.client.ensure_ready().await?;

        let run = self
            .client
            .latest_successful_run(&self.repo, &self.workflow)
            .await?
            .ok_or_else(|| FlashError::NoSuccessfulRun {
                repo: self.repo.clone(),
                workflow: self.workflow.clone(),
            })?;

        let tag = match self.client.tag_for_commit(&self.repo, &run.head_sha).await {
            Ok(tag) => tag,
            Err(e) => {
                log::debug!("Tag lookup for {} failed: {}", run.head_sha, e);
                None
            }
        };

        Ok(VersionDescriptor {
            run_id: run.database_id,
            commit_short: short_commit(&run.head_sha),
            commit: run.head_sha,
            branch: run.head_branch,
            build_date: run.created_at,
            commit_message: run.display_title,
            tag,
            download_date: None,
        })
    }

    /// Download the latest build unless it is already on disk (or `force` is set)
    pub async fn download(&self, force: bool) -> Result<DownloadOutcome> {
        let remote = self.fetch_remote_descriptor().await?;
        self.download_run(remote, force).await
    }

    /// Second half of [`download`](Self::download) for an already fetched descriptor
    pub async fn download_run(
        &self,
        remote: VersionDescriptor,
        force: bool,
    ) -> Result<DownloadOutcome> {
        if !force {
            if let Some(local) = self.local_descriptor_lenient() {
                if local.same_commit(&remote) {
                    log::debug!("Commit {} already downloaded", remote.commit_short);
                    return Ok(DownloadOutcome::UpToDate { remote, local });
                }
            }
        }

        if self.download_dir.exists() {
            fs::remove_dir_all(&self.download_dir)?;
        }
        fs::create_dir_all(&self.download_dir)?;

        log::info!("📦 Downloading artifacts of run {}...", remote.run_id);
        self.client
            .download_artifacts(&self.repo, remote.run_id, &self.download_dir)
            .await?;

        flatten_firmware(&self.download_dir)?;
        remove_empty_dirs(&self.download_dir)?;

        let mut descriptor = remote;
        descriptor.download_date = Some(chrono::Local::now());
        descriptor.save(&self.version_file)?;

        let files = list_firmware(&self.download_dir)?;
        Ok(DownloadOutcome::Downloaded { descriptor, files })
    }

    /// The persisted descriptor, `None` if nothing was downloaded yet
    pub fn show_version(&self) -> Result<Option<VersionDescriptor>> {
        VersionDescriptor::load(&self.version_file)
    }

    fn local_descriptor_lenient(&self) -> Option<VersionDescriptor> {
        match VersionDescriptor::load(&self.version_file) {
            Ok(local) => local,
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable {}: {}",
                    self.version_file.display(),
                    e
                );
                None
            }
        }
    }
}

fn is_firmware(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(FIRMWARE_EXTENSION))
            .unwrap_or(false)
}

/// Move firmware files from artifact subdirectories up to `dir`
pub fn flatten_firmware(dir: &Path) -> Result<()> {
    let mut nested = Vec::new();
    collect_nested_firmware(dir, dir, &mut nested)?;

    for path in nested {
        if let Some(name) = path.file_name() {
            let target = dir.join(name);
            log::debug!("Moving {} -> {}", path.display(), target.display());
            fs::rename(&path, &target)?;
        }
    }
    Ok(())
}

fn collect_nested_firmware(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_nested_firmware(root, &path, out)?;
        } else if dir != root && is_firmware(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Remove directories under `dir` left empty after flattening. `dir` itself stays.
pub fn remove_empty_dirs(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            remove_empty_dirs(&path)?;
            if fs::read_dir(&path)?.next().is_none() {
                fs::remove_dir(&path)?;
            }
        }
    }
    Ok(())
}

/// Top-level firmware files in `dir`, sorted by name
pub fn list_firmware(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_firmware(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
