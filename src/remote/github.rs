//! GitHub Actions access through the `gh` command-line client

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use crate::errors::{FlashError, Result};
use crate::utils::process::{is_tool_available, run_command};

/// A completed workflow run as listed by `gh run list --json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    pub database_id: u64,
    pub head_sha: String,
    pub created_at: String,
    pub head_branch: String,
    pub display_title: String,
}

/// Operations needed from the CI service
#[async_trait]
pub trait CiClient: Send + Sync {
    /// Fail unless the client is installed and authenticated
    async fn ensure_ready(&self) -> Result<()>;

    /// Most recent successful run of `workflow`, if any
    async fn latest_successful_run(
        &self,
        repo: &str,
        workflow: &str,
    ) -> Result<Option<WorkflowRun>>;

    /// Release tag pointing at `commit`, if any
    async fn tag_for_commit(&self, repo: &str, commit: &str) -> Result<Option<String>>;

    /// Download every artifact of `run_id` into `dest`
    async fn download_artifacts(&self, repo: &str, run_id: u64, dest: &Path) -> Result<()>;
}

/// [`CiClient`] backed by the GitHub CLI
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            program: "gh".to_string(),
        }
    }
}

impl GhCli {
    pub fn new() -> Self {
        Self::default()
    }

    fn command_error(&self, detail: String) -> FlashError {
        FlashError::Command {
            program: self.program.clone(),
            detail,
        }
    }
}

#[async_trait]
impl CiClient for GhCli {
    async fn ensure_ready(&self) -> Result<()> {
        if !is_tool_available(&self.program) {
            return Err(FlashError::ToolMissing {
                tool: "GitHub CLI (gh)".to_string(),
                install_hint: "brew install gh".to_string(),
            });
        }

        let status = run_command(&self.program, &["auth", "status"], None).await;
        if status.failed() {
            log::debug!("gh auth status: {}", status.detail());
            return Err(FlashError::NotAuthenticated {
                tool: "GitHub CLI".to_string(),
                login_hint: "gh auth login".to_string(),
            });
        }
        Ok(())
    }

    async fn latest_successful_run(
        &self,
        repo: &str,
        workflow: &str,
    ) -> Result<Option<WorkflowRun>> {
        let output = run_command(
            &self.program,
            &[
                "run",
                "list",
                "--repo",
                repo,
                "--workflow",
                workflow,
                "--status",
                "success",
                "--limit",
                "1",
                "--json",
                "databaseId,headSha,createdAt,headBranch,displayTitle",
            ],
            None,
        )
        .await;

        if output.failed() {
            return Err(self.command_error(output.detail()));
        }
        parse_run_list(&output.stdout)
    }

    async fn tag_for_commit(&self, repo: &str, commit: &str) -> Result<Option<String>> {
        let endpoint = format!("repos/{}/tags", repo);
        let jq = format!(".[] | select(.commit.sha == \"{}\") | .name", commit);
        let output = run_command(&self.program, &["api", &endpoint, "--jq", &jq], None).await;

        if output.failed() {
            return Err(self.command_error(output.detail()));
        }
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string))
    }

    async fn download_artifacts(&self, repo: &str, run_id: u64, dest: &Path) -> Result<()> {
        let run_id = run_id.to_string();
        let dest = dest.to_string_lossy().into_owned();
        let output = run_command(
            &self.program,
            &[
                "run",
                "download",
                run_id.as_str(),
                "--repo",
                repo,
                "--dir",
                dest.as_str(),
            ],
            None,
        )
        .await;

        if output.failed() {
            return Err(self.command_error(output.detail()));
        }
        Ok(())
    }
}

/// Parse `gh run list --json` output, taking the first run
pub fn parse_run_list(json: &str) -> Result<Option<WorkflowRun>> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    let runs: Vec<WorkflowRun> = serde_json::from_str(json)?;
    Ok(runs.into_iter().next())
}
