//! Version descriptor of the currently downloaded firmware

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::errors::Result;

/// Placeholder shown when a build has no release tag
pub const NO_TAG: &str = "-";

/// Record of the CI run whose artifacts are in the download directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    /// CI run identifier
    pub run_id: u64,
    /// Full commit hash the run built
    pub commit: String,
    /// First 7 characters of the commit hash
    pub commit_short: String,
    /// Branch the run built
    pub branch: String,
    /// Run creation time as reported by the CI service
    pub build_date: String,
    /// Commit title / run display title
    pub commit_message: String,
    /// Release tag pointing at the commit, if any
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_tag"
    )]
    pub tag: Option<String>,
    /// When the artifacts were downloaded; unset on a freshly fetched remote descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_date: Option<DateTime<Local>>,
}

fn deserialize_tag<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.filter(|t| !t.is_empty() && t != NO_TAG))
}

/// Abbreviate a commit hash the way git does by default
pub fn short_commit(commit: &str) -> String {
    commit.chars().take(7).collect()
}

impl VersionDescriptor {
    /// Tag for display, `-` when absent
    pub fn tag_display(&self) -> &str {
        self.tag.as_deref().unwrap_or(NO_TAG)
    }

    /// Whether this descriptor names the same build as `other`
    pub fn same_commit(&self, other: &VersionDescriptor) -> bool {
        self.commit == other.commit
    }

    /// Read the persisted descriptor. `Ok(None)` when no file exists yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let descriptor = serde_json::from_str(&content)?;
        Ok(Some(descriptor))
    }

    /// Persist the descriptor as a whole-document replace: a sibling temp file
    /// is written, then renamed over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        log::debug!("Saved version descriptor to {}", path.display());
        Ok(())
    }
}
