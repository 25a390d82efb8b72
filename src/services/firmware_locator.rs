//! Locate downloaded firmware files by name pattern

use std::path::{Path, PathBuf};

use crate::config::FirmwareConfig;
use crate::errors::{FlashError, Result};
use crate::models::FirmwareSet;

/// Resolve the left, right and optional reset images in `download_dir`.
///
/// Both halves are required; a missing reset image only disables `btclear`.
pub fn find_firmware(download_dir: &Path, patterns: &FirmwareConfig) -> Result<FirmwareSet> {
    let left = first_match(download_dir, &patterns.left_pattern)?;
    let right = first_match(download_dir, &patterns.right_pattern)?;
    let reset = first_match(download_dir, &patterns.reset_pattern)?;

    let missing: Vec<&str> = [
        (left.is_none(), patterns.left_pattern.as_str()),
        (right.is_none(), patterns.right_pattern.as_str()),
    ]
    .into_iter()
    .filter_map(|(is_missing, pattern)| is_missing.then_some(pattern))
    .collect();

    match (left, right) {
        (Some(left), Some(right)) => {
            log::debug!(
                "Firmware: left={} right={} reset={:?}",
                left.display(),
                right.display(),
                reset
            );
            Ok(FirmwareSet { left, right, reset })
        }
        _ => Err(FlashError::MissingFirmware {
            dir: download_dir.to_path_buf(),
            detail: format!("no file matches {}", missing.join(", ")),
        }),
    }
}

/// Alphabetically first file in `dir` matching `pattern`
fn first_match(dir: &Path, pattern: &str) -> Result<Option<PathBuf>> {
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_dir).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let paths = glob::glob(&full_pattern)
        .map_err(|e| FlashError::Config(format!("invalid firmware pattern {}: {}", pattern, e)))?;

    let mut matches: Vec<PathBuf> = paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    Ok(matches.into_iter().next())
}
