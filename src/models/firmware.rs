//! Firmware images and the keyboard halves they are flashed to

use std::fmt;
use std::path::{Path, PathBuf};

/// One physical half of the split keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    Left,
    Right,
}

impl Half {
    /// Which way the power switch points when the half is ON
    pub fn power_on_direction(&self) -> &'static str {
        match self {
            Half::Left => "up ⬆️",
            Half::Right => "down ⬇️",
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Half::Left => write!(f, "left half"),
            Half::Right => write!(f, "right half"),
        }
    }
}

/// Kind of image written to a half
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// The operating keyboard firmware
    Main,
    /// Image that wipes stored bluetooth pairings
    SettingsReset,
}

/// Firmware files located in the download directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareSet {
    pub left: PathBuf,
    pub right: PathBuf,
    pub reset: Option<PathBuf>,
}

impl FirmwareSet {
    /// File to flash for `image` on `half`. `None` only for a missing reset image.
    pub fn image_for(&self, half: Half, image: ImageKind) -> Option<&Path> {
        match (image, half) {
            (ImageKind::Main, Half::Left) => Some(&self.left),
            (ImageKind::Main, Half::Right) => Some(&self.right),
            (ImageKind::SettingsReset, _) => self.reset.as_deref(),
        }
    }
}

/// A completed single-half flash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashPass {
    pub half: Half,
    pub image: ImageKind,
    pub file: PathBuf,
}

/// Human-readable label for a pass, e.g. `right half (reset)`
pub fn pass_label(half: Half, image: ImageKind) -> String {
    match image {
        ImageKind::Main => half.to_string(),
        ImageKind::SettingsReset => format!("{} (reset)", half),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_image_shared_by_both_halves() {
        let set = FirmwareSet {
            left: PathBuf::from("/fw/sofle_left-nice_nano_v2-zmk.uf2"),
            right: PathBuf::from("/fw/sofle_right-nice_nano_v2-zmk.uf2"),
            reset: Some(PathBuf::from("/fw/settings_reset-nice_nano_v2-zmk.uf2")),
        };
        assert_eq!(
            set.image_for(Half::Left, ImageKind::SettingsReset),
            set.image_for(Half::Right, ImageKind::SettingsReset)
        );
        assert_eq!(
            set.image_for(Half::Left, ImageKind::Main),
            Some(Path::new("/fw/sofle_left-nice_nano_v2-zmk.uf2"))
        );
    }

    #[test]
    fn test_pass_label() {
        assert_eq!(pass_label(Half::Right, ImageKind::Main), "right half");
        assert_eq!(
            pass_label(Half::Left, ImageKind::SettingsReset),
            "left half (reset)"
        );
    }
}
