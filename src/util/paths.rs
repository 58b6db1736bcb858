// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Path utility functions.
//!
//! This module provides utilities for validating video paths and deriving
//! the name components used for per-video output folders.

use std::path::Path;

/// File extensions accepted as video input (matched case-insensitively).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

/// Whether the path carries a supported video extension.
pub fn is_supported_video(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => VIDEO_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate)),
        None => false,
    }
}

/// The file name without its extension, as a display string.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The file extension, falling back to `mp4` when the path has none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_video_extensions() {
        assert!(is_supported_video(Path::new("/data/clip.mp4")));
        assert!(is_supported_video(Path::new("CLIP.MP4")));
        assert!(!is_supported_video(Path::new("clip.mkv")));
        assert!(!is_supported_video(Path::new("clip")));
        assert!(!is_supported_video(Path::new(".mp4/dir")));
    }

    #[test]
    fn test_name_components() {
        let path = Path::new("/videos/session one/trial_3.mp4");
        assert_eq!(file_stem(path), "trial_3");
        assert_eq!(extension(path), "mp4");
        assert_eq!(extension(Path::new("trial_3")), "mp4");
    }
}
