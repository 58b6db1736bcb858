// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! External transcoder invocation.
//!
//! The batch pipeline only speaks to the [`Transcoder`] trait: one
//! declarative crop/filter job in, a result out. [`FfmpegTranscoder`] is
//! the shipped implementation, shelling out to the ffmpeg executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Failure of a single transcode job.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoder process could not be launched at all.
    #[error("failed to launch transcoder: {0}")]
    Launch(#[source] std::io::Error),

    /// The transcoder ran but reported failure.
    #[error("transcoder failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },
}

/// Accepts one crop/filter job and produces the output file.
pub trait Transcoder {
    /// Transcode `input` to `output`, applying `filter_chain` with the
    /// given constant-rate-factor quality. Blocks until the job finishes.
    fn run(
        &self,
        input: &Path,
        filter_chain: &str,
        crf: u32,
        output: &Path,
    ) -> Result<(), TranscodeError>;
}

/// Transcoder backed by the ffmpeg command-line executable.
pub struct FfmpegTranscoder {
    executable: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Check that the executable is present and runnable; returns the
    /// first line of its version banner.
    pub fn probe(&self) -> Result<String, TranscodeError> {
        let output = Command::new(&self.executable)
            .arg("-version")
            .output()
            .map_err(TranscodeError::Launch)?;
        if !output.status.success() {
            return Err(TranscodeError::Failed {
                status: output.status.to_string(),
                stderr: stderr_excerpt(&output.stderr),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().to_string())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn run(
        &self,
        input: &Path,
        filter_chain: &str,
        crf: u32,
        output: &Path,
    ) -> Result<(), TranscodeError> {
        log::debug!(
            "ffmpeg -i {} -vf '{}' -> {}",
            input.display(),
            filter_chain,
            output.display()
        );
        let result = Command::new(&self.executable)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vf")
            .arg(filter_chain)
            .arg("-vcodec")
            .arg("libx264")
            .arg("-crf")
            .arg(crf.to_string())
            .arg(output)
            .output()
            .map_err(TranscodeError::Launch)?;
        if !result.status.success() {
            return Err(TranscodeError::Failed {
                status: result.status.to_string(),
                stderr: stderr_excerpt(&result.stderr),
            });
        }
        Ok(())
    }
}

/// The tail of a stderr stream, enough to show ffmpeg's actual complaint
/// without dumping its whole banner into an error message.
fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail = lines.len().saturating_sub(4);
    lines[tail..].join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_reports_launch_failure_for_missing_executable() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/path/to/ffmpeg");
        assert!(matches!(
            transcoder.probe(),
            Err(TranscodeError::Launch(_))
        ));
    }

    #[test]
    fn stderr_excerpt_keeps_the_tail() {
        let noise = b"line1\nline2\n\nline3\nline4\nline5\nline6\n";
        let excerpt = stderr_excerpt(noise);
        assert_eq!(excerpt, "line3 | line4 | line5 | line6");
        assert_eq!(stderr_excerpt(b""), "");
    }
}
