// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and video frames).
//!
//! This module handles loading image files and extracting single frames
//! from videos, converting them to rasters the render adapter can draw on.
//! Frame decoding lives behind the [`FrameSource`] trait; the shipped
//! implementation extracts frames through the ffmpeg executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbaImage;

use crate::error::{Error, Result};

/// The frame an editing session displays as its drawing background.
pub const REFERENCE_FRAME: u64 = 60;

/// A loaded raster image in RGBA8 form.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load an image file into RGBA8 pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .map_err(|e| Error::Parse(format!("failed to decode {}: {e}", path.display())))?
        .to_rgba8();
    Ok(LoadedImage {
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
    })
}

/// Opens videos for frame access.
pub trait FrameSource {
    /// Open one video. The returned handle owns whatever decoder state the
    /// backend needs; dropping it releases the video.
    fn open(&self, video: &Path) -> Result<Box<dyn VideoFrames>>;
}

/// One opened video.
pub trait VideoFrames {
    /// Decode the frame at `index`.
    fn frame(&mut self, index: u64) -> Result<RgbaImage>;
}

/// Fetch the reference frame an editing session draws against. Opened
/// once per session; the video is released again before this returns.
pub fn reference_frame(frames: &dyn FrameSource, video: &Path) -> Result<RgbaImage> {
    let mut opened = frames.open(video)?;
    opened.frame(REFERENCE_FRAME)
}

/// Frame source backed by the ffmpeg command-line executable.
pub struct FfmpegFrameSource {
    executable: PathBuf,
}

impl FfmpegFrameSource {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn open(&self, video: &Path) -> Result<Box<dyn VideoFrames>> {
        if !video.exists() {
            return Err(Error::Validation(format!(
                "video not found: {}",
                video.display()
            )));
        }
        Ok(Box::new(FfmpegVideo {
            executable: self.executable.clone(),
            video: video.to_path_buf(),
        }))
    }
}

struct FfmpegVideo {
    executable: PathBuf,
    video: PathBuf,
}

impl VideoFrames for FfmpegVideo {
    fn frame(&mut self, index: u64) -> Result<RgbaImage> {
        let scratch = tempfile::Builder::new()
            .prefix("crops-frame-")
            .suffix(".png")
            .tempfile()?;
        let result = Command::new(&self.executable)
            .arg("-y")
            .arg("-i")
            .arg(&self.video)
            .arg("-vf")
            .arg(format!("select=eq(n\\,{index})"))
            .arg("-vframes")
            .arg("1")
            .arg(scratch.path())
            .output()
            .map_err(Error::Io)?;
        if !result.status.success() {
            return Err(Error::Validation(format!(
                "frame {index} not found in {}",
                self.video.display()
            )));
        }
        let loaded = load_image(scratch.path())?;
        RgbaImage::from_raw(loaded.width, loaded.height, loaded.pixels).ok_or_else(|| {
            Error::Parse(format!(
                "frame {index} of {} decoded to a malformed raster",
                self.video.display()
            ))
        })
    }
}
