// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Batch crop pipeline.
//!
//! Walks every video with a non-empty ROI list, builds one crop/filter job
//! per rectangle, and drives the transcoder synchronously. Progress is
//! reported through a callback after every job attempt; a failing job is
//! recorded and the batch continues, while a failure to create an output
//! directory aborts the whole run.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::media::FrameSource;
use crate::io::transcode::Transcoder;
use crate::models::collection::RoiStore;
use crate::models::roi::Roi;
use crate::util::paths;

/// Constant-rate-factor passed to the transcoder for every job.
pub const CRF_QUALITY: u32 = 22;

/// Hint text shown in an untouched filter field. Treated as no input.
pub const FILTER_PLACEHOLDER: &str = "hue=s=0";

/// The user-facing filter toggle and free-form filter expression text.
#[derive(Debug, Clone, Default)]
pub struct FilterSettings {
    pub enabled: bool,
    pub chain: String,
}

impl FilterSettings {
    /// The filter text that actually participates in the chain: trimmed,
    /// and only when filtering is enabled and the text is neither empty
    /// nor the untouched placeholder.
    pub fn effective_chain(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        let trimmed = self.chain.trim();
        if trimmed.is_empty() || trimmed == FILTER_PLACEHOLDER {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Enable filtering and append a preset expression unless the chain
    /// already contains it.
    pub fn add_preset(&mut self, expr: &str) {
        self.enabled = true;
        let trimmed = self.chain.trim();
        if trimmed.is_empty() || trimmed == FILTER_PLACEHOLDER {
            self.chain = expr.to_string();
        } else if !self.chain.contains(expr) {
            self.chain.push_str(", ");
            self.chain.push_str(expr);
        }
    }
}

/// Build the filter chain for one rectangle: the crop expression from its
/// normalized corners, then the user chain comma-joined after it.
pub fn filter_chain(roi: &Roi, filter: &FilterSettings) -> String {
    let min = roi.corner(0);
    let mut chain = format!(
        "crop={}:{}:{}:{}",
        roi.width(),
        roi.height(),
        min.x,
        min.y
    );
    if let Some(extra) = filter.effective_chain() {
        chain.push_str(", ");
        chain.push_str(extra);
    }
    chain
}

/// One (video, ROI) pair handed to the transcoder.
#[derive(Debug, Clone)]
pub struct CropJob {
    pub video: PathBuf,
    /// 1-based position of the rectangle in its video's list.
    pub roi_index: usize,
    pub rect: Roi,
    pub filter_chain: String,
    pub output: PathBuf,
}

/// A job that did not produce its output.
#[derive(Debug)]
pub struct JobFailure {
    pub video: PathBuf,
    pub roi_index: usize,
    pub reason: String,
}

/// Outcome of a whole batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: Vec<JobFailure>,
}

/// Batch-wide settings.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Folder that receives one subfolder of cropped clips per video.
    pub output_folder: PathBuf,
    pub filter: FilterSettings,
}

/// Run every crop job derived from the store.
///
/// Preconditions are checked before any work: at least one registered
/// video, at least one ROI somewhere, and a non-empty output folder.
/// Videos are processed in store order; each video's frame source stays
/// open while its jobs run and is released before the next video.
pub fn run_batch(
    store: &RoiStore,
    options: &BatchOptions,
    transcoder: &dyn Transcoder,
    frames: &dyn FrameSource,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<BatchReport> {
    if store.is_empty() {
        return Err(Error::Precondition("no videos selected".to_string()));
    }
    let total = store.total_roi_count();
    if total == 0 {
        return Err(Error::Precondition(
            "no regions of interest defined".to_string(),
        ));
    }
    if options.output_folder.as_os_str().is_empty() {
        return Err(Error::Precondition("no output folder chosen".to_string()));
    }

    let mut report = BatchReport::default();

    for (video, rois) in store.iter() {
        if rois.is_empty() {
            continue;
        }

        let source = match frames.open(video) {
            Ok(source) => source,
            Err(e) => {
                // The video cannot be read at all: fail its jobs and move on.
                log::warn!("skipping {}: {e}", video.display());
                for roi_index in 1..=rois.len() {
                    report.failed.push(JobFailure {
                        video: video.to_path_buf(),
                        roi_index,
                        reason: e.to_string(),
                    });
                    on_progress(report.succeeded, total);
                }
                continue;
            }
        };

        for (i, roi) in rois.iter().enumerate() {
            let job = prepare_job(video, i + 1, roi, options)?;
            match transcoder.run(&job.video, &job.filter_chain, CRF_QUALITY, &job.output) {
                Ok(()) => {
                    report.succeeded += 1;
                    log::info!(
                        "cropped {} ROI {} -> {}",
                        video.display(),
                        job.roi_index,
                        job.output.display()
                    );
                }
                Err(e) => {
                    log::warn!(
                        "crop of {} ROI {} failed: {e}",
                        video.display(),
                        job.roi_index
                    );
                    report.failed.push(JobFailure {
                        video: job.video,
                        roi_index: job.roi_index,
                        reason: e.to_string(),
                    });
                }
            }
            on_progress(report.succeeded, total);
        }

        drop(source);
    }

    log::info!(
        "batch finished: {} succeeded, {} failed",
        report.succeeded,
        report.failed.len()
    );
    Ok(report)
}

/// Build one job, creating the per-video output subfolder. A subfolder
/// that cannot be created is fatal to the whole run.
fn prepare_job(
    video: &Path,
    roi_index: usize,
    roi: &Roi,
    options: &BatchOptions,
) -> Result<CropJob> {
    let stem = paths::file_stem(video);
    let subfolder = options.output_folder.join(&stem);
    std::fs::create_dir_all(&subfolder).map_err(|e| {
        log::error!("cannot create {}: {e}", subfolder.display());
        Error::Io(e)
    })?;
    let output = subfolder.join(format!(
        "{stem}_{roi_index}_cropped.{}",
        paths::extension(video)
    ));
    Ok(CropJob {
        video: video.to_path_buf(),
        roi_index,
        rect: *roi,
        filter_chain: filter_chain(roi, &options.filter),
        output,
    })
}
