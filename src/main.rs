// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CROPS - Cropped Region Output Processing System
//!
//! Headless batch runner: loads a saved video-to-ROI session snapshot and
//! exports one cropped clip per ROI per video through ffmpeg.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crops::app::CropsApp;
use crops::io::media::FfmpegFrameSource;
use crops::io::transcode::FfmpegTranscoder;

/// Batch-crop videos to their saved regions of interest.
#[derive(Parser, Debug)]
#[command(name = "crops", version, about)]
struct Args {
    /// Session snapshot (JSON or YAML) mapping each video to its ROIs
    session: PathBuf,

    /// Folder that receives one subfolder of cropped clips per video
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra ffmpeg filter expressions appended after each crop filter
    #[arg(short, long)]
    filter: Option<String>,

    /// Path to the ffmpeg executable
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Write all ROIs as CSV rows (video,x1,y1,x2,y2) to this file and exit
    #[arg(long, value_name = "FILE")]
    export_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut app = CropsApp::new();
    app.import_settings(&args.session)
        .with_context(|| format!("failed to load session {}", args.session.display()))?;
    println!(
        "loaded {} videos, {} labeled, {} ROIs",
        app.store().video_count(),
        app.store().labeled_count(),
        app.store().total_roi_count()
    );

    if let Some(csv) = &args.export_csv {
        app.export_all_rois(csv)
            .with_context(|| format!("failed to write {}", csv.display()))?;
        println!("wrote {}", csv.display());
        return Ok(());
    }

    let output = args
        .output
        .context("an output folder is required (--output)")?;
    app.set_output_folder(output);
    if let Some(chain) = args.filter {
        app.set_filter_chain(chain);
        app.toggle_filter();
    }

    let transcoder = FfmpegTranscoder::new(&args.ffmpeg);
    let banner = transcoder
        .probe()
        .context("ffmpeg is not installed or not on the PATH")?;
    log::info!("using {banner}");

    let frames = FfmpegFrameSource::new(&args.ffmpeg);
    let report = app.crop_all(&transcoder, &frames, |completed, total| {
        println!("progress: {completed}/{total}");
    })?;

    println!(
        "done: {} succeeded, {} failed",
        report.succeeded,
        report.failed.len()
    );
    for failure in &report.failed {
        eprintln!(
            "failed: {} ROI {}: {}",
            failure.video.display(),
            failure.roi_index,
            failure.reason
        );
    }
    if report.succeeded == 0 && !report.failed.is_empty() {
        anyhow::bail!("every crop job failed");
    }
    Ok(())
}
