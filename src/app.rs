// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Host application state.
//!
//! This module contains the host-side structure that owns the per-video
//! ROI map and coordinates between editing sessions, interchange files,
//! and the batch pipeline. Editing sessions never alias the map: they get
//! a deep clone and write back only through the save callback installed
//! here.

use std::path::{Path, PathBuf};

use crate::editor::session::EditorSession;
use crate::error::{Error, Result};
use crate::io::media::FrameSource;
use crate::io::serialization;
use crate::io::transcode::Transcoder;
use crate::models::collection::RoiStore;
use crate::pipeline::{self, BatchOptions, BatchReport, FilterSettings};

/// Owns everything that outlives a single editing session.
#[derive(Debug, Default)]
pub struct CropsApp {
    store: RoiStore,
    filter: FilterSettings,
    output_folder: Option<PathBuf>,
}

impl CropsApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &RoiStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterSettings {
        &self.filter
    }

    /// Register a video for labeling.
    pub fn add_video(&mut self, video: &Path) -> Result<()> {
        self.store.add_video(video)?;
        log::info!("added video {}", video.display());
        Ok(())
    }

    /// Drop a video and its ROI data.
    pub fn remove_video(&mut self, video: &Path) -> Result<()> {
        self.store
            .remove_video(video)
            .ok_or_else(|| Error::Validation(format!("{} is not in the video list", video.display())))?;
        log::info!("removed video {}", video.display());
        Ok(())
    }

    pub fn set_output_folder(&mut self, folder: impl Into<PathBuf>) {
        self.output_folder = Some(folder.into());
    }

    pub fn toggle_filter(&mut self) {
        self.filter.enabled = !self.filter.enabled;
    }

    pub fn set_filter_chain(&mut self, chain: impl Into<String>) {
        self.filter.chain = chain.into();
    }

    /// Enable filtering and append a preset expression (the Filter menu).
    pub fn filter_add(&mut self, expr: &str) {
        self.filter.add_preset(expr);
    }

    /// Open an editing session for one registered video. Saving inside the
    /// session writes the edited collection back into the store; the app
    /// is borrowed for the session's lifetime, so no other mutation can
    /// interleave with a live session.
    pub fn open_editor(&mut self, video: &Path) -> Result<EditorSession<'_>> {
        let initial = self
            .store
            .rois(video)
            .ok_or_else(|| Error::Validation(format!("{} is not in the video list", video.display())))?
            .clone();
        let key = video.to_path_buf();
        let store = &mut self.store;
        Ok(EditorSession::open(video, &initial, move |rois| {
            store.set_rois(&key, rois.clone());
        }))
    }

    /// Export the whole video map as a snapshot (JSON or YAML by extension).
    pub fn export_settings(&self, path: &Path) -> Result<()> {
        serialization::export_store(&self.store, path)
    }

    /// Replace the video map from a snapshot file.
    pub fn import_settings(&mut self, path: &Path) -> Result<()> {
        self.store = serialization::import_store(path)?;
        log::info!(
            "imported {} videos ({} ROIs) from {}",
            self.store.video_count(),
            self.store.total_roi_count(),
            path.display()
        );
        Ok(())
    }

    /// Write every ROI of every video as CSV rows for external analysis.
    pub fn export_all_rois(&self, path: &Path) -> Result<()> {
        serialization::export_csv(&self.store, path)
    }

    /// Run the batch crop pipeline over the saved map.
    pub fn crop_all(
        &self,
        transcoder: &dyn Transcoder,
        frames: &dyn FrameSource,
        on_progress: impl FnMut(usize, usize),
    ) -> Result<BatchReport> {
        let output_folder = self
            .output_folder
            .clone()
            .ok_or_else(|| Error::Precondition("no output folder chosen".to_string()))?;
        let options = BatchOptions {
            output_folder,
            filter: self.filter.clone(),
        };
        pipeline::run_batch(&self.store, &options, transcoder, frames, on_progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::session::{CloseOutcome, PointerEvent};
    use crate::io::media::VideoFrames;
    use crate::io::transcode::TranscodeError;
    use crate::models::roi::Point;
    use image::RgbaImage;

    struct NullTranscoder;

    impl Transcoder for NullTranscoder {
        fn run(
            &self,
            _input: &Path,
            _filter_chain: &str,
            _crf: u32,
            _output: &Path,
        ) -> std::result::Result<(), TranscodeError> {
            Ok(())
        }
    }

    struct FakeFrames;

    struct FakeVideo;

    impl VideoFrames for FakeVideo {
        fn frame(&mut self, _index: u64) -> Result<RgbaImage> {
            Ok(RgbaImage::new(4, 4))
        }
    }

    impl FrameSource for FakeFrames {
        fn open(&self, _video: &Path) -> Result<Box<dyn VideoFrames>> {
            Ok(Box::new(FakeVideo))
        }
    }

    #[test]
    fn editing_reaches_the_store_only_through_save() {
        let mut app = CropsApp::new();
        app.add_video(Path::new("clip.mp4")).unwrap();

        {
            let mut session = app.open_editor(Path::new("clip.mp4")).unwrap();
            session.handle_pointer(PointerEvent::down(10, 10));
            session.handle_pointer(PointerEvent::moved(50, 60));
            session.handle_pointer(PointerEvent::up(50, 60));
            assert_eq!(session.close(), CloseOutcome::UnsavedChanges);
            session.save();
        }

        let rois = app.store().rois(Path::new("clip.mp4")).unwrap();
        assert_eq!(rois.len(), 1);
        assert_eq!(rois.get(0).unwrap().corner(1), Point::new(50, 60));
    }

    #[test]
    fn discarded_sessions_leave_the_store_untouched() {
        let mut app = CropsApp::new();
        app.add_video(Path::new("clip.mp4")).unwrap();

        {
            let mut session = app.open_editor(Path::new("clip.mp4")).unwrap();
            session.handle_pointer(PointerEvent::down(10, 10));
            session.handle_pointer(PointerEvent::up(20, 20));
            assert_eq!(session.close(), CloseOutcome::UnsavedChanges);
            session.close_discarding();
        }

        assert!(app.store().rois(Path::new("clip.mp4")).unwrap().is_empty());
    }

    #[test]
    fn open_editor_rejects_unregistered_videos() {
        let mut app = CropsApp::new();
        assert!(matches!(
            app.open_editor(Path::new("missing.mp4")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn crop_all_requires_an_output_folder() {
        let mut app = CropsApp::new();
        app.add_video(Path::new("clip.mp4")).unwrap();
        let result = app.crop_all(&NullTranscoder, &FakeFrames, |_, _| {});
        assert!(matches!(result, Err(Error::Precondition(_))));
    }

    #[test]
    fn filter_presets_accumulate_into_the_chain() {
        let mut app = CropsApp::new();
        app.filter_add("hue=s=0");
        app.filter_add("eq=contrast=2:brightness=0.8");
        assert!(app.filter().enabled);
        assert_eq!(
            app.filter().effective_chain(),
            Some("hue=s=0, eq=contrast=2:brightness=0.8")
        );

        app.toggle_filter();
        assert_eq!(app.filter().effective_chain(), None);
    }

    #[test]
    fn settings_round_trip_through_snapshot_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut app = CropsApp::new();
        app.add_video(Path::new("clip.mp4")).unwrap();
        {
            let mut session = app.open_editor(Path::new("clip.mp4")).unwrap();
            session.handle_pointer(PointerEvent::down(10, 10));
            session.handle_pointer(PointerEvent::up(50, 60));
            session.save();
        }
        app.export_settings(&path).unwrap();

        let mut restored = CropsApp::new();
        restored.import_settings(&path).unwrap();
        assert_eq!(restored.store(), app.store());
    }
}
