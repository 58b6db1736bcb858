// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-video ROI lists and the host-owned video map.
//!
//! A [`RoiCollection`] is the ordered list of rectangles for one video;
//! list order is display order (the 1-based index shown to the user).
//! The [`RoiStore`] maps each registered video to its collection and is
//! owned exclusively by the host application - editing sessions work on a
//! deep clone and only write back through an explicit save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::roi::Roi;
use crate::util::paths;

/// Ordered list of rectangles for one video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoiCollection {
    rois: Vec<Roi>,
}

impl RoiCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Roi> {
        self.rois.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Roi> {
        self.rois.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Roi> {
        self.rois.iter()
    }

    /// Append a committed rectangle. The draft flag is cleared: once a
    /// rectangle is in a collection it is no longer an in-progress draft.
    pub fn append(&mut self, mut roi: Roi) {
        roi.set_draft(false);
        self.rois.push(roi);
    }

    /// Remove the rectangle at `index`. Later entries close the gap.
    pub fn remove_at(&mut self, index: usize) -> Option<Roi> {
        if index < self.rois.len() {
            Some(self.rois.remove(index))
        } else {
            None
        }
    }

    /// Remove every rectangle whose index appears in `indices`, preserving
    /// the relative order of the survivors.
    pub fn remove_many(&mut self, indices: &[usize]) {
        let mut i = 0;
        self.rois.retain(|_| {
            let keep = !indices.contains(&i);
            i += 1;
            keep
        });
    }

    /// Replace the whole list.
    pub fn replace_all(&mut self, rois: Vec<Roi>) {
        self.rois = rois;
        for roi in &mut self.rois {
            roi.set_draft(false);
        }
    }

    /// Merge an imported list. With `replace` the existing list is
    /// overwritten, otherwise the imported entries are appended after it.
    /// Rejects the whole import (leaving the collection untouched) if any
    /// entry violates the normalization invariant.
    pub fn import_merge(&mut self, rois: Vec<Roi>, replace: bool) -> Result<()> {
        if let Some(bad) = rois.iter().position(|r| !r.is_consistent()) {
            return Err(Error::Validation(format!(
                "imported ROI {} has negative or inconsistent dimensions",
                bad + 1
            )));
        }
        if replace {
            self.replace_all(rois);
        } else {
            for roi in rois {
                self.append(roi);
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RoiCollection {
    type Item = &'a Roi;
    type IntoIter = std::slice::Iter<'a, Roi>;

    fn into_iter(self) -> Self::IntoIter {
        self.rois.iter()
    }
}

/// The host-owned map of registered videos to their ROI collections.
///
/// Keys are kept sorted so batch runs and exports walk the videos in a
/// deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoiStore {
    videos: BTreeMap<PathBuf, RoiCollection>,
}

impl RoiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a video with an empty collection. Rejects paths without a
    /// supported video extension.
    pub fn add_video(&mut self, video: &Path) -> Result<()> {
        if !paths::is_supported_video(video) {
            return Err(Error::Validation(format!(
                "{} is not a supported video file",
                video.display()
            )));
        }
        self.videos.entry(video.to_path_buf()).or_default();
        Ok(())
    }

    /// Drop a video and its ROI data.
    pub fn remove_video(&mut self, video: &Path) -> Option<RoiCollection> {
        self.videos.remove(video)
    }

    pub fn rois(&self, video: &Path) -> Option<&RoiCollection> {
        self.videos.get(video)
    }

    /// Overwrite one video's collection. This is the save boundary: the
    /// only way an editing session's changes reach the store.
    pub fn set_rois(&mut self, video: &Path, rois: RoiCollection) {
        self.videos.insert(video.to_path_buf(), rois);
    }

    pub fn contains(&self, video: &Path) -> bool {
        self.videos.contains_key(video)
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    /// Number of videos with at least one ROI.
    pub fn labeled_count(&self) -> usize {
        self.videos.values().filter(|rois| !rois.is_empty()).count()
    }

    /// Total ROI count across all videos.
    pub fn total_roi_count(&self) -> usize {
        self.videos.values().map(RoiCollection::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &RoiCollection)> {
        self.videos.iter().map(|(path, rois)| (path.as_path(), rois))
    }

    /// Validate every entry of a deserialized store: video keys must carry
    /// a supported extension and every rectangle must be normalized.
    pub fn validate(&self) -> Result<()> {
        for (video, rois) in &self.videos {
            if !paths::is_supported_video(video) {
                return Err(Error::Validation(format!(
                    "{} is not a supported video file",
                    video.display()
                )));
            }
            if let Some(bad) = rois.iter().position(|r| !r.is_consistent()) {
                return Err(Error::Validation(format!(
                    "ROI {} of {} has negative or inconsistent dimensions",
                    bad + 1,
                    video.display()
                )));
            }
        }
        Ok(())
    }
}
