// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The pointer-driven editing state machine.
//!
//! An [`EditorSession`] owns a deep-cloned working copy of one video's ROI
//! collection and mutates it in response to pointer and keyboard events.
//! Edits only reach the host's store when the session is explicitly saved;
//! closing a dirty session is a confirmation gate, not an error.

use std::path::{Path, PathBuf};

use crate::editor::hit::{self, AxisMask, Hit};
use crate::editor::selection::Selection;
use crate::error::{Error, Result};
use crate::models::collection::RoiCollection;
use crate::models::roi::{Point, Roi};

/// Pointer event kinds understood by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// One pointer event with its position and modifier state.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Point,
    /// Additive multi-select modifier.
    pub shift: bool,
}

impl PointerEvent {
    pub fn down(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Down,
            pos: Point::new(x, y),
            shift: false,
        }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Move,
            pos: Point::new(x, y),
            shift: false,
        }
    }

    pub fn up(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Up,
            pos: Point::new(x, y),
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// The mutually exclusive interaction states. At most one in-progress
/// variant is active; illegal combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Idle,
    /// Translating every selected rectangle; each keeps its offset from
    /// the pointer recorded at the initiating `down`.
    Dragging { offsets: Vec<(usize, Point)> },
    /// Resizing one rectangle along the axes flagged in `mask`; `anchor`
    /// keeps the grabbed corner glued to the pointer instead of snapping.
    Resizing {
        index: usize,
        mask: AxisMask,
        anchor: Point,
    },
    /// Freehand-drawing a new rectangle from its first corner.
    Drafting { rect: Roi },
}

/// Result of asking a session to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// No unsaved edits; the session may be dropped.
    Closed,
    /// The working copy has unsaved edits; the host must confirm before
    /// discarding.
    UnsavedChanges,
}

/// An editing session over one video's ROI collection.
pub struct EditorSession<'a> {
    video: PathBuf,
    working: RoiCollection,
    selection: Selection,
    interaction: Interaction,
    saved: bool,
    on_save: Box<dyn FnMut(&RoiCollection) + 'a>,
}

impl<'a> EditorSession<'a> {
    /// Open a session. The initial collection is deep-cloned; edits stay in
    /// the working copy until [`EditorSession::save`] hands it to `on_save`.
    pub fn open(
        video: &Path,
        initial: &RoiCollection,
        on_save: impl FnMut(&RoiCollection) + 'a,
    ) -> Self {
        log::info!(
            "opened editing session for {} with {} ROIs",
            video.display(),
            initial.len()
        );
        Self {
            video: video.to_path_buf(),
            working: initial.clone(),
            selection: Selection::new(),
            interaction: Interaction::Idle,
            saved: true,
            on_save: Box::new(on_save),
        }
    }

    pub fn video(&self) -> &Path {
        &self.video
    }

    pub fn rois(&self) -> &RoiCollection {
        &self.working
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// The in-progress draft rectangle, if one is being drawn.
    pub fn draft(&self) -> Option<&Roi> {
        match &self.interaction {
            Interaction::Drafting { rect } if rect.is_draft() => Some(rect),
            _ => None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.saved
    }

    /// Feed one pointer event through the state machine. Returns whether
    /// the scene needs redrawing.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down if event.shift => self.shift_down(event.pos),
            PointerKind::Down => self.down(event.pos),
            PointerKind::Move => self.moved(event.pos),
            PointerKind::Up => self.up(event.pos),
        }
    }

    /// Classify what a pointer at `pos` would grab, for cursor affordance
    /// while idle. Pure query, no transition.
    pub fn hover(&self, pos: Point) -> Hit {
        hit::classify(pos, &self.working)
    }

    fn down(&mut self, pos: Point) -> bool {
        match hit::classify(pos, &self.working) {
            Hit::Handle { index, kind } => {
                let mask = kind.mask();
                if let Some(roi) = self.working.get(index) {
                    // Per-axis offset of the grabbed corner from the pointer.
                    let anchor = Point::new(
                        if mask.left {
                            roi.corner(0).x - pos.x
                        } else if mask.right {
                            roi.corner(1).x - pos.x
                        } else {
                            0
                        },
                        if mask.top {
                            roi.corner(0).y - pos.y
                        } else if mask.bottom {
                            roi.corner(1).y - pos.y
                        } else {
                            0
                        },
                    );
                    self.selection.set_single(index);
                    self.interaction = Interaction::Resizing {
                        index,
                        mask,
                        anchor,
                    };
                }
            }
            Hit::Body { index } => {
                if !self.selection.contains(index) {
                    self.selection.set_single(index);
                }
                let offsets = self
                    .selection
                    .iter()
                    .filter_map(|idx| {
                        self.working.get(idx).map(|roi| {
                            let min = roi.corner(0);
                            (idx, Point::new(min.x - pos.x, min.y - pos.y))
                        })
                    })
                    .collect();
                self.interaction = Interaction::Dragging { offsets };
            }
            Hit::Miss => {
                self.selection.clear();
                let mut rect = Roi::new();
                rect.set_corner(0, pos.x, pos.y, false);
                self.interaction = Interaction::Drafting { rect };
            }
        }
        true
    }

    fn shift_down(&mut self, pos: Point) -> bool {
        // Purely additive: a body hit joins the selection, nothing is ever
        // removed and no interaction starts.
        if let Hit::Body { index } = hit::classify(pos, &self.working) {
            return self.selection.insert(index);
        }
        false
    }

    fn moved(&mut self, pos: Point) -> bool {
        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Dragging { offsets } => {
                for &(idx, off) in offsets.iter() {
                    if let Some(roi) = self.working.get_mut(idx) {
                        let (w, h) = (roi.width(), roi.height());
                        let min = Point::new(pos.x + off.x, pos.y + off.y);
                        roi.set_from_points(min, Point::new(min.x + w, min.y + h));
                    }
                }
                self.saved = false;
                true
            }
            Interaction::Resizing {
                index,
                mask,
                anchor,
            } => {
                let (idx, mask, anchor) = (*index, *mask, *anchor);
                if let Some(roi) = self.working.get_mut(idx) {
                    // One normalizing update per flagged axis. A handle
                    // dragged past the opposite edge flips the rectangle;
                    // the mask keeps addressing the stored min/max corners,
                    // so the moving visual edge is always the one nearer
                    // the pointer.
                    if mask.top {
                        let x = roi.corner(0).x;
                        roi.set_corner(0, x, pos.y + anchor.y, true);
                    }
                    if mask.bottom {
                        let x = roi.corner(1).x;
                        roi.set_corner(1, x, pos.y + anchor.y, true);
                    }
                    if mask.left {
                        let y = roi.corner(0).y;
                        roi.set_corner(0, pos.x + anchor.x, y, true);
                    }
                    if mask.right {
                        let y = roi.corner(1).y;
                        roi.set_corner(1, pos.x + anchor.x, y, true);
                    }
                    self.saved = false;
                }
                true
            }
            Interaction::Drafting { rect } => {
                rect.set_draft(true);
                rect.set_corner(1, pos.x, pos.y, false);
                true
            }
        }
    }

    fn up(&mut self, pos: Point) -> bool {
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Idle => false,
            Interaction::Resizing { .. } => {
                self.selection.clear();
                true
            }
            Interaction::Dragging { .. } => true,
            Interaction::Drafting { mut rect } => {
                rect.set_corner(1, pos.x, pos.y, false);
                rect.normalize();
                self.working.append(rect);
                self.selection.clear();
                self.saved = false;
                log::info!("added ROI, total: {}", self.working.len());
                true
            }
        }
    }

    /// Select every rectangle.
    pub fn select_all(&mut self) {
        self.selection.set_all(self.working.len());
    }

    /// Delete every selected rectangle and clear the selection.
    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.working.remove_many(self.selection.as_slice());
        self.selection.clear();
        self.saved = false;
        log::info!("deleted selection, total: {}", self.working.len());
        true
    }

    /// Delete one rectangle by index.
    pub fn delete_at(&mut self, index: usize) -> Result<()> {
        self.working.remove_at(index).ok_or_else(|| {
            Error::Validation(format!("no ROI at index {index}"))
        })?;
        self.selection.clear();
        self.saved = false;
        log::info!("deleted ROI {}, total: {}", index + 1, self.working.len());
        Ok(())
    }

    /// Clear the selection. An in-progress drag, resize, or draft is not
    /// cancelled; those only end on `up`.
    pub fn escape(&mut self) {
        self.selection.clear();
    }

    /// Overwrite both corners of one rectangle (the edit-dialog path).
    pub fn set_corners(&mut self, index: usize, a: Point, b: Point) -> Result<()> {
        let roi = self.working.get_mut(index).ok_or_else(|| {
            Error::Validation(format!("no ROI at index {index}"))
        })?;
        roi.set_from_points(a, b);
        self.saved = false;
        Ok(())
    }

    /// Merge rectangles into the working copy (replace or append).
    pub fn import_rois(&mut self, rois: Vec<Roi>, replace: bool) -> Result<()> {
        self.working.import_merge(rois, replace)?;
        self.selection.clear();
        self.saved = false;
        Ok(())
    }

    /// Snapshot of the working copy, for per-session export.
    pub fn export_rois(&self) -> RoiCollection {
        self.working.clone()
    }

    /// Hand the working copy to the host and mark the session clean.
    pub fn save(&mut self) {
        (self.on_save)(&self.working);
        self.saved = true;
        log::info!(
            "saved {} ROIs for {}",
            self.working.len(),
            self.video.display()
        );
    }

    /// Ask to close. A dirty session reports [`CloseOutcome::UnsavedChanges`]
    /// so the host can run its confirmation prompt; proceeding is
    /// [`EditorSession::close_discarding`].
    pub fn close(&self) -> CloseOutcome {
        if self.saved {
            CloseOutcome::Closed
        } else {
            CloseOutcome::UnsavedChanges
        }
    }

    /// Discard the working copy and end the session.
    pub fn close_discarding(self) {
        if !self.saved {
            log::info!("discarded unsaved edits for {}", self.video.display());
        }
    }
}
