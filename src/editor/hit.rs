// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hit-zone geometry.
//!
//! This module classifies a pointer position against a ROI collection:
//! each rectangle exposes eight resize handles (four corners, four edges)
//! plus its interior body. Classification is a pure function of the point
//! and the collection; the editing state machine consumes the result.

use crate::models::collection::RoiCollection;
use crate::models::roi::{Point, Roi};

/// Base handle radius. Corner hot-zones are squares of half-width twice
/// this value; edge hot-zones extend half this band on each side.
pub const HANDLE_RADIUS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// A grabbable resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

/// Which sides of the rectangle a handle controls: `left`/`top` address
/// the stored minimum corner, `right`/`bottom` the stored maximum corner.
/// The resize transition re-derives the moving corner from this mask on
/// every event, so handle semantics survive normalization flips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisMask {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl HandleKind {
    pub fn mask(self) -> AxisMask {
        let (left, top, right, bottom) = match self {
            HandleKind::Corner(Corner::TopLeft) => (true, true, false, false),
            HandleKind::Corner(Corner::TopRight) => (false, true, true, false),
            HandleKind::Corner(Corner::BottomLeft) => (true, false, false, true),
            HandleKind::Corner(Corner::BottomRight) => (false, false, true, true),
            HandleKind::Edge(Edge::Top) => (false, true, false, false),
            HandleKind::Edge(Edge::Bottom) => (false, false, false, true),
            HandleKind::Edge(Edge::Left) => (true, false, false, false),
            HandleKind::Edge(Edge::Right) => (false, false, true, false),
        };
        AxisMask {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Result of classifying a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A resize handle of the rectangle at `index`.
    Handle { index: usize, kind: HandleKind },
    /// The interior of the rectangle at `index`.
    Body { index: usize },
    /// No rectangle under the pointer.
    Miss,
}

/// Classify `point` against the collection with the default handle radius.
///
/// Rectangles are checked in collection order and the first match wins,
/// so the earliest-registered ROI takes precedence where zones overlap.
/// Within one rectangle, corner handles beat edge handles beat the body.
pub fn classify(point: Point, rois: &RoiCollection) -> Hit {
    classify_with_radius(point, rois, HANDLE_RADIUS)
}

pub fn classify_with_radius(point: Point, rois: &RoiCollection, radius: i32) -> Hit {
    for (index, roi) in rois.iter().enumerate() {
        if let Some(kind) = classify_roi(point, roi, radius) {
            return Hit::Handle { index, kind };
        }
        if roi.contains(point) {
            return Hit::Body { index };
        }
    }
    Hit::Miss
}

fn classify_roi(p: Point, roi: &Roi, radius: i32) -> Option<HandleKind> {
    let min = roi.corner(0);
    let max = roi.corner(1);
    let corner_zone = radius * 2;

    let near = |value: i32, target: i32, half_width: i32| {
        target - half_width <= value && value <= target + half_width
    };

    // Corner zones first: squares of half-width 2R centered on each corner.
    if near(p.x, min.x, corner_zone) && near(p.y, min.y, corner_zone) {
        return Some(HandleKind::Corner(Corner::TopLeft));
    }
    if near(p.x, max.x, corner_zone) && near(p.y, min.y, corner_zone) {
        return Some(HandleKind::Corner(Corner::TopRight));
    }
    if near(p.x, min.x, corner_zone) && near(p.y, max.y, corner_zone) {
        return Some(HandleKind::Corner(Corner::BottomLeft));
    }
    if near(p.x, max.x, corner_zone) && near(p.y, max.y, corner_zone) {
        return Some(HandleKind::Corner(Corner::BottomRight));
    }

    // Edge bands: the edge's span extended by R, R thick on each side.
    let in_x_span = min.x - radius <= p.x && p.x <= max.x + radius;
    let in_y_span = min.y - radius <= p.y && p.y <= max.y + radius;

    if in_x_span && near(p.y, min.y, radius) {
        return Some(HandleKind::Edge(Edge::Top));
    }
    if in_x_span && near(p.y, max.y, radius) {
        return Some(HandleKind::Edge(Edge::Bottom));
    }
    if in_y_span && near(p.x, min.x, radius) {
        return Some(HandleKind::Edge(Edge::Left));
    }
    if in_y_span && near(p.x, max.x, radius) {
        return Some(HandleKind::Edge(Edge::Right));
    }

    None
}
