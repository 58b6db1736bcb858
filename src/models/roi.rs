// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle data structures.
//!
//! This module defines the core rectangle primitive: a region of interest
//! stored as a pair of corners in normalized (min-corner, max-corner) form
//! with derived width and height.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A rectangular region of interest.
///
/// `corners[0]` holds the element-wise minimum and `corners[1]` the
/// element-wise maximum after every normalizing mutation. Normalization is
/// skipped on request mid-drag (see [`Roi::set_corner`]); a draft rectangle
/// being freehand-drawn is therefore the only place where `width` or
/// `height` can be transiently negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    corners: [Point; 2],
    width: i32,
    height: i32,
    #[serde(skip)]
    draft: bool,
}

impl Roi {
    /// Create an empty rectangle at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalized rectangle from two opposite corners.
    pub fn from_points(a: Point, b: Point) -> Self {
        let mut roi = Self::new();
        roi.set_from_points(a, b);
        roi
    }

    /// Set one corner. With `normalize` the corners are re-sorted into
    /// (min, max) form; without it the raw value is stored, which is used
    /// mid-draft to avoid re-sorting on every intermediate pointer sample.
    /// Dimensions are recomputed either way.
    pub fn set_corner(&mut self, which: usize, x: i32, y: i32, normalize: bool) {
        debug_assert!(which < 2);
        self.corners[which.min(1)] = Point::new(x, y);
        if normalize {
            self.normalize();
        }
        self.update_dimensions();
    }

    /// Overwrite both corners and normalize.
    pub fn set_from_points(&mut self, a: Point, b: Point) {
        self.corners = [a, b];
        self.normalize();
        self.update_dimensions();
    }

    pub fn corner(&self, which: usize) -> Point {
        self.corners[which.min(1)]
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// True while the rectangle is being freehand-drawn and not yet
    /// committed to a collection.
    pub fn is_draft(&self) -> bool {
        self.draft
    }

    pub fn set_draft(&mut self, draft: bool) {
        self.draft = draft;
    }

    /// Clear coordinates and the draft flag.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Sort the corners so `corners[0]` is the element-wise minimum and
    /// `corners[1]` the element-wise maximum.
    pub fn normalize(&mut self) {
        let [a, b] = self.corners;
        self.corners = [
            Point::new(a.x.min(b.x), a.y.min(b.y)),
            Point::new(a.x.max(b.x), a.y.max(b.y)),
        ];
        self.update_dimensions();
    }

    /// Inclusive interior test.
    pub fn contains(&self, p: Point) -> bool {
        let [min, max] = self.corners;
        min.x <= p.x && p.x <= max.x && min.y <= p.y && p.y <= max.y
    }

    /// Whether the stored fields satisfy the normalization invariant.
    /// Deserialized rectangles bypass the mutation methods, so imports
    /// must check this before accepting an entry.
    pub fn is_consistent(&self) -> bool {
        let [min, max] = self.corners;
        min.x <= max.x
            && min.y <= max.y
            && self.width == max.x - min.x
            && self.height == max.y - min.y
    }

    fn update_dimensions(&mut self) {
        self.width = self.corners[1].x - self.corners[0].x;
        self.height = self.corners[1].y - self.corners[0].y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_normalizes_any_quadrant() {
        for (a, b) in [
            (Point::new(10, 10), Point::new(50, 60)),
            (Point::new(50, 10), Point::new(10, 60)),
            (Point::new(10, 60), Point::new(50, 10)),
            (Point::new(50, 60), Point::new(10, 10)),
        ] {
            let roi = Roi::from_points(a, b);
            assert_eq!(roi.corner(0), Point::new(10, 10));
            assert_eq!(roi.corner(1), Point::new(50, 60));
            assert_eq!(roi.width(), 40);
            assert_eq!(roi.height(), 50);
        }
    }

    #[test]
    fn set_corner_without_normalize_keeps_raw_corners() {
        let mut roi = Roi::new();
        roi.set_corner(0, 50, 60, false);
        roi.set_corner(1, 10, 10, false);
        assert_eq!(roi.corner(0), Point::new(50, 60));
        assert_eq!(roi.width(), -40);
        assert_eq!(roi.height(), -50);

        roi.normalize();
        assert_eq!(roi.corner(0), Point::new(10, 10));
        assert_eq!(roi.width(), 40);
        assert_eq!(roi.height(), 50);
    }

    #[test]
    fn normalizing_set_corner_restores_invariant() {
        let mut roi = Roi::from_points(Point::new(10, 10), Point::new(50, 60));
        // Drag the max corner past the min corner on both axes.
        roi.set_corner(1, 0, 0, true);
        assert!(roi.corner(0).x <= roi.corner(1).x);
        assert!(roi.corner(0).y <= roi.corner(1).y);
        assert!(roi.width() >= 0 && roi.height() >= 0);
        assert_eq!(roi.corner(0), Point::new(0, 0));
        assert_eq!(roi.corner(1), Point::new(10, 10));
    }

    #[test]
    fn reset_clears_coordinates_and_draft_flag() {
        let mut roi = Roi::from_points(Point::new(1, 2), Point::new(3, 4));
        roi.set_draft(true);
        roi.reset();
        assert_eq!(roi, Roi::new());
        assert!(!roi.is_draft());
    }

    #[test]
    fn contains_is_inclusive() {
        let roi = Roi::from_points(Point::new(10, 10), Point::new(20, 20));
        assert!(roi.contains(Point::new(10, 10)));
        assert!(roi.contains(Point::new(20, 20)));
        assert!(roi.contains(Point::new(15, 15)));
        assert!(!roi.contains(Point::new(9, 15)));
        assert!(!roi.contains(Point::new(15, 21)));
    }

    #[test]
    fn consistency_detects_tampered_fields() {
        let good = Roi::from_points(Point::new(0, 0), Point::new(5, 5));
        assert!(good.is_consistent());

        let unsorted: Roi =
            serde_json::from_str(r#"{"corners":[{"x":5,"y":0},{"x":0,"y":5}],"width":-5,"height":5}"#)
                .unwrap();
        assert!(!unsorted.is_consistent());

        let mismatched: Roi =
            serde_json::from_str(r#"{"corners":[{"x":0,"y":0},{"x":5,"y":5}],"width":7,"height":5}"#)
                .unwrap();
        assert!(!mismatched.is_consistent());
    }
}
