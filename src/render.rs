// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene rendering.
//!
//! This module draws the reference frame plus all ROI outlines, index
//! labels, and selection highlighting into a fresh raster. It is stateless:
//! the same (frame, collection, selection, draft) always produces the same
//! image, and the input frame is never mutated.

use image::{Rgba, RgbaImage};

use crate::editor::selection::Selection;
use crate::models::collection::RoiCollection;
use crate::models::roi::{Point, Roi};

/// Outline color for committed, unselected rectangles.
pub const OUTLINE: Rgba<u8> = Rgba([255, 0, 0, 255]);
/// Outline color for selected rectangles and the in-progress draft.
pub const HIGHLIGHT: Rgba<u8> = Rgba([0, 255, 0, 255]);

const LABEL_BG: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_FG: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LABEL_SIZE: i32 = 20;
const STROKE: i32 = 2;

/// Compose the frame with every rectangle's outline and label, selection
/// highlighting, and the draft (numbered after the committed entries).
pub fn render(
    frame: &RgbaImage,
    rois: &RoiCollection,
    selection: &Selection,
    draft: Option<&Roi>,
) -> RgbaImage {
    let mut scene = frame.clone();
    for (index, roi) in rois.iter().enumerate() {
        let color = if selection.contains(index) {
            HIGHLIGHT
        } else {
            OUTLINE
        };
        draw_roi(&mut scene, roi, index + 1, color);
    }
    if let Some(draft) = draft {
        // The draft may still be unnormalized mid-drag.
        let mut rect = *draft;
        rect.normalize();
        draw_roi(&mut scene, &rect, rois.len() + 1, HIGHLIGHT);
    }
    scene
}

fn draw_roi(scene: &mut RgbaImage, roi: &Roi, number: usize, color: Rgba<u8>) {
    let min = roi.corner(0);
    let max = roi.corner(1);

    // Label: white box at the min corner with the 1-based index.
    fill_rect(
        scene,
        min,
        Point::new(min.x + LABEL_SIZE, min.y + LABEL_SIZE),
        LABEL_BG,
    );
    draw_number(scene, number, Point::new(min.x + 4, min.y + 5));

    draw_outline(scene, min, max, color);
}

fn draw_outline(scene: &mut RgbaImage, min: Point, max: Point, color: Rgba<u8>) {
    for t in 0..STROKE {
        hline(scene, min.x, max.x, min.y + t, color);
        hline(scene, min.x, max.x, max.y - t, color);
        vline(scene, min.y, max.y, min.x + t, color);
        vline(scene, min.y, max.y, max.x - t, color);
    }
}

fn fill_rect(scene: &mut RgbaImage, min: Point, max: Point, color: Rgba<u8>) {
    for y in min.y..=max.y {
        hline(scene, min.x, max.x, y, color);
    }
}

fn hline(scene: &mut RgbaImage, x1: i32, x2: i32, y: i32, color: Rgba<u8>) {
    if y < 0 || y >= scene.height() as i32 {
        return;
    }
    let x1 = x1.max(0);
    let x2 = x2.min(scene.width() as i32 - 1);
    for x in x1..=x2 {
        scene.put_pixel(x as u32, y as u32, color);
    }
}

fn vline(scene: &mut RgbaImage, y1: i32, y2: i32, x: i32, color: Rgba<u8>) {
    if x < 0 || x >= scene.width() as i32 {
        return;
    }
    let y1 = y1.max(0);
    let y2 = y2.min(scene.height() as i32 - 1);
    for y in y1..=y2 {
        scene.put_pixel(x as u32, y as u32, color);
    }
}

/// 3x5 digit glyphs, one row per byte, low three bits used.
const DIGIT_GLYPHS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];
const GLYPH_SCALE: i32 = 2;

fn draw_number(scene: &mut RgbaImage, number: usize, origin: Point) {
    let digits = number.to_string();
    let mut x = origin.x;
    for digit in digits.bytes() {
        let glyph = &DIGIT_GLYPHS[(digit - b'0') as usize];
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3i32 {
                if bits & (0b100u8 >> col) != 0 {
                    fill_rect(
                        scene,
                        Point::new(
                            x + col * GLYPH_SCALE,
                            origin.y + row as i32 * GLYPH_SCALE,
                        ),
                        Point::new(
                            x + col * GLYPH_SCALE + GLYPH_SCALE - 1,
                            origin.y + row as i32 * GLYPH_SCALE + GLYPH_SCALE - 1,
                        ),
                        LABEL_FG,
                    );
                }
            }
        }
        x += 4 * GLYPH_SCALE;
    }
}
