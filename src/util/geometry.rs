// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module converts between container pixel coordinates (relative to
//! the top-left corner of the displayed image) and normalized center/size
//! boxes in the range 0.0 to 1.0.

use crate::models::annotation::BoxGeometry;

/// Drags must exceed this many pixels on both axes to become a box.
pub const MIN_DRAW_SIZE_PX: f64 = 10.0;

/// A point in container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Measured size of the container the image is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False until layout has produced a non-degenerate size.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Rectangle being dragged out: the anchor is where the pointer went down,
/// and the width/height are signed, so they are negative when dragging
/// up or to the left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DragRect {
    /// Zero-sized rectangle at the anchor point.
    pub fn at(anchor: PixelPoint) -> Self {
        Self {
            x: anchor.x,
            y: anchor.y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Stretch the rectangle from its anchor to the pointer.
    pub fn stretch_to(&mut self, pointer: PixelPoint) {
        self.width = pointer.x - self.x;
        self.height = pointer.y - self.y;
    }

    pub fn exceeds_min_size(&self) -> bool {
        self.width.abs() > MIN_DRAW_SIZE_PX && self.height.abs() > MIN_DRAW_SIZE_PX
    }

    /// Top-left/size form regardless of drag direction.
    pub fn to_box(&self) -> PixelBox {
        PixelBox {
            x: self.x + self.width.min(0.0),
            y: self.y + self.height.min(0.0),
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }
}

/// Axis-aligned box in container pixels, top-left/size form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Convert a dragged rectangle to a normalized center/size box.
///
/// Returns `None` while the container is unmeasured.
pub fn to_normalized(rect: &DragRect, container: ContainerSize) -> Option<BoxGeometry> {
    if !container.is_measured() {
        return None;
    }

    let px = rect.to_box();
    Some(BoxGeometry {
        x_center: clamp01((px.x + px.width / 2.0) / container.width),
        y_center: clamp01((px.y + px.height / 2.0) / container.height),
        width: clamp01(px.width / container.width),
        height: clamp01(px.height / container.height),
    })
}

/// Convert a normalized box back to container pixels for drawing.
pub fn to_pixel(geometry: &BoxGeometry, container: ContainerSize) -> Option<PixelBox> {
    if !container.is_measured() {
        return None;
    }

    let width = geometry.width * container.width;
    let height = geometry.height * container.height;
    Some(PixelBox {
        x: geometry.x_center * container.width - width / 2.0,
        y: geometry.y_center * container.height - height / 2.0,
        width,
        height,
    })
}

/// Display-only percentage, rounded to the nearest integer.
pub fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Fit an image into the available space, preserving its aspect ratio.
///
/// Returns the displayed size and the offset that centers it.
pub fn fit_to_available(
    image_size: (u32, u32),
    available: ContainerSize,
) -> Option<(ContainerSize, PixelPoint)> {
    let (img_width, img_height) = image_size;
    if img_width == 0 || img_height == 0 || !available.is_measured() {
        return None;
    }

    let img_aspect = img_width as f64 / img_height as f64;
    let available_aspect = available.width / available.height;

    let display = if img_aspect > available_aspect {
        // Image is wider - fit to width
        ContainerSize::new(available.width, available.width / img_aspect)
    } else {
        // Image is taller - fit to height
        ContainerSize::new(available.height * img_aspect, available.height)
    };

    let offset = PixelPoint::new(
        (available.width - display.width) / 2.0,
        (available.height - display.height) / 2.0,
    );
    Some((display, offset))
}
