// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark outlines for backends that draw paths.

use kurbo::{BezPath, Ellipse, Point, Rect, Shape};

use crate::painter::MarkType;

/// Flattening tolerance for circular marks, in device units.
const TOLERANCE: f64 = 0.1;

impl MarkType {
    /// Returns the outline of this mark centered at `center`.
    ///
    /// `size` is the mark's width and height. [`MarkType::Pixel`] ignores it
    /// and covers one device unit.
    #[must_use]
    pub fn path(self, center: Point, size: (f64, f64)) -> BezPath {
        match self {
            Self::FilledSquare | Self::Square => square_path(center, size.0, size.1),
            Self::FilledCircle | Self::Circle => circle_path(center, size.0, size.1),
            Self::Pixel => square_path(center, 1.0, 1.0),
        }
    }
}

fn square_path(center: Point, w: f64, h: f64) -> BezPath {
    Rect::from_center_size(center, (w, h)).to_path(TOLERANCE)
}

fn circle_path(center: Point, w: f64, h: f64) -> BezPath {
    Ellipse::new(center, (w * 0.5, h * 0.5), 0.0)
        .path_elements(TOLERANCE)
        .collect()
}
