// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World-to-device mapping.
//!
//! The plot body is the device rectangle left over once the title, axis
//! labels and legend column have their margins. [`compute_transform`] fits
//! the world box into that rectangle, keeping the world center fixed.

use core::fmt;

use kurbo::{Point, Rect};

use crate::metrics::PainterMetrics;

/// Text lengths that size the right-hand margin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LabelExtents {
    /// Characters in the x unit label.
    pub x_unit_chars: usize,
    /// Characters in the longest dataset name shown in the legend.
    pub longest_name_chars: usize,
}

/// Errors returned by [`compute_transform`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformError {
    /// The margins leave no room for the plot body.
    AreaTooSmall {
        /// Device position of the lower-left corner of the body.
        origin: Point,
        /// Device position of the upper-right corner of the body.
        opposite: Point,
    },
    /// The world box has zero or non-finite width or height.
    DegenerateWorld,
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaTooSmall { origin, opposite } => write!(
                f,
                "drawing area too small: plot body would span ({}, {}) to ({}, {})",
                origin.x, origin.y, opposite.x, opposite.y
            ),
            Self::DegenerateWorld => f.write_str("world box has no area"),
        }
    }
}

impl core::error::Error for TransformError {}

/// Mapping between world coordinates and device coordinates for one render.
///
/// Device y grows downward; world y grows upward. `origin` is the left edge
/// and top margin of the plot body, `opposite` its right and bottom edges, so
/// world `y0` maps to `opposite.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Device x of the left edge and y of the top edge of the plot body.
    pub origin: Point,
    /// Device x of the right edge and y of the bottom edge of the plot body.
    pub opposite: Point,
    /// World coordinates shown at the lower-left corner of the body.
    pub world_origin: Point,
    /// World coordinates shown at the upper-right corner of the body.
    pub world_opposite: Point,
    /// World units per device unit along x.
    pub scale_x: f64,
    /// World units per device unit along y.
    pub scale_y: f64,
    /// The world box the transform was computed from.
    pub world: Rect,
}

/// Fits `world` into the plot body left by `metrics` and `extents`.
///
/// Margins are computed in whole device units. The left margin holds seven
/// axis characters of y labels; the right margin holds the wider of the x unit
/// label and the legend column.
pub fn compute_transform(
    metrics: &PainterMetrics,
    world: Rect,
    extents: LabelExtents,
) -> Result<ViewTransform, TransformError> {
    let bdr = i64::from(metrics.bdr_pad);
    let aw = i64::from(metrics.axis_width);
    let ah = i64::from(metrics.axis_height);
    let th = i64::from(metrics.title_height);

    let org_x = bdr + 7 * aw + bdr;
    let org_y = bdr + th + bdr + ah + ah / 2 + bdr;

    let mut right = chars(extents.x_unit_chars) * aw;
    let legend = chars(extents.longest_name_chars) * aw + bdr;
    if legend > right {
        right = legend;
    }
    let opp_x = metrics.area_width() - bdr - right;
    let opp_y = metrics.area_height() - bdr - ah - bdr;

    let origin = Point::new(org_x as f64, org_y as f64);
    let opposite = Point::new(opp_x as f64, opp_y as f64);
    if org_x >= opp_x || org_y >= opp_y {
        return Err(TransformError::AreaTooSmall { origin, opposite });
    }

    let world = world.abs();
    if !(world.width() > 0.0 && world.height() > 0.0)
        || !world.width().is_finite()
        || !world.height().is_finite()
    {
        return Err(TransformError::DegenerateWorld);
    }

    let body_w = opposite.x - origin.x;
    let body_h = opposite.y - origin.y;
    let scale_x = world.width() / body_w;
    let scale_y = world.height() / body_h;

    let center = world.center();
    let half_w = body_w / 2.0 * scale_x;
    let half_h = body_h / 2.0 * scale_y;

    Ok(ViewTransform {
        origin,
        opposite,
        world_origin: Point::new(center.x - half_w, center.y - half_h),
        world_opposite: Point::new(center.x + half_w, center.y + half_h),
        scale_x,
        scale_y,
        world,
    })
}

fn chars(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX / 64)
}

impl ViewTransform {
    /// Device x for world `x`.
    #[must_use]
    pub fn screen_x(&self, x: f64) -> f64 {
        (x - self.world_origin.x) / self.scale_x + self.origin.x
    }

    /// Device y for world `y`.
    #[must_use]
    pub fn screen_y(&self, y: f64) -> f64 {
        self.opposite.y - (y - self.world_origin.y) / self.scale_y
    }

    /// Device position of a world point.
    #[must_use]
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(self.screen_x(p.x), self.screen_y(p.y))
    }

    /// World x for device `sx`.
    #[must_use]
    pub fn world_x(&self, sx: f64) -> f64 {
        (sx - self.origin.x) * self.scale_x + self.world_origin.x
    }

    /// World y for device `sy`.
    #[must_use]
    pub fn world_y(&self, sy: f64) -> f64 {
        (self.opposite.y - sy) * self.scale_y + self.world_origin.y
    }

    /// World position of a device point.
    #[must_use]
    pub fn to_world(&self, p: Point) -> Point {
        Point::new(self.world_x(p.x), self.world_y(p.y))
    }

    /// Converts two device corners of a selection into a normalized world box.
    ///
    /// The corners may be given in any order, as produced by a drag.
    #[must_use]
    pub fn world_rect_from_pixels(&self, p0: Point, p1: Point) -> Rect {
        Rect::from_points(self.to_world(p0), self.to_world(p1))
    }

    /// The visible world region, from `world_origin` to `world_opposite`.
    #[must_use]
    pub fn visible_world(&self) -> Rect {
        Rect::from_points(self.world_origin, self.world_opposite)
    }

    /// The plot body in device coordinates.
    #[must_use]
    pub fn body(&self) -> Rect {
        Rect::from_points(self.origin, self.opposite)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Size;

    use super::*;

    fn metrics(w: f64, h: f64) -> PainterMetrics {
        PainterMetrics::standard(Size::new(w, h))
    }

    fn extents(names: usize) -> LabelExtents {
        LabelExtents {
            x_unit_chars: 1,
            longest_name_chars: names,
        }
    }

    #[test]
    fn margins_follow_metrics() {
        let view = compute_transform(
            &metrics(600.0, 600.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            extents(4),
        )
        .unwrap();
        assert_eq!(view.origin, Point::new(39.0, 30.0));
        assert_eq!(view.opposite, Point::new(576.0, 583.0));
        assert!(view.origin.x < view.opposite.x);
        assert!(view.origin.y < view.opposite.y);
    }

    #[test]
    fn unit_label_can_widen_right_margin() {
        let ext = LabelExtents {
            x_unit_chars: 10,
            longest_name_chars: 2,
        };
        let view =
            compute_transform(&metrics(600.0, 600.0), Rect::new(0.0, 0.0, 1.0, 1.0), ext).unwrap();
        assert_eq!(view.opposite.x, 548.0);
    }

    #[test]
    fn long_names_leave_no_room() {
        let err = compute_transform(
            &metrics(300.0, 300.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            extents(100),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::AreaTooSmall { .. }));
    }

    #[test]
    fn degenerate_world_is_rejected() {
        let err = compute_transform(
            &metrics(600.0, 600.0),
            Rect::new(1.0, 0.0, 1.0, 10.0),
            extents(1),
        )
        .unwrap_err();
        assert_eq!(err, TransformError::DegenerateWorld);
    }

    #[test]
    fn world_corners_map_to_body_corners() {
        let view = compute_transform(
            &metrics(400.0, 300.0),
            Rect::new(-2.0, 5.0, 8.0, 25.0),
            extents(3),
        )
        .unwrap();
        let lo = view.to_screen(Point::new(-2.0, 5.0));
        let hi = view.to_screen(Point::new(8.0, 25.0));
        assert!((lo.x - view.origin.x).abs() < 1e-9);
        assert!((lo.y - view.opposite.y).abs() < 1e-9);
        assert!((hi.x - view.opposite.x).abs() < 1e-9);
        assert!((hi.y - view.origin.y).abs() < 1e-9);
    }

    #[test]
    fn inverse_mapping_round_trips_and_normalizes() {
        let view = compute_transform(
            &metrics(600.0, 600.0),
            Rect::new(0.0, 0.0, 100.0, 50.0),
            extents(1),
        )
        .unwrap();
        let p = Point::new(3.5, 41.25);
        let back = view.to_world(view.to_screen(p));
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);

        // Dragged from lower-right to upper-left.
        let a = view.to_screen(Point::new(60.0, 10.0));
        let b = view.to_screen(Point::new(20.0, 30.0));
        let zoom = view.world_rect_from_pixels(a, b);
        assert!((zoom.x0 - 20.0).abs() < 1e-9 && (zoom.x1 - 60.0).abs() < 1e-9);
        assert!((zoom.y0 - 10.0).abs() < 1e-9 && (zoom.y1 - 30.0).abs() < 1e-9);
    }
}
