// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cohen-Sutherland clipping against the visible world region.

use kurbo::{Line, Point};

use crate::transform::ViewTransform;

const LEFT: u8 = 0x1;
const RIGHT: u8 = 0x2;
const BOTTOM: u8 = 0x4;
const TOP: u8 = 0x8;

fn outcode(p: Point, view: &ViewTransform) -> u8 {
    let mut code = 0;
    if p.x < view.world_origin.x {
        code |= LEFT;
    } else if p.x > view.world_opposite.x {
        code |= RIGHT;
    }
    if p.y < view.world_origin.y {
        code |= BOTTOM;
    } else if p.y > view.world_opposite.y {
        code |= TOP;
    }
    code
}

/// Clips the world segment `p1`-`p2` to the visible region of `view`.
///
/// Returns the surviving part in device coordinates, or `None` when nothing
/// of the segment is visible. Boundaries are inclusive: a segment lying on an
/// edge is kept.
#[must_use]
pub fn clip_segment(p1: Point, p2: Point, view: &ViewTransform) -> Option<Line> {
    let (mut p1, mut p2) = (p1, p2);
    let mut code1 = outcode(p1, view);
    let mut code2 = outcode(p2, view);
    let lo = view.world_origin;
    let hi = view.world_opposite;

    // Each pass moves one endpoint onto a boundary and clears that bit, so at
    // most four passes are needed per endpoint.
    for _ in 0..8 {
        if code1 | code2 == 0 {
            return Some(Line::new(view.to_screen(p1), view.to_screen(p2)));
        }
        if code1 & code2 != 0 {
            return None;
        }
        let outside = if code1 != 0 { code1 } else { code2 };
        let d = p2 - p1;
        let p = if outside & LEFT != 0 {
            Point::new(lo.x, p1.y + d.y * (lo.x - p1.x) / d.x)
        } else if outside & RIGHT != 0 {
            Point::new(hi.x, p1.y + d.y * (hi.x - p1.x) / d.x)
        } else if outside & BOTTOM != 0 {
            Point::new(p1.x + d.x * (lo.y - p1.y) / d.y, lo.y)
        } else {
            Point::new(p1.x + d.x * (hi.y - p1.y) / d.y, hi.y)
        };
        if outside == code1 {
            p1 = p;
            code1 = outcode(p1, view);
        } else {
            p2 = p;
            code2 = outcode(p2, view);
        }
    }
    None
}

/// Returns true when `p` lies inside the visible world region, edges included.
#[must_use]
pub fn is_visible(p: Point, view: &ViewTransform) -> bool {
    p.x >= view.world_origin.x
        && p.x <= view.world_opposite.x
        && p.y >= view.world_origin.y
        && p.y <= view.world_opposite.y
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::{Rect, Size};

    use super::*;
    use crate::metrics::PainterMetrics;
    use crate::transform::{LabelExtents, compute_transform};

    fn view() -> ViewTransform {
        compute_transform(
            &PainterMetrics::standard(Size::new(600.0, 600.0)),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            LabelExtents::default(),
        )
        .unwrap()
    }

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn inside_segment_is_unchanged() {
        let v = view();
        let (a, b) = (Point::new(1.0, 2.0), Point::new(9.0, 7.0));
        let line = clip_segment(a, b, &v).unwrap();
        assert!(close(line.p0, v.to_screen(a)));
        assert!(close(line.p1, v.to_screen(b)));
    }

    #[test]
    fn segment_left_of_box_is_dropped() {
        let v = view();
        assert!(clip_segment(Point::new(-5.0, 1.0), Point::new(-1.0, 9.0), &v).is_none());
        assert!(clip_segment(Point::new(1.0, 11.0), Point::new(9.0, 12.0), &v).is_none());
    }

    #[test]
    fn crossing_left_edge_is_trimmed() {
        let v = view();
        let line = clip_segment(Point::new(-5.0, 5.0), Point::new(5.0, 5.0), &v).unwrap();
        assert!(close(line.p0, v.to_screen(Point::new(0.0, 5.0))));
        assert!(close(line.p1, v.to_screen(Point::new(5.0, 5.0))));
    }

    #[test]
    fn diagonal_through_corners_is_trimmed_both_ends() {
        let v = view();
        let line = clip_segment(Point::new(-5.0, -5.0), Point::new(15.0, 15.0), &v).unwrap();
        assert!(close(line.p0, v.to_screen(Point::new(0.0, 0.0))));
        assert!(close(line.p1, v.to_screen(Point::new(10.0, 10.0))));
    }

    #[test]
    fn outside_segment_passing_a_corner_is_rejected() {
        let v = view();
        // Crosses the extension of two edges without entering the box.
        assert!(clip_segment(Point::new(-2.0, 9.0), Point::new(2.0, 14.0), &v).is_none());
    }

    #[test]
    fn degenerate_segment_terminates() {
        let v = view();
        let p = Point::new(3.0, 3.0);
        let line = clip_segment(p, p, &v).unwrap();
        assert!(close(line.p0, line.p1));
        assert!(clip_segment(Point::new(-1.0, 3.0), Point::new(-1.0, 3.0), &v).is_none());
    }

    #[test]
    fn visibility_is_inclusive() {
        let v = view();
        assert!(is_visible(Point::new(0.5, 9.5), &v));
        assert!(is_visible(v.world_origin, &v));
        assert!(!is_visible(Point::new(-0.1, 5.0), &v));
    }
}
