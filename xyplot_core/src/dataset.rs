// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Datasets: ordered drawing operations in world coordinates plus a style.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::palette::css;

use crate::config::PlotConfig;
use crate::painter::{Attributes, LineStyle, MarkType};

/// One step of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Start a new polyline at a point.
    Move(Point),
    /// Extend the polyline to a point.
    Draw(Point),
    /// Place a text annotation with its lower-left corner at a point.
    Text {
        /// Anchor in world coordinates.
        at: Point,
        /// The annotation.
        text: String,
    },
}

impl DrawOp {
    /// The world position of this op.
    #[must_use]
    pub fn point(&self) -> Point {
        match self {
            Self::Move(p) | Self::Draw(p) => *p,
            Self::Text { at, .. } => *at,
        }
    }

    /// Whether this op is a plotted point rather than an annotation.
    #[must_use]
    pub fn is_point(&self) -> bool {
        !matches!(self, Self::Text { .. })
    }
}

/// A flag that may defer to a session default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriState {
    /// Use the session default.
    #[default]
    Unset,
    /// Explicitly on.
    On,
    /// Explicitly off.
    Off,
}

impl TriState {
    /// Resolves against `default`.
    #[must_use]
    pub fn resolve(self, default: bool) -> bool {
        match self {
            Self::Unset => default,
            Self::On => true,
            Self::Off => false,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Colors assigned to datasets in order, wrapping around.
pub const SET_COLORS: [Color; 6] = [
    css::RED,
    css::GREEN,
    css::BLUE,
    css::YELLOW,
    css::CYAN,
    css::MAGENTA,
];

/// The default color for the dataset at `index`.
#[must_use]
pub fn set_color(index: usize) -> Color {
    SET_COLORS[index % SET_COLORS.len()]
}

/// Per-dataset style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DatasetStyle {
    /// Line, mark and text color.
    pub color: Color,
    /// Color of a polygon's closing outline, if different from `color`.
    pub outline_color: Option<Color>,
    /// Line width in device units.
    pub line_width: f64,
    /// Dash pattern.
    pub line_style: LineStyle,
    /// Mark shape, or the session default.
    pub mark_type: Option<MarkType>,
    /// Mark size, or the session default.
    pub mark_size: Option<f64>,
    /// Text size for annotations, in points.
    pub text_size: f64,
    /// Whether mark sizes are in world units.
    pub scale_marks: TriState,
    /// Whether points are connected.
    pub draw_lines: TriState,
    /// Whether points get marks.
    pub draw_marks: TriState,
    /// Whether each polyline is closed back to its start.
    pub draw_polygon: TriState,
}

impl Default for DatasetStyle {
    fn default() -> Self {
        Self {
            color: css::BLACK,
            outline_color: None,
            line_width: 1.0,
            line_style: LineStyle::Solid,
            mark_type: None,
            mark_size: None,
            text_size: 12.0,
            scale_marks: TriState::Unset,
            draw_lines: TriState::Unset,
            draw_marks: TriState::Unset,
            draw_polygon: TriState::Unset,
        }
    }
}

/// A [`DatasetStyle`] with every default applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    /// Whether points are connected.
    pub draw_lines: bool,
    /// Whether points get marks.
    pub draw_marks: bool,
    /// Whether polylines are closed.
    pub draw_polygon: bool,
    /// Whether `mark_size` is in world units.
    pub scale_marks: bool,
    /// Mark shape.
    pub mark_type: MarkType,
    /// Mark size.
    pub mark_size: f64,
}

impl DatasetStyle {
    /// Applies the session defaults in `config`.
    #[must_use]
    pub fn resolve(&self, config: &PlotConfig) -> ResolvedStyle {
        ResolvedStyle {
            draw_lines: self.draw_lines.resolve(config.draw_lines),
            draw_marks: self.draw_marks.resolve(config.draw_marks),
            draw_polygon: self.draw_polygon.resolve(false),
            scale_marks: self.scale_marks.resolve(config.scale_marks),
            mark_type: self.mark_type.unwrap_or(config.mark_type),
            mark_size: self.mark_size.unwrap_or(config.mark_size),
        }
    }

    /// Painter attributes for this style with a mark size already in device
    /// units.
    #[must_use]
    pub fn attributes(&self, resolved: &ResolvedStyle, mark_size: (f64, f64)) -> Attributes {
        Attributes::default()
            .with_color(self.color)
            .with_line_width(self.line_width)
            .with_line_style(self.line_style)
            .with_mark(resolved.mark_type, mark_size)
    }
}

/// A named series of draw ops.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    /// Name shown in the legend.
    pub name: String,
    /// Ops in drawing order.
    pub ops: Vec<DrawOp>,
    /// Style.
    pub style: DatasetStyle,
    /// Hidden datasets take no part in layout or drawing.
    pub visible: bool,
}

impl Dataset {
    /// Creates an empty, visible dataset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: Vec::new(),
            style: DatasetStyle::default(),
            visible: true,
        }
    }

    /// Sets the style.
    #[must_use]
    pub fn with_style(mut self, style: DatasetStyle) -> Self {
        self.style = style;
        self
    }

    /// Appends a [`DrawOp::Move`].
    pub fn move_to(&mut self, p: impl Into<Point>) {
        self.ops.push(DrawOp::Move(p.into()));
    }

    /// Appends a [`DrawOp::Draw`].
    pub fn draw_to(&mut self, p: impl Into<Point>) {
        self.ops.push(DrawOp::Draw(p.into()));
    }

    /// Appends a [`DrawOp::Text`].
    pub fn text(&mut self, at: impl Into<Point>, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            at: at.into(),
            text: text.into(),
        });
    }

    /// Whether the dataset has no ops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Bounding box of every op position, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.ops.iter().map(DrawOp::point);
        let first = points.next()?;
        Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn tristate_defers_when_unset() {
        assert!(TriState::Unset.resolve(true));
        assert!(!TriState::Unset.resolve(false));
        assert!(!TriState::Off.resolve(true));
        assert_eq!(TriState::from(true), TriState::On);
    }

    #[test]
    fn style_resolution_uses_config() {
        let config = PlotConfig::new().with_marks(true).with_mark(MarkType::Square, 4.0);
        let style = DatasetStyle {
            draw_lines: TriState::Off,
            mark_size: Some(9.0),
            ..DatasetStyle::default()
        };
        let r = style.resolve(&config);
        assert!(!r.draw_lines && r.draw_marks && !r.draw_polygon);
        assert_eq!(r.mark_type, MarkType::Square);
        assert_eq!(r.mark_size, 9.0);
    }

    #[test]
    fn bounds_cover_text_ops() {
        let mut ds = Dataset::new("a");
        assert_eq!(ds.bounds(), None);
        ds.move_to((1.0, 2.0));
        ds.draw_to((3.0, -1.0));
        ds.text((0.0, 5.0), "peak");
        assert_eq!(ds.bounds(), Some(Rect::new(0.0, -1.0, 3.0, 5.0)));
    }

    #[test]
    fn colors_cycle() {
        assert_eq!(set_color(0), css::RED);
        assert_eq!(set_color(7), css::GREEN);
    }
}
