// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing sink interface shared by every output backend.
//!
//! A render pass talks to exactly one [`Painter`]. All coordinates passed to a
//! painter are device coordinates (y down), already clipped and transformed.
//! Style is sink-global: [`Painter::set_attributes`] applies to every draw call
//! that follows it until the next call.

use kurbo::{Line, Point, Vec2};
use peniko::Color;
use peniko::color::palette::css;

use crate::metrics::PainterMetrics;

/// Where text sits relative to its anchor point.
///
/// The name gives the position of the anchor on the text's bounding box, so
/// `UpperLeft` puts the anchor at the top-left corner and the text extends
/// right and down from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Justification {
    /// Anchor at the middle of the box.
    Center,
    /// Anchor at the middle of the left edge.
    Left,
    /// Anchor at the top-left corner.
    UpperLeft,
    /// Anchor at the middle of the top edge.
    Top,
    /// Anchor at the top-right corner.
    UpperRight,
    /// Anchor at the middle of the right edge.
    Right,
    /// Anchor at the bottom-right corner.
    LowerRight,
    /// Anchor at the middle of the bottom edge.
    Bottom,
    /// Anchor at the bottom-left corner.
    LowerLeft,
}

/// Horizontal part of a [`Justification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Text starts at the anchor.
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Vertical part of a [`Justification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Top of the text box at the anchor.
    Top,
    /// Text box centered on the anchor.
    Middle,
    /// Bottom of the text box at the anchor.
    Bottom,
}

impl Justification {
    /// All nine justifications.
    pub const ALL: [Self; 9] = [
        Self::Center,
        Self::Left,
        Self::UpperLeft,
        Self::Top,
        Self::UpperRight,
        Self::Right,
        Self::LowerRight,
        Self::Bottom,
        Self::LowerLeft,
    ];

    /// The horizontal alignment.
    #[must_use]
    pub fn horizontal(self) -> HorizontalAlign {
        match self {
            Self::Left | Self::UpperLeft | Self::LowerLeft => HorizontalAlign::Start,
            Self::Center | Self::Top | Self::Bottom => HorizontalAlign::Middle,
            Self::Right | Self::UpperRight | Self::LowerRight => HorizontalAlign::End,
        }
    }

    /// The vertical alignment.
    #[must_use]
    pub fn vertical(self) -> VerticalAlign {
        match self {
            Self::UpperLeft | Self::Top | Self::UpperRight => VerticalAlign::Top,
            Self::Left | Self::Center | Self::Right => VerticalAlign::Middle,
            Self::LowerLeft | Self::Bottom | Self::LowerRight => VerticalAlign::Bottom,
        }
    }

    /// Displacement from the anchor to the top-left corner of a `width` by
    /// `height` text box.
    #[must_use]
    pub fn offset(self, width: f64, height: f64) -> Vec2 {
        let dx = match self.horizontal() {
            HorizontalAlign::Start => 0.0,
            HorizontalAlign::Middle => -width / 2.0,
            HorizontalAlign::End => -width,
        };
        let dy = match self.vertical() {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => -height / 2.0,
            VerticalAlign::Bottom => -height,
        };
        Vec2::new(dx, dy)
    }
}

/// Text size class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextClass {
    /// Axis labels, legend names and data annotations.
    Axis,
    /// The plot title.
    Title,
}

impl TextClass {
    /// Font size for this class under `metrics`.
    #[must_use]
    pub fn font_size(self, metrics: &PainterMetrics) -> f64 {
        match self {
            Self::Axis => metrics.axis_font_size,
            Self::Title => metrics.title_font_size,
        }
    }
}

/// Named line styles used by the grid and axis layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Unit labels, tick labels and the bounding box.
    Axis,
    /// Ordinary gridlines.
    Grid,
    /// The gridline through zero.
    ZeroLine,
}

/// Light gray used for gridlines.
pub const GRID_GRAY: Color = Color::from_rgba8(204, 204, 204, 255);

impl LineRole {
    /// Default attributes for this role.
    #[must_use]
    pub fn attributes(self) -> Attributes {
        match self {
            Self::Axis => Attributes::default(),
            Self::Grid => Attributes::default()
                .with_color(GRID_GRAY)
                .with_line_width(0.5),
            Self::ZeroLine => Attributes::default().with_line_width(2.0),
        }
    }
}

/// Mark shapes. The discriminants match the numbering used by data files
/// and the `--mark-type` option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarkType {
    /// A filled circle.
    #[default]
    FilledCircle = 1,
    /// A filled square.
    FilledSquare = 2,
    /// A circle outline.
    Circle = 3,
    /// A square outline.
    Square = 4,
    /// A single device pixel.
    Pixel = 5,
}

impl MarkType {
    /// Looks a mark type up by its number.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            1 => Some(Self::FilledCircle),
            2 => Some(Self::FilledSquare),
            3 => Some(Self::Circle),
            4 => Some(Self::Square),
            5 => Some(Self::Pixel),
            _ => None,
        }
    }

    /// Looks a mark type up by its data-file name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ("fcircle", Self::FilledCircle),
            ("fsquare", Self::FilledSquare),
            ("circle", Self::Circle),
            ("square", Self::Square),
            ("pixel", Self::Pixel),
        ]
        .into_iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, m)| m)
    }

    /// Whether the shape is filled rather than outlined.
    #[must_use]
    pub fn is_filled(self) -> bool {
        matches!(self, Self::FilledCircle | Self::FilledSquare | Self::Pixel)
    }
}

/// Dash pattern of stroked lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Long dashes.
    Dash,
    /// Short dots.
    Dot,
}

impl LineStyle {
    /// On/off dash lengths in device units for a line of width `width`.
    ///
    /// Returns `None` for solid lines.
    #[must_use]
    pub fn dashes(self, width: f64) -> Option<[f64; 2]> {
        let w = width.max(1.0);
        match self {
            Self::Solid => None,
            Self::Dash => Some([6.0 * w, 4.0 * w]),
            Self::Dot => Some([w, 3.0 * w]),
        }
    }

    /// Looks a line style up by name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [("solid", Self::Solid), ("dash", Self::Dash), ("dot", Self::Dot)]
            .into_iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, s)| s)
    }
}

/// Sink-global drawing state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attributes {
    /// Stroke, fill and text color.
    pub color: Color,
    /// Stroke width in device units.
    pub line_width: f64,
    /// Dash pattern.
    pub line_style: LineStyle,
    /// Shape used by [`Painter::draw_marks`].
    pub mark_type: MarkType,
    /// Mark width and height in device units.
    pub mark_size: (f64, f64),
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            color: css::BLACK,
            line_width: 1.0,
            line_style: LineStyle::Solid,
            mark_type: MarkType::FilledCircle,
            mark_size: (7.0, 7.0),
        }
    }
}

impl Attributes {
    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the line width.
    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    /// Sets the line style.
    #[must_use]
    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// Sets the mark shape and size.
    #[must_use]
    pub fn with_mark(mut self, mark_type: MarkType, mark_size: (f64, f64)) -> Self {
        self.mark_type = mark_type;
        self.mark_size = mark_size;
        self
    }
}

/// An output backend.
///
/// Implementations own their attribute state. Call order is significant:
/// attributes must be set before the draw calls that use them.
pub trait Painter {
    /// Device size, spacing constants and font sizes of this backend.
    fn metrics(&self) -> PainterMetrics;

    /// Replaces the current drawing state.
    fn set_attributes(&mut self, attributes: &Attributes);

    /// Applies the preset for `role`.
    fn set_attributes_for_role(&mut self, role: LineRole) {
        self.set_attributes(&role.attributes());
    }

    /// Strokes a single line.
    fn draw_line(&mut self, line: Line);

    /// Strokes a batch of line segments with the current attributes.
    fn draw_segments(&mut self, segments: &[Line]);

    /// Draws the current mark shape centered on each point.
    fn draw_marks(&mut self, marks: &[Point]);

    /// Draws one line of text anchored at `pos`.
    fn draw_text(
        &mut self,
        pos: Point,
        text: &str,
        justification: Justification,
        class: TextClass,
    );

    /// Opens a named group. Backends without structure ignore it.
    fn begin_group(&mut self, name: &str) {
        let _ = name;
    }

    /// Closes the group opened by the matching [`Painter::begin_group`].
    fn end_group(&mut self, name: &str) {
        let _ = name;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn justification_offsets_place_box_around_anchor() {
        let (w, h) = (40.0, 10.0);
        assert_eq!(Justification::UpperLeft.offset(w, h), Vec2::new(0.0, 0.0));
        assert_eq!(Justification::Right.offset(w, h), Vec2::new(-40.0, -5.0));
        assert_eq!(Justification::Bottom.offset(w, h), Vec2::new(-20.0, -10.0));
        assert_eq!(Justification::Top.offset(w, h), Vec2::new(-20.0, 0.0));
        assert_eq!(Justification::LowerLeft.offset(w, h), Vec2::new(0.0, -10.0));
        assert_eq!(Justification::Center.offset(w, h), Vec2::new(-20.0, -5.0));
    }

    #[test]
    fn every_justification_has_distinct_alignment_pair() {
        for (i, a) in Justification::ALL.iter().enumerate() {
            for b in &Justification::ALL[i + 1..] {
                assert!(
                    (a.horizontal(), a.vertical()) != (b.horizontal(), b.vertical()),
                    "{a:?} and {b:?} collide"
                );
            }
        }
    }

    #[test]
    fn mark_lookup() {
        assert_eq!(MarkType::from_index(1), Some(MarkType::FilledCircle));
        assert_eq!(MarkType::from_index(9), None);
        assert_eq!(MarkType::from_name("FSquare"), Some(MarkType::FilledSquare));
        assert_eq!(MarkType::from_name("star"), None);
        assert!(MarkType::Pixel.is_filled());
        assert!(!MarkType::Circle.is_filled());
    }

    #[test]
    fn role_presets() {
        assert_eq!(LineRole::Grid.attributes().color, GRID_GRAY);
        assert_eq!(LineRole::ZeroLine.attributes().line_width, 2.0);
        assert_eq!(LineRole::Axis.attributes(), Attributes::default());
    }
}
