// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout constants reported by a painter.

use kurbo::Size;

/// Device size and spacing constants used to lay out a plot.
///
/// All lengths are in device units. `axis_width` and `axis_height` describe a
/// single character cell of axis text, `title_width` and `title_height` the
/// same for the title. The layout only ever multiplies these by character
/// counts, so backends with proportional fonts report an average advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PainterMetrics {
    /// Size of the drawing area.
    pub area: Size,
    /// Padding around the border and between blocks.
    pub bdr_pad: u32,
    /// Minimum spacing between axis labels.
    pub axis_pad: u32,
    /// Vertical offset of a legend line from its label slot.
    pub legend_pad: u32,
    /// Length of a tick mark when ticks replace the full grid.
    pub tick_len: u32,
    /// Width of one axis text character.
    pub axis_width: u32,
    /// Height of one axis text line.
    pub axis_height: u32,
    /// Width of one title character.
    pub title_width: u32,
    /// Height of the title line.
    pub title_height: u32,
    /// Font size used for [`TextClass::Axis`](crate::TextClass::Axis).
    pub axis_font_size: f64,
    /// Font size used for [`TextClass::Title`](crate::TextClass::Title).
    pub title_font_size: f64,
}

impl PainterMetrics {
    /// Returns the metrics shared by the bundled backends for an area of `area`.
    #[must_use]
    pub fn standard(area: Size) -> Self {
        Self {
            area,
            bdr_pad: 2,
            axis_pad: 10,
            legend_pad: 0,
            tick_len: 5,
            axis_width: 5,
            axis_height: 13,
            title_width: 5,
            title_height: 5,
            axis_font_size: 11.0,
            title_font_size: 18.0,
        }
    }

    /// Sets the area size.
    #[must_use]
    pub fn with_area(mut self, area: Size) -> Self {
        self.area = area;
        self
    }

    /// Sets both font sizes.
    #[must_use]
    pub fn with_font_sizes(mut self, axis: f64, title: f64) -> Self {
        self.axis_font_size = axis;
        self.title_font_size = title;
        self
    }

    /// Area width truncated to whole device units.
    pub(crate) fn area_width(&self) -> i64 {
        truncate(self.area.width)
    }

    /// Area height truncated to whole device units.
    pub(crate) fn area_height(&self) -> i64 {
        truncate(self.area.height)
    }
}

fn truncate(v: f64) -> i64 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "device sizes are whole pixels; fractions are dropped on purpose"
    )]
    {
        v as i64
    }
}
