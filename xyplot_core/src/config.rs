// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration.

use alloc::string::String;
use core::fmt;

use kurbo::Size;

use crate::format::{FormatError, NumberFormat};
use crate::painter::MarkType;

/// Identifies an axis in errors and configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The horizontal axis.
    X,
    /// The vertical axis.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

/// Errors returned by [`PlotConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A log axis has a range override whose low bound is not positive.
    NonPositiveLogBound {
        /// The offending axis.
        axis: Axis,
        /// The configured low bound.
        low: f64,
    },
    /// An axis label format does not parse.
    InvalidFormat {
        /// The offending axis.
        axis: Axis,
        /// The format as given.
        format: String,
        /// Why it was rejected.
        err: FormatError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLogBound { axis, low } => write!(
                f,
                "{axis} axis is logarithmic but its range starts at {low}"
            ),
            Self::InvalidFormat { axis, format, err } => {
                write!(f, "invalid {axis} axis format {format:?}: {err}")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Per-axis settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisConfig {
    /// Unit label drawn beside the axis.
    pub label: String,
    /// printf-style format for tick labels.
    pub format: String,
    /// Whether the axis is logarithmic.
    pub log: bool,
    /// Explicit data-space range. Ignored unless `high > low`.
    pub range: Option<(f64, f64)>,
}

impl AxisConfig {
    /// Creates a linear axis with the given unit label and `%.2f` labels.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            format: String::from("%.2f"),
            log: false,
            range: None,
        }
    }

    /// Sets the tick label format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Makes the axis logarithmic.
    #[must_use]
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Overrides the range derived from the data.
    #[must_use]
    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }

    /// The override range, if it is usable.
    #[must_use]
    pub fn effective_range(&self) -> Option<(f64, f64)> {
        self.range.filter(|(low, high)| high > low)
    }

    fn validate(&self, axis: Axis) -> Result<NumberFormat, ConfigError> {
        if self.log
            && let Some((low, _)) = self.effective_range()
            && low <= 0.0
        {
            return Err(ConfigError::NonPositiveLogBound { axis, low });
        }
        NumberFormat::parse(&self.format).map_err(|err| ConfigError::InvalidFormat {
            axis,
            format: self.format.clone(),
            err,
        })
    }
}

/// Configuration for one plot session.
///
/// Dataset-level style flags left unset fall back to the defaults here.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    /// Title drawn centered above the plot.
    pub title: String,
    /// Horizontal axis settings.
    pub x_axis: AxisConfig,
    /// Vertical axis settings.
    pub y_axis: AxisConfig,
    /// Whether datasets connect their points by default.
    pub draw_lines: bool,
    /// Whether datasets draw marks by default.
    pub draw_marks: bool,
    /// Whether mark sizes are in world units by default.
    pub scale_marks: bool,
    /// Default mark shape.
    pub mark_type: MarkType,
    /// Default mark size in device units.
    pub mark_size: f64,
    /// Requested viewport size.
    pub size: Size,
    /// Draw short ticks at the plot edges instead of full gridlines.
    pub draw_ticks: bool,
    /// Draw a box around the plot body.
    pub bounding_box: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: String::from("xyplot"),
            x_axis: AxisConfig::new("X"),
            y_axis: AxisConfig::new("Y"),
            draw_lines: true,
            draw_marks: false,
            scale_marks: false,
            mark_type: MarkType::FilledCircle,
            mark_size: 7.0,
            size: Size::new(600.0, 600.0),
            draw_ticks: false,
            bounding_box: false,
        }
    }
}

/// Label formats checked by [`PlotConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisFormats {
    /// Format for x tick labels.
    pub x: NumberFormat,
    /// Format for y tick labels.
    pub y: NumberFormat,
}

impl PlotConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the x axis settings.
    #[must_use]
    pub fn with_x_axis(mut self, axis: AxisConfig) -> Self {
        self.x_axis = axis;
        self
    }

    /// Replaces the y axis settings.
    #[must_use]
    pub fn with_y_axis(mut self, axis: AxisConfig) -> Self {
        self.y_axis = axis;
        self
    }

    /// Sets the default for connecting points.
    #[must_use]
    pub fn with_lines(mut self, draw_lines: bool) -> Self {
        self.draw_lines = draw_lines;
        self
    }

    /// Sets the default for drawing marks.
    #[must_use]
    pub fn with_marks(mut self, draw_marks: bool) -> Self {
        self.draw_marks = draw_marks;
        self
    }

    /// Sets the default for world-unit mark sizes.
    #[must_use]
    pub fn with_scale_marks(mut self, scale_marks: bool) -> Self {
        self.scale_marks = scale_marks;
        self
    }

    /// Sets the default mark shape and size.
    #[must_use]
    pub fn with_mark(mut self, mark_type: MarkType, mark_size: f64) -> Self {
        self.mark_type = mark_type;
        self.mark_size = mark_size;
        self
    }

    /// Sets the viewport size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Selects edge ticks instead of full gridlines.
    #[must_use]
    pub fn with_ticks(mut self, draw_ticks: bool) -> Self {
        self.draw_ticks = draw_ticks;
        self
    }

    /// Enables the bounding box.
    #[must_use]
    pub fn with_bounding_box(mut self, bounding_box: bool) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Returns the axis settings for `axis`.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::X => &self.x_axis,
            Axis::Y => &self.y_axis,
        }
    }

    /// Checks the configuration and returns the parsed label formats.
    pub fn validate(&self) -> Result<AxisFormats, ConfigError> {
        Ok(AxisFormats {
            x: self.x_axis.validate(Axis::X)?,
            y: self.y_axis.validate(Axis::Y)?,
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn defaults() {
        let config = PlotConfig::new();
        assert_eq!(config.title, "xyplot");
        assert_eq!(config.x_axis.label, "X");
        assert!(config.draw_lines && !config.draw_marks);
        assert_eq!(config.size, Size::new(600.0, 600.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_range_means_derive() {
        let axis = AxisConfig::new("t").with_range(1.0, 0.0);
        assert_eq!(axis.effective_range(), None);
        let axis = AxisConfig::new("t").with_range(0.0, 1.0);
        assert_eq!(axis.effective_range(), Some((0.0, 1.0)));
    }

    #[test]
    fn log_axis_needs_positive_low() {
        let config = PlotConfig::new()
            .with_y_axis(AxisConfig::new("Y").with_log(true).with_range(0.0, 10.0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveLogBound {
                axis: Axis::Y,
                low: 0.0
            })
        );
        let config = PlotConfig::new()
            .with_y_axis(AxisConfig::new("Y").with_log(true).with_range(0.1, 10.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_format_names_axis() {
        let config = PlotConfig::new().with_x_axis(AxisConfig::new("X").with_format("%d"));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { axis: Axis::X, .. }));
    }
}
