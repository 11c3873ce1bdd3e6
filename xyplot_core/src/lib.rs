// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend-agnostic x-y plotting.
//!
//! `xyplot_core` turns a list of [`Dataset`]s into calls on a [`Painter`].
//! It owns everything that does not depend on the output device:
//! - **Transforms** fit a world box into the plot body left over after margins
//!   ([`compute_transform`], [`ViewTransform`]).
//! - **Grids** pick "nice" label spacing, including sub-decade steps on log
//!   axes ([`GridCursor`]).
//! - **Clipping** trims segments to the visible world ([`clip_segment`]).
//! - **Rendering** draws title, legend, grid and data in a fixed order
//!   ([`RenderPass`], [`render`]).
//!
//! Backends implement [`Painter`] and report a [`PainterMetrics`]; the pass
//! never measures text itself.
//!
//! ```
//! use kurbo::Size;
//! use xyplot_core::{Dataset, PainterMetrics, PlotConfig, RecordingPainter, render};
//!
//! let mut ds = Dataset::new("ramp");
//! ds.draw_to((0.0, 0.0));
//! ds.draw_to((10.0, 10.0));
//!
//! let mut painter = RecordingPainter::new(PainterMetrics::standard(Size::new(600.0, 600.0)));
//! let view = render(&mut painter, &[ds], &PlotConfig::new(), None).unwrap();
//! assert!(view.body().width() > 0.0);
//! assert!(painter.texts().any(|t| t == "ramp"));
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod clip;
mod config;
mod dataset;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod grid;
mod metrics;
mod painter;
mod record;
mod render;
mod symbol;
mod transform;
mod world;

pub use clip::{clip_segment, is_visible};
pub use config::{Axis, AxisConfig, AxisFormats, ConfigError, PlotConfig};
pub use dataset::{
    Dataset, DatasetStyle, DrawOp, ResolvedStyle, SET_COLORS, TriState, set_color,
};
pub use format::{FormatError, NumberFormat, write_value};
pub use grid::{GridCursor, nlog10, round_up};
pub use metrics::PainterMetrics;
pub use painter::{
    Attributes, GRID_GRAY, HorizontalAlign, Justification, LineRole, LineStyle, MarkType,
    Painter, TextClass, VerticalAlign,
};
pub use record::{DrawCall, RecordingPainter};
pub use render::{PlotError, RenderPass, RenderPhase, render};
pub use transform::{LabelExtents, TransformError, ViewTransform, compute_transform};
pub use world::world_from_data;
