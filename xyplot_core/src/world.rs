// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The world box shown before any zoom.

use kurbo::Rect;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::config::{AxisConfig, PlotConfig};
use crate::dataset::Dataset;

/// Fraction of the span added on each side of the data.
const PADDING: f64 = 0.05;

/// Computes the initial world box for `datasets`.
///
/// The box covers every op of the visible datasets, with each axis replaced
/// by its range override when one is set (mapped to log10 on log axes), then
/// padded by 5% on every side. A zero span is widened so the box always has
/// area. Returns `None` when no visible dataset has any ops.
#[must_use]
pub fn world_from_data(datasets: &[Dataset], config: &PlotConfig) -> Option<Rect> {
    let data = datasets
        .iter()
        .filter(|ds| ds.visible)
        .filter_map(Dataset::bounds)
        .reduce(|a, b| a.union(b))?;

    let (x0, x1) = padded(override_or(&config.x_axis, data.x0, data.x1));
    let (y0, y1) = padded(override_or(&config.y_axis, data.y0, data.y1));
    Some(Rect::new(x0, y0, x1, y1))
}

fn override_or(axis: &AxisConfig, low: f64, high: f64) -> (f64, f64) {
    match axis.effective_range() {
        Some((lo, hi)) if !axis.log => (lo, hi),
        Some((lo, hi)) if lo > 0.0 => (lo.log10(), hi.log10()),
        _ => (low, high),
    }
}

fn padded((low, high): (f64, f64)) -> (f64, f64) {
    let span = high - low;
    if span > 0.0 {
        let pad = span * PADDING;
        return (low - pad, high + pad);
    }
    let pad = if low == 0.0 { 1.0 } else { low.abs() * PADDING };
    (low - pad, high + pad)
}
