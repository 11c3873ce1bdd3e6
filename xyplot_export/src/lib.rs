// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector document painters for xyplot.
//!
//! [`PostScriptPainter`] writes Encapsulated PostScript centered on an A4
//! page; [`SvgPainter`] writes a standalone SVG document. Both implement
//! [`xyplot_core::Painter`], so a render pass drives them exactly like the
//! interactive surface. Documents are rendered into memory and written to
//! their [`Destination`] only once complete, so a failed render leaves the
//! destination untouched:
//!
//! ```no_run
//! use kurbo::Size;
//! use xyplot_core::{Dataset, PlotConfig, render};
//! use xyplot_export::{Destination, PostScriptPainter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ds = Dataset::new("ramp");
//! ds.draw_to((0.0, 0.0));
//! ds.draw_to((1.0, 1.0));
//!
//! let mut painter = PostScriptPainter::new(Vec::new(), Size::new(600.0, 600.0))?;
//! render(&mut painter, &[ds], &PlotConfig::new(), None)?;
//! Destination::parse("|lpr").write_document(&painter.finish()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! Text is left to the document viewer. Baselines are placed from the
//! heuristic metrics in [`xyplot_text::HeuristicTextMeasurer`], which match
//! Helvetica closely enough for axis labels.

mod destination;
mod error;
mod postscript;
mod svg;

pub use destination::{Destination, Output};
pub use error::ExportError;
pub use postscript::PostScriptPainter;
pub use svg::SvgPainter;

use xyplot_core::{Justification, VerticalAlign};
use xyplot_text::TextMetrics;

/// Distance from a justified anchor down to the text baseline.
fn baseline_drop(justification: Justification, metrics: &TextMetrics) -> f64 {
    match justification.vertical() {
        VerticalAlign::Top => metrics.ascent,
        VerticalAlign::Middle => (metrics.ascent - metrics.descent) / 2.0,
        VerticalAlign::Bottom => -metrics.descent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_sits_inside_the_box() {
        let m = TextMetrics {
            advance_width: 10.0,
            ascent: 8.0,
            descent: 2.0,
            leading: 0.0,
        };
        assert_eq!(baseline_drop(Justification::UpperLeft, &m), 8.0);
        assert_eq!(baseline_drop(Justification::Right, &m), 3.0);
        assert_eq!(baseline_drop(Justification::LowerLeft, &m), -2.0);
    }
}
