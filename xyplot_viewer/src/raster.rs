// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Painter`] that records into a Vello scene.

use kurbo::{Affine, BezPath, Line, Point, Size, Stroke};
use vello::Scene;
use vello::peniko::Fill;
use xyplot_core::{Attributes, Justification, MarkType, Painter, PainterMetrics, TextClass};
use xyplot_text::{TextMeasurer, TextStyle};
use xyplot_text_parley::ParleyTextMeasurer;

/// Characters averaged to size a text cell.
const CELL_SAMPLE: &str = "0123456789";
const CELL_SAMPLE_LEN: f64 = 10.0;

/// Paints into a [`Scene`], which the window renders and blits later.
///
/// Segment batches are joined into polylines and stroked as one path, and
/// marks of a batch are filled or stroked together.
pub(crate) struct RasterPainter<'a> {
    scene: &'a mut Scene,
    text: &'a ParleyTextMeasurer,
    metrics: PainterMetrics,
    attributes: Attributes,
}

impl core::fmt::Debug for RasterPainter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RasterPainter")
            .field("metrics", &self.metrics)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl<'a> RasterPainter<'a> {
    pub(crate) fn new(scene: &'a mut Scene, text: &'a ParleyTextMeasurer, area: Size) -> Self {
        Self {
            scene,
            metrics: cell_metrics(text, area),
            text,
            attributes: Attributes::default(),
        }
    }

    fn stroke(&self) -> Stroke {
        let width = if self.attributes.line_width > 0.0 {
            self.attributes.line_width
        } else {
            1.0
        };
        let stroke = Stroke::new(width);
        match self.attributes.line_style.dashes(width) {
            Some(dashes) => stroke.with_dashes(0.0, dashes),
            None => stroke,
        }
    }

    fn stroke_path(&mut self, path: &BezPath) {
        let stroke = self.stroke();
        self.scene.stroke(
            &stroke,
            Affine::IDENTITY,
            self.attributes.color,
            None,
            path,
        );
    }
}

impl Painter for RasterPainter<'_> {
    fn metrics(&self) -> PainterMetrics {
        self.metrics
    }

    fn set_attributes(&mut self, attributes: &Attributes) {
        self.attributes = *attributes;
    }

    fn draw_line(&mut self, line: Line) {
        self.stroke_path(&polylines(&[line]));
    }

    fn draw_segments(&mut self, segments: &[Line]) {
        if segments.is_empty() {
            return;
        }
        self.stroke_path(&polylines(segments));
    }

    fn draw_marks(&mut self, marks: &[Point]) {
        if marks.is_empty() {
            return;
        }
        let mark_type = self.attributes.mark_type;
        let path = mark_path(mark_type, self.attributes.mark_size, marks);
        if mark_type.is_filled() {
            self.scene.fill(
                Fill::NonZero,
                Affine::IDENTITY,
                self.attributes.color,
                None,
                &path,
            );
        } else {
            self.stroke_path(&path);
        }
    }

    fn draw_text(
        &mut self,
        pos: Point,
        text: &str,
        justification: Justification,
        class: TextClass,
    ) {
        let style = TextStyle::new(class.font_size(&self.metrics));
        let Some(layout) = self.text.layout_line(text, &style) else {
            return;
        };
        let Some(line) = layout.lines().next() else {
            return;
        };

        let m = line.metrics();
        let width = f64::from(m.advance);
        let height = f64::from(m.ascent + m.descent);
        let top = f64::from(m.baseline - m.ascent);
        let origin = pos + justification.offset(width, height);
        let transform = Affine::translate((origin.x, origin.y - top));

        for item in line.items() {
            let parley::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            self.scene
                .draw_glyphs(run.run().font())
                .transform(transform)
                .font_size(run.run().font_size())
                .brush(self.attributes.color)
                .draw(Fill::NonZero, glyphs);
        }
    }
}

/// Metrics whose character cells come from `text` rather than fixed sizes.
///
/// Falls back to the standard cell when the measurer reports nothing, which
/// happens without any usable system font.
pub(crate) fn cell_metrics(text: &impl TextMeasurer, area: Size) -> PainterMetrics {
    let base = PainterMetrics::standard(area);
    let axis = text.measure(CELL_SAMPLE, TextStyle::new(base.axis_font_size));
    let title = text.measure(CELL_SAMPLE, TextStyle::new(base.title_font_size));
    PainterMetrics {
        axis_width: cell(axis.advance_width / CELL_SAMPLE_LEN, base.axis_width),
        axis_height: cell(axis.line_height(), base.axis_height),
        title_width: cell(title.advance_width / CELL_SAMPLE_LEN, base.title_width),
        title_height: cell(title.line_height(), base.title_height),
        ..base
    }
}

fn cell(v: f64, fallback: u32) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return fallback;
    }
    let v = v.round().clamp(1.0, f64::from(u16::MAX));
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is whole and clamped to 1..=u16::MAX"
    )]
    {
        v as u32
    }
}

/// Joins segments into one path, starting a subpath wherever a segment does
/// not begin at the previous end.
fn polylines(segments: &[Line]) -> BezPath {
    let mut path = BezPath::new();
    let mut last = None;
    for line in segments {
        if last != Some(line.p0) {
            path.move_to(line.p0);
        }
        path.line_to(line.p1);
        last = Some(line.p1);
    }
    path
}

fn mark_path(mark_type: MarkType, size: (f64, f64), marks: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    for &p in marks {
        path.extend(mark_type.path(p, size));
    }
    path
}
