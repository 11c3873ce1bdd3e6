// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output.

use std::fmt;
use std::io::{self, Write};

use kurbo::{Line, Point, Size};
use peniko::Color;
use xyplot_core::{
    Attributes, HorizontalAlign, Justification, MarkType, NumberFormat, Painter, PainterMetrics,
    TextClass,
};
use xyplot_text::{FontFamily, HeuristicTextMeasurer, TextMeasurer, TextStyle};

use crate::{ExportError, baseline_drop};

/// Device units per point.
const UNIT: f64 = 72.0 / 72.0;

/// A [`Painter`] that writes an SVG document.
///
/// Painter groups become nested `<g id="…">` elements. Write errors are held
/// until [`SvgPainter::finish`].
#[derive(Debug)]
pub struct SvgPainter<W: Write> {
    out: W,
    error: Option<io::Error>,
    metrics: PainterMetrics,
    attributes: Attributes,
    font: FontFamily,
    measurer: HeuristicTextMeasurer,
    number: NumberFormat,
    open_groups: Vec<String>,
}

impl<W: Write> SvgPainter<W> {
    /// Writes the document header for a plot of `area` device units to `out`.
    pub fn new(out: W, area: Size) -> Result<Self, ExportError> {
        let mut painter = Self {
            out,
            error: None,
            metrics: PainterMetrics::standard(area),
            attributes: Attributes::default(),
            font: FontFamily::SansSerif,
            measurer: HeuristicTextMeasurer::new(),
            number: NumberFormat::general(),
            open_groups: Vec::new(),
        };
        let (w, h) = (dev(area.width), dev(area.height));
        painter.emit(format_args!(
            "<?xml version=\"1.0\" standalone=\"no\"?>\n\
             <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"\n\
             \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n\
             <svg width=\"{w:.1}\" height=\"{h:.1}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
        ));
        if let Some(err) = painter.error.take() {
            return Err(err.into());
        }
        Ok(painter)
    }

    /// Closes any open groups and the root element, flushes, and returns the
    /// writer.
    pub fn finish(mut self) -> Result<W, ExportError> {
        for _ in 0..self.open_groups.len() {
            self.emit(format_args!("</g>\n"));
        }
        self.emit(format_args!("</svg>\n"));
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_none()
            && let Err(err) = self.out.write_fmt(args)
        {
            tracing::warn!(%err, "SVG output failed");
            self.error = Some(err);
        }
    }

    fn num(&self, v: f64) -> String {
        self.number.format(dev(v))
    }

    fn point(&self, p: Point) -> String {
        format!("{},{}", self.num(p.x), self.num(p.y))
    }

    fn stroke_style(&self) -> String {
        let a = &self.attributes;
        let mut style = format!(
            "stroke:{};stroke-width:{};fill:none",
            hex(a.color),
            self.num(a.line_width)
        );
        if let Some(alpha) = opacity(a.color) {
            style.push_str(&format!(";stroke-opacity:{alpha}"));
        }
        if let Some([on, off]) = a.line_style.dashes(a.line_width) {
            style.push_str(&format!(";stroke-dasharray:{},{}", self.num(on), self.num(off)));
        }
        style
    }

    fn fill_attrs(&self) -> String {
        let color = self.attributes.color;
        match opacity(color) {
            Some(alpha) => format!(r#"fill="{}" fill-opacity="{alpha}""#, hex(color)),
            None => format!(r#"fill="{}""#, hex(color)),
        }
    }

    fn mark(&self, p: Point) -> String {
        let (w, h) = self.attributes.mark_size;
        let (x, y) = (self.num(p.x), self.num(p.y));
        let fill = self.fill_attrs();
        match self.attributes.mark_type {
            MarkType::FilledCircle => {
                format!(r#"<circle cx="{x}" cy="{y}" r="{}" {fill}/>"#, self.num(w / 2.0))
            }
            MarkType::Circle => format!(
                r#"<circle cx="{x}" cy="{y}" r="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                self.num(w / 2.0),
                hex(self.attributes.color),
                self.num(self.attributes.line_width)
            ),
            MarkType::FilledSquare => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" {fill}/>"#,
                self.num(p.x - w / 2.0),
                self.num(p.y - h / 2.0),
                self.num(w),
                self.num(h)
            ),
            MarkType::Square => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                self.num(p.x - w / 2.0),
                self.num(p.y - h / 2.0),
                self.num(w),
                self.num(h),
                hex(self.attributes.color),
                self.num(self.attributes.line_width)
            ),
            MarkType::Pixel => format!(
                r#"<rect x="{}" y="{}" width="1" height="1" {fill}/>"#,
                self.num(p.x - 0.5),
                self.num(p.y - 0.5)
            ),
        }
    }
}

impl<W: Write> Painter for SvgPainter<W> {
    fn metrics(&self) -> PainterMetrics {
        self.metrics
    }

    fn set_attributes(&mut self, attributes: &Attributes) {
        self.attributes = *attributes;
        // Zero-width strokes are invisible in SVG viewers.
        if self.attributes.line_width == 0.0 {
            self.attributes.line_width = 1.0;
        }
    }

    fn draw_line(&mut self, line: Line) {
        self.draw_segments(&[line]);
    }

    fn draw_segments(&mut self, segments: &[Line]) {
        if segments.is_empty() {
            return;
        }
        let mut d = String::new();
        let mut last: Option<Point> = None;
        for seg in segments {
            if last != Some(seg.p0) {
                d.push_str(&format!("M {} ", self.point(seg.p0)));
            }
            d.push_str(&format!("L {} ", self.point(seg.p1)));
            last = Some(seg.p1);
        }
        let style = self.stroke_style();
        self.emit(format_args!(
            "<g style=\"{style}\">\n<path d=\"{}\"/>\n</g>\n",
            d.trim_end()
        ));
    }

    fn draw_marks(&mut self, marks: &[Point]) {
        for p in marks {
            let mark = self.mark(*p);
            self.emit(format_args!("{mark}\n"));
        }
    }

    fn draw_text(
        &mut self,
        pos: Point,
        text: &str,
        justification: Justification,
        class: TextClass,
    ) {
        let size = class.font_size(&self.metrics);
        let style = TextStyle::new(size).with_family(self.font.clone());
        let drop = baseline_drop(justification, &self.measurer.measure(text, style));
        let anchor = match justification.horizontal() {
            HorizontalAlign::Start => "start",
            HorizontalAlign::Middle => "middle",
            HorizontalAlign::End => "end",
        };
        let (x, y) = (self.num(pos.x), self.num(pos.y + drop));
        let family = self.font.as_css_family().to_owned();
        let fill = self.fill_attrs();
        let font_size = self.num(size);
        let text = escape_xml(text);
        self.emit(format_args!(
            "<text x=\"{x}\" y=\"{y}\" font-family=\"{family}\" font-size=\"{font_size}\" \
             text-anchor=\"{anchor}\" {fill}>{text}</text>\n"
        ));
    }

    fn begin_group(&mut self, name: &str) {
        let id = escape_xml(name);
        self.emit(format_args!("<g id=\"{id}\">\n"));
        self.open_groups.push(name.to_owned());
    }

    fn end_group(&mut self, name: &str) {
        match self.open_groups.pop() {
            Some(open) => {
                if open != name {
                    tracing::debug!(open = %open, name, "group closed out of order");
                }
                self.emit(format_args!("</g>\n"));
            }
            None => tracing::warn!(name, "end_group without an open group"),
        }
    }
}

fn dev(v: f64) -> f64 {
    v * UNIT
}

fn hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

fn opacity(color: Color) -> Option<f64> {
    let a = color.to_rgba8().a;
    (a != 255).then(|| f64::from(a) / 255.0)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;
    use xyplot_core::{Dataset, LineStyle, PlotConfig, render};

    use super::*;

    fn painter() -> SvgPainter<Vec<u8>> {
        SvgPainter::new(Vec::new(), Size::new(600.0, 400.0)).unwrap()
    }

    fn output(p: SvgPainter<Vec<u8>>) -> String {
        String::from_utf8(p.finish().unwrap()).unwrap()
    }

    #[test]
    fn document_frame() {
        let doc = output(painter());
        assert!(doc.starts_with("<?xml version=\"1.0\" standalone=\"no\"?>\n<!DOCTYPE svg"));
        assert!(doc.contains("<svg width=\"600.0\" height=\"400.0\""), "{doc}");
        assert!(doc.ends_with("</svg>\n"));
    }

    #[test]
    fn contiguous_segments_share_one_subpath() {
        let mut p = painter();
        p.draw_segments(&[
            Line::new((0.0, 0.0), (10.0, 0.0)),
            Line::new((10.0, 0.0), (10.0, 5.5)),
            Line::new((20.0, 20.0), (30.0, 20.0)),
        ]);
        let doc = output(p);
        assert!(
            doc.contains("<path d=\"M 0,0 L 10,0 L 10,5.5 M 20,20 L 30,20\"/>"),
            "{doc}"
        );
        assert_eq!(doc.matches("<path").count(), 1);
    }

    #[test]
    fn stroke_style_carries_color_width_and_dash() {
        let mut p = painter();
        p.set_attributes(
            &Attributes::default()
                .with_color(css::BLUE)
                .with_line_width(0.5)
                .with_line_style(LineStyle::Dot),
        );
        p.draw_line(Line::new((0.0, 0.0), (1.0, 1.0)));
        let doc = output(p);
        assert!(
            doc.contains("style=\"stroke:#0000ff;stroke-width:0.5;fill:none;stroke-dasharray:1,3\""),
            "{doc}"
        );
    }

    #[test]
    fn marks_by_type() {
        let mut p = painter();
        p.set_attributes(&Attributes::default().with_mark(MarkType::FilledCircle, (6.0, 6.0)));
        p.draw_marks(&[Point::new(5.0, 5.0)]);
        p.set_attributes(&Attributes::default().with_mark(MarkType::Square, (4.0, 2.0)));
        p.draw_marks(&[Point::new(5.0, 5.0)]);
        let doc = output(p);
        assert!(doc.contains(r##"<circle cx="5" cy="5" r="3" fill="#000000"/>"##), "{doc}");
        assert!(doc.contains(r#"<rect x="3" y="4" width="4" height="2" fill="none""#), "{doc}");
    }

    #[test]
    fn text_anchor_and_escaping() {
        let mut p = painter();
        p.draw_text(Point::new(10.0, 20.0), "a<b", Justification::LowerLeft, TextClass::Axis);
        p.draw_text(Point::new(10.0, 20.0), "r", Justification::Right, TextClass::Axis);
        let doc = output(p);
        assert!(doc.contains("text-anchor=\"start\""), "{doc}");
        assert!(doc.contains(">a&lt;b</text>"), "{doc}");
        assert!(doc.contains("text-anchor=\"end\""), "{doc}");
    }

    #[test]
    fn finish_closes_open_groups() {
        let mut p = painter();
        p.begin_group("outer");
        p.begin_group("inner");
        p.end_group("inner");
        let doc = output(p);
        assert_eq!(doc.matches("<g id=").count(), 2);
        assert_eq!(doc.matches("</g>").count(), 2);
    }

    #[test]
    fn diagonal_becomes_one_path() {
        let mut ds = Dataset::new("d");
        ds.draw_to((0.0, 0.0));
        ds.draw_to((10.0, 10.0));
        let mut p = painter();
        let view = render(&mut p, &[ds], &PlotConfig::new(), None).unwrap();
        let doc = output(p);

        let g = NumberFormat::general();
        let a = view.to_screen(Point::new(0.0, 0.0));
        let b = view.to_screen(Point::new(10.0, 10.0));
        let expected = format!(
            "<path d=\"M {},{} L {},{}\"/>",
            g.format(a.x),
            g.format(a.y),
            g.format(b.x),
            g.format(b.y)
        );
        assert_eq!(doc.matches(&expected).count(), 1, "{doc}");
        let lines = doc.find("<g id=\"lines\">").unwrap();
        assert!(doc[lines..].contains(&expected));
    }
}
