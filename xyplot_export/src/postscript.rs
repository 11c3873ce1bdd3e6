// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encapsulated PostScript output.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use kurbo::{Line, Point, Size};
use xyplot_core::{
    Attributes, HorizontalAlign, Justification, MarkType, NumberFormat, Painter, PainterMetrics,
    TextClass,
};
use xyplot_text::{FontFamily, HeuristicTextMeasurer, TextMeasurer, TextStyle};

use crate::{ExportError, baseline_drop};

/// A4 in points.
const PAPER: Size = Size::new(595.0, 842.0);

const PROLOGUE: &str = "\
/M {moveto} bind def
/S {stroke} bind def
/L {lineto} bind def
/F {fill} bind def
/LW {setlinewidth} bind def
/RGB { 255 div 3 1 roll
       255 div 3 1 roll
       255 div 3 1 roll setrgbcolor } bind def
/N {newpath} bind def
/ms { /marksize_y exch def /marksize_x exch def } def
/mC { /y exch def /x exch def
      N x marksize_x 2 div add y moveto
      x y marksize_x 2 div 0 360 arc stroke } bind def
/mFC { /y exch def /x exch def
       N x marksize_x 2 div add y moveto
       x y marksize_x 2 div 0 360 arc fill } bind def
/mS { /y exch def /x exch def
      N x marksize_x 2 div sub y marksize_y 2 div sub moveto
      marksize_x 0 rlineto 0 marksize_y rlineto
      marksize_x neg 0 rlineto closepath stroke } bind def
/mFS { /y exch def /x exch def
       N x marksize_x 2 div sub y marksize_y 2 div sub moveto
       marksize_x 0 rlineto 0 marksize_y rlineto
       marksize_x neg 0 rlineto closepath fill } bind def
/mP { /y exch def /x exch def x 0.5 sub y 0.5 sub 1 1 rectfill } bind def
/rshow { dup stringwidth neg exch neg exch rmoveto show } def
/cshow { dup stringwidth -2 div exch -2 div exch rmoveto show } def
";

/// A [`Painter`] that writes an EPS document.
///
/// The plot is centered on an A4 page and y is flipped so device coordinates
/// keep their top-left origin. Groups are ignored. Write errors are held
/// until [`PostScriptPainter::finish`].
#[derive(Debug)]
pub struct PostScriptPainter<W: Write> {
    out: W,
    error: Option<io::Error>,
    metrics: PainterMetrics,
    attributes: Attributes,
    font: FontFamily,
    font_size: f64,
    measurer: HeuristicTextMeasurer,
    number: NumberFormat,
}

impl<W: Write> PostScriptPainter<W> {
    /// Writes the document header for a plot of `area` points to `out`.
    pub fn new(out: W, area: Size) -> Result<Self, ExportError> {
        let metrics = PainterMetrics::standard(area);
        let mut painter = Self {
            out,
            error: None,
            metrics,
            attributes: Attributes::default(),
            font: FontFamily::SansSerif,
            font_size: metrics.axis_font_size,
            measurer: HeuristicTextMeasurer::new(),
            number: NumberFormat::general(),
        };
        painter.header(area);
        if let Some(err) = painter.error.take() {
            return Err(err.into());
        }
        Ok(painter)
    }

    /// Ends the page, flushes, and returns the writer.
    pub fn finish(mut self) -> Result<W, ExportError> {
        self.emit(format_args!("showpage\n"));
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn header(&mut self, area: Size) {
        let x0 = (PAPER.width - area.width) / 2.0;
        let y0 = (PAPER.height - area.height) / 2.0;
        let x1 = (PAPER.width + area.width) / 2.0;
        let y1 = (PAPER.height + area.height) / 2.0;
        self.emit(format_args!(
            "%!PS-Adobe-2.0 EPSF-2.0\n%%BoundingBox: {x0:.0} {y0:.0} {x1:.0} {y1:.0}\n\
             %%Creator: xyplot\n{x0:.6} {y0:.6} translate\n"
        ));
        self.emit(format_args!("{PROLOGUE}"));
        let name = self.font.as_postscript_font().to_owned();
        self.emit(format_args!(
            "/{name} findfont dup length dict begin\n\
             {{1 index /FID ne {{def}} {{pop pop}} ifelse}} forall\n\
             /Encoding ISOLatin1Encoding def currentdict end\n\
             /{name}-Latin1 exch definefont pop\n"
        ));
        self.select_font();
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_none()
            && let Err(err) = self.out.write_fmt(args)
        {
            tracing::warn!(%err, "PostScript output failed");
            self.error = Some(err);
        }
    }

    fn select_font(&mut self) {
        let name = self.font.as_postscript_font().to_owned();
        let size = self.font_size;
        self.emit(format_args!("/{name}-Latin1 findfont {size:.1} scalefont setfont\n"));
    }

    fn num(&self, v: f64) -> String {
        self.number.format(v)
    }

    fn page_y(&self, y: f64) -> f64 {
        self.metrics.area.height - y
    }

    fn stroke_line(&mut self, line: Line) {
        let (x0, y0) = (self.num(line.p0.x), self.num(self.page_y(line.p0.y)));
        let (x1, y1) = (self.num(line.p1.x), self.num(self.page_y(line.p1.y)));
        self.emit(format_args!("{x0} {y0} M {x1} {y1} L S\n"));
    }
}

impl<W: Write> Painter for PostScriptPainter<W> {
    fn metrics(&self) -> PainterMetrics {
        self.metrics
    }

    fn set_attributes(&mut self, attributes: &Attributes) {
        self.attributes = *attributes;
        let rgba = attributes.color.to_rgba8();
        let width = attributes.line_width;
        self.emit(format_args!(
            "{width:.6} LW\n{} {} {} RGB\n",
            rgba.r, rgba.g, rgba.b
        ));
        match attributes.line_style.dashes(width) {
            Some([on, off]) => {
                let (on, off) = (self.num(on), self.num(off));
                self.emit(format_args!("[{on} {off}] 0 setdash\n"));
            }
            None => self.emit(format_args!("[] 0 setdash\n")),
        }
    }

    fn draw_line(&mut self, line: Line) {
        self.stroke_line(line);
    }

    fn draw_segments(&mut self, segments: &[Line]) {
        for line in segments {
            self.stroke_line(*line);
        }
    }

    fn draw_marks(&mut self, marks: &[Point]) {
        if marks.is_empty() {
            return;
        }
        let (sx, sy) = self.attributes.mark_size;
        let proc = match self.attributes.mark_type {
            MarkType::FilledCircle => "mFC",
            MarkType::FilledSquare => "mFS",
            MarkType::Circle => "mC",
            MarkType::Square => "mS",
            MarkType::Pixel => "mP",
        };
        self.emit(format_args!("{sx:.6} {sy:.6} ms\n/m /{proc} load def\n"));
        for p in marks {
            let y = self.page_y(p.y);
            self.emit(format_args!("{:.2} {y:.2} m\n", p.x));
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
        if size != self.font_size {
            self.font_size = size;
            self.select_font();
        }
        let style = TextStyle::new(size).with_family(self.font.clone());
        let drop = baseline_drop(justification, &self.measurer.measure(text, style));
        let show = match justification.horizontal() {
            HorizontalAlign::Start => "show",
            HorizontalAlign::Middle => "cshow",
            HorizontalAlign::End => "rshow",
        };
        let x = self.num(pos.x);
        let y = self.num(self.page_y(pos.y + drop));
        let text = escape_ps(text);
        self.emit(format_args!("{x} {y} M ({text}) {show}\n"));
    }
}

/// Escapes `text` for a string literal in the Latin-1 encoded font.
///
/// Characters outside Latin-1 become `?`.
fn escape_ps(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => match u8::try_from(u32::from(c)) {
                Ok(code) => {
                    let _ = write!(out, "\\{code:03o}");
                }
                Err(_) => out.push('?'),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;
    use xyplot_core::{Dataset, LineStyle, PlotConfig, render};

    use super::*;

    fn painter() -> PostScriptPainter<Vec<u8>> {
        PostScriptPainter::new(Vec::new(), Size::new(600.0, 600.0)).unwrap()
    }

    fn output(p: PostScriptPainter<Vec<u8>>) -> String {
        String::from_utf8(p.finish().unwrap()).unwrap()
    }

    #[test]
    fn header_centers_plot_on_a4() {
        let doc = output(painter());
        assert!(doc.starts_with("%!PS-Adobe-2.0 EPSF-2.0\n"));
        let bbox: Vec<f64> = doc
            .lines()
            .find_map(|l| l.strip_prefix("%%BoundingBox: "))
            .unwrap()
            .split(' ')
            .map(|v| v.parse().unwrap())
            .collect();
        assert!((bbox[0] + 2.5).abs() <= 0.5 && (bbox[2] - 597.5).abs() <= 0.5, "{bbox:?}");
        assert_eq!((bbox[1], bbox[3]), (121.0, 721.0));
        assert!(doc.contains("/Helvetica-Latin1 findfont 11.0 scalefont setfont\n"));
        assert!(doc.trim_end().ends_with("showpage"));
    }

    #[test]
    fn line_flips_y() {
        let mut p = painter();
        p.draw_line(Line::new((10.0, 20.0), (30.0, 40.5)));
        let doc = output(p);
        assert!(doc.contains("10 580 M 30 559.5 L S\n"), "{doc}");
    }

    #[test]
    fn attributes_emit_width_color_and_dash() {
        let mut p = painter();
        p.set_attributes(
            &Attributes::default()
                .with_color(css::RED)
                .with_line_width(2.0)
                .with_line_style(LineStyle::Dash),
        );
        let doc = output(p);
        assert!(doc.contains("2.000000 LW\n255 0 0 RGB\n[12 8] 0 setdash\n"), "{doc}");
    }

    #[test]
    fn marks_select_procedure() {
        let mut p = painter();
        p.set_attributes(&Attributes::default().with_mark(MarkType::Square, (4.0, 6.0)));
        p.draw_marks(&[Point::new(1.0, 2.0)]);
        let doc = output(p);
        assert!(doc.contains("4.000000 6.000000 ms\n/m /mS load def\n1.00 598.00 m\n"), "{doc}");
    }

    #[test]
    fn text_is_escaped_and_justified() {
        let mut p = painter();
        p.draw_text(Point::new(100.0, 50.0), "f(x)", Justification::Right, TextClass::Axis);
        p.draw_text(Point::new(300.0, 2.0), "T", Justification::Top, TextClass::Title);
        let doc = output(p);
        assert!(doc.contains("(f\\(x\\)) rshow\n"), "{doc}");
        assert!(doc.contains("/Helvetica-Latin1 findfont 18.0 scalefont setfont\n"), "{doc}");
        assert!(doc.contains("(T) cshow\n"), "{doc}");
    }

    #[test]
    fn non_ascii_text_uses_latin1_octal() {
        assert_eq!(escape_ps("café (1)"), "caf\\351 \\(1\\)");
        assert_eq!(escape_ps("5 €"), "5 ?");
        assert_eq!(escape_ps("a\tb"), "a\\011b");

        let mut p = painter();
        p.draw_text(Point::new(10.0, 10.0), "µs", Justification::Left, TextClass::Axis);
        let doc = output(p);
        assert!(doc.contains("/Encoding ISOLatin1Encoding def"), "{doc}");
        assert!(doc.contains("(\\265s) show\n"), "{doc}");
    }

    #[test]
    fn diagonal_becomes_one_stroke() {
        let mut ds = Dataset::new("d");
        ds.draw_to((0.0, 0.0));
        ds.draw_to((10.0, 10.0));
        let mut p = painter();
        let view = render(&mut p, &[ds], &PlotConfig::new(), None).unwrap();
        let doc = output(p);

        let a = view.to_screen(Point::new(0.0, 0.0));
        let b = view.to_screen(Point::new(10.0, 10.0));
        let g = NumberFormat::general();
        let expected = format!(
            "{} {} M {} {} L S\n",
            g.format(a.x),
            g.format(600.0 - a.y),
            g.format(b.x),
            g.format(600.0 - b.y)
        );
        assert_eq!(doc.matches(&expected).count(), 1, "{doc}");
    }

    #[test]
    fn empty_batches_write_nothing() {
        let mut p = painter();
        p.draw_segments(&[]);
        p.draw_marks(&[]);
        assert_eq!(output(p), output(painter()));
    }
}
