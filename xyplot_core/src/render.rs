// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render pass: title, legend, grid and axis labels, then data.
//!
//! A [`RenderPass`] owns the view transform for one rendering and borrows the
//! painter for its whole lifetime. Each [`RenderPass::step`] draws one layer
//! and advances the [`RenderPhase`]; [`RenderPass::run`] drives it to the end.
//!
//! Layout positions are whole device units: anchors are truncated toward
//! zero before they reach the painter, so every backend places labels and
//! gridlines on the same integer grid.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Line, Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::clip::{clip_segment, is_visible};
use crate::config::{AxisFormats, ConfigError, PlotConfig};
use crate::dataset::{Dataset, DrawOp};
use crate::format::write_value;
use crate::grid::{GridCursor, decade_of};
use crate::metrics::PainterMetrics;
use crate::painter::{Justification, LineRole, Painter, TextClass};
use crate::transform::{LabelExtents, TransformError, ViewTransform, compute_transform};
use crate::world::world_from_data;

/// Upper bound on gridlines per axis, guarding against runaway steps.
const MAX_GRID_LINES: usize = 10_000;

/// Gridlines closer to zero than this fraction of the data span use the
/// zero-line style.
const ZERO_THRESHOLD: f64 = 1e-7;

/// Errors that prevent a render pass from starting.
///
/// When one is returned nothing has been drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum PlotError {
    /// The configuration is invalid.
    Config(ConfigError),
    /// There are no visible datasets with points.
    EmptyWorld,
    /// The view transform could not be computed.
    Transform(TransformError),
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::EmptyWorld => f.write_str("nothing to plot"),
            Self::Transform(err) => err.fmt(f),
        }
    }
}

impl core::error::Error for PlotError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::EmptyWorld => None,
            Self::Transform(err) => Some(err),
        }
    }
}

impl From<ConfigError> for PlotError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<TransformError> for PlotError {
    fn from(err: TransformError) -> Self {
        Self::Transform(err)
    }
}

/// The last layer a [`RenderPass`] has drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    /// Nothing drawn yet.
    Idle,
    /// The title is drawn.
    TitleDrawn,
    /// The legend is drawn.
    LegendDrawn,
    /// Unit labels, tick labels and gridlines are drawn.
    GridDrawn,
    /// All datasets are drawn; the pass is complete.
    DataDrawn,
}

/// One rendering of a set of datasets onto a painter.
pub struct RenderPass<'a, P: Painter + ?Sized> {
    painter: &'a mut P,
    datasets: &'a [Dataset],
    config: &'a PlotConfig,
    formats: AxisFormats,
    metrics: PainterMetrics,
    view: ViewTransform,
    phase: RenderPhase,
}

impl<P: Painter + ?Sized> fmt::Debug for RenderPass<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPass")
            .field("datasets", &self.datasets.len())
            .field("view", &self.view)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Renders `datasets` completely and returns the transform that was used.
///
/// `world` is an explicit world box, as committed by a zoom; `None` derives
/// it from the data.
pub fn render<P: Painter + ?Sized>(
    painter: &mut P,
    datasets: &[Dataset],
    config: &PlotConfig,
    world: Option<Rect>,
) -> Result<ViewTransform, PlotError> {
    Ok(RenderPass::new(painter, datasets, config, world)?.run())
}

impl<'a, P: Painter + ?Sized> RenderPass<'a, P> {
    /// Validates the inputs and computes the view transform.
    ///
    /// Nothing is drawn until [`RenderPass::step`] or [`RenderPass::run`].
    pub fn new(
        painter: &'a mut P,
        datasets: &'a [Dataset],
        config: &'a PlotConfig,
        world: Option<Rect>,
    ) -> Result<Self, PlotError> {
        let formats = config.validate()?;
        if !datasets.iter().any(|ds| ds.visible && !ds.is_empty()) {
            return Err(PlotError::EmptyWorld);
        }
        let world = match world {
            Some(world) => world.abs(),
            None => world_from_data(datasets, config).ok_or(PlotError::EmptyWorld)?,
        };

        let metrics = painter.metrics();
        let extents = LabelExtents {
            x_unit_chars: config.x_axis.label.chars().count(),
            longest_name_chars: visible(datasets)
                .map(|ds| ds.name.chars().count())
                .max()
                .unwrap_or(0),
        };
        let view = compute_transform(&metrics, world, extents)?;
        tracing::debug!(
            body = ?view.body(),
            world = ?view.visible_world(),
            "render pass ready"
        );

        Ok(Self {
            painter,
            datasets,
            config,
            formats,
            metrics,
            view,
            phase: RenderPhase::Idle,
        })
    }

    /// The transform this pass draws with.
    #[must_use]
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// The last completed layer.
    #[must_use]
    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Draws the next layer and returns the new phase.
    ///
    /// Once the pass reaches [`RenderPhase::DataDrawn`] further calls draw
    /// nothing.
    pub fn step(&mut self) -> RenderPhase {
        self.phase = match self.phase {
            RenderPhase::Idle => {
                self.draw_title();
                RenderPhase::TitleDrawn
            }
            RenderPhase::TitleDrawn => {
                self.draw_legend();
                RenderPhase::LegendDrawn
            }
            RenderPhase::LegendDrawn => {
                self.draw_grid_and_axis();
                RenderPhase::GridDrawn
            }
            RenderPhase::GridDrawn => {
                self.draw_data();
                RenderPhase::DataDrawn
            }
            RenderPhase::DataDrawn => return RenderPhase::DataDrawn,
        };
        tracing::debug!(phase = ?self.phase, "render step");
        self.phase
    }

    /// Draws every remaining layer and returns the transform.
    pub fn run(mut self) -> ViewTransform {
        while self.step() != RenderPhase::DataDrawn {}
        self.view
    }

    fn draw_title(&mut self) {
        let m = self.metrics;
        self.painter.set_attributes_for_role(LineRole::Axis);
        let anchor = Point::new((m.area_width() / 2) as f64, f64::from(m.axis_pad / 4));
        self.painter
            .draw_text(anchor, &self.config.title, Justification::Top, TextClass::Title);
    }

    /// Vertical positions of the legend slots that fit above the plot bottom.
    fn legend_slots(&self) -> impl Iterator<Item = (&'a Dataset, f64)> + use<'a, P> {
        let ah = f64::from(self.metrics.axis_height);
        let advance = 2.0 + ah + f64::from(self.metrics.bdr_pad);
        let bottom = self.view.opposite.y;
        let mut spot = self.view.origin.y;
        visible(self.datasets).map_while(move |ds| {
            if spot + ah + 2.0 < bottom {
                let slot = spot;
                spot += advance;
                Some((ds, slot))
            } else {
                None
            }
        })
    }

    fn draw_legend(&mut self) {
        let bdr = f64::from(self.metrics.bdr_pad);
        let x1 = self.view.opposite.x + bdr;

        let mut longest = 0;
        let slots: Vec<_> = self.legend_slots().collect();
        for (ds, spot) in &slots {
            longest = longest.max(ds.name.chars().count());
            self.painter.draw_text(
                Point::new(x1, spot + 1.0),
                &ds.name,
                Justification::UpperLeft,
                TextClass::Axis,
            );
        }

        let x2 = x1 + longest as f64 * f64::from(self.metrics.axis_width);
        let legend_pad = f64::from(self.metrics.legend_pad);
        for (ds, spot) in &slots {
            let resolved = ds.style.resolve(self.config);
            let size = resolved.mark_size;
            self.painter
                .set_attributes(&ds.style.attributes(&resolved, (size, size)));
            let y = spot - legend_pad;
            self.painter
                .draw_line(Line::new((x1, y), (x2, y)));
            if resolved.draw_marks {
                self.painter.draw_marks(&[Point::new(x1, y)]);
            }
        }
    }

    fn draw_grid_and_axis(&mut self) {
        self.painter.begin_group("grid");
        self.painter.set_attributes_for_role(LineRole::Axis);

        let world = self.view.world;
        let x_log = self.config.x_axis.log;
        let y_log = self.config.y_axis.log;
        let exp_x = if x_log { 0 } else { engineering_exponent(world.x0, world.x1) };
        let exp_y = if y_log { 0 } else { engineering_exponent(world.y0, world.y1) };

        self.draw_unit_labels(exp_x, exp_y);

        let m = self.metrics;
        let bdr = f64::from(m.bdr_pad);
        let aw = f64::from(m.axis_width);
        let label_x = bdr + 7.0 * aw;
        for v in self.y_grid() {
            let sy = self.view.screen_y(v).trunc();
            let label = write_value(v, exp_y, &self.formats.y, y_log);
            self.painter.draw_text(
                Point::new(label_x, sy),
                &label,
                Justification::Right,
                TextClass::Axis,
            );
        }
        let label_y = (m.area_height() - i64::from(m.bdr_pad)) as f64;
        for v in self.x_grid() {
            let sx = self.view.screen_x(v).trunc();
            let label = write_value(v, exp_x, &self.formats.x, x_log);
            self.painter.draw_text(
                Point::new(sx, label_y),
                &label,
                Justification::Bottom,
                TextClass::Axis,
            );
        }

        let (org, opp) = (self.view.origin, self.view.opposite);
        let tick = f64::from(m.tick_len);
        let ticks = self.config.draw_ticks;
        for v in self.y_grid() {
            let sy = self.view.screen_y(v).trunc();
            self.painter
                .set_attributes_for_role(grid_role(v, world.height(), y_log));
            if ticks {
                self.painter.draw_line(Line::new((org.x, sy), (org.x + tick, sy)));
                self.painter.draw_line(Line::new((opp.x - tick, sy), (opp.x, sy)));
            } else {
                self.painter.draw_line(Line::new((org.x, sy), (opp.x, sy)));
            }
        }
        for v in self.x_grid() {
            let sx = self.view.screen_x(v).trunc();
            self.painter
                .set_attributes_for_role(grid_role(v, world.width(), x_log));
            if ticks {
                self.painter.draw_line(Line::new((sx, org.y), (sx, org.y + tick)));
                self.painter.draw_line(Line::new((sx, opp.y - tick), (sx, opp.y)));
            } else {
                self.painter.draw_line(Line::new((sx, org.y), (sx, opp.y)));
            }
        }

        if self.config.bounding_box {
            self.painter.set_attributes_for_role(LineRole::Axis);
            let corners = [
                Point::new(org.x, org.y),
                Point::new(opp.x, org.y),
                Point::new(opp.x, opp.y),
                Point::new(org.x, opp.y),
            ];
            for i in 0..corners.len() {
                let next = corners[(i + 1) % corners.len()];
                self.painter.draw_line(Line::new(corners[i], next));
            }
        }

        self.painter.end_group("grid");
    }

    fn draw_unit_labels(&mut self, exp_x: i32, exp_y: i32) {
        let m = self.metrics;
        let bdr = i64::from(m.bdr_pad);
        let aw = i64::from(m.axis_width);
        let top = 2 * bdr + i64::from(m.title_height);

        let y_label = &self.config.y_axis.label;
        if exp_y != 0 {
            let chars = i64::try_from(y_label.chars().count()).unwrap_or(0);
            let anchor = Point::new(
                ((chars + 7) * aw) as f64,
                (top + i64::from(m.axis_height) / 2) as f64,
            );
            let text = format!("{y_label} x 10");
            self.painter
                .draw_text(anchor, &text, Justification::Right, TextClass::Axis);
            self.painter.draw_text(
                anchor,
                &exp_y.to_string(),
                Justification::LowerLeft,
                TextClass::Axis,
            );
        } else {
            self.painter.draw_text(
                Point::new(bdr as f64, top as f64),
                y_label,
                Justification::UpperLeft,
                TextClass::Axis,
            );
        }

        let x_label = &self.config.x_axis.label;
        let mut start_x = m.area_width() - bdr;
        let opp_y = self.view.opposite.y;
        if exp_x != 0 {
            let power = exp_x.to_string();
            start_x -= i64::try_from(power.len()).unwrap_or(0) * aw;
            let anchor = Point::new(start_x as f64, opp_y);
            self.painter
                .draw_text(anchor, &power, Justification::LowerLeft, TextClass::Axis);
            let text = format!("{x_label} x 10");
            self.painter
                .draw_text(anchor, &text, Justification::Right, TextClass::Axis);
        } else {
            self.painter.draw_text(
                Point::new(start_x as f64, opp_y),
                x_label,
                Justification::Right,
                TextClass::Axis,
            );
        }
    }

    fn y_grid(&self) -> impl Iterator<Item = f64> + use<'a, P> {
        let m = &self.metrics;
        let step = f64::from(m.axis_pad + m.axis_height) * self.view.scale_y;
        let end = self.view.world_opposite.y;
        GridCursor::new(self.view.world_origin.y, step, self.config.y_axis.log)
            .take_while(move |v| *v < end)
            .take(MAX_GRID_LINES)
    }

    fn x_grid(&self) -> impl Iterator<Item = f64> + use<'a, P> {
        let m = &self.metrics;
        let step = f64::from(m.axis_pad + 7 * m.axis_width) * self.view.scale_x;
        let end = self.view.world_opposite.x;
        GridCursor::new(self.view.world_origin.x, step, self.config.x_axis.log)
            .take_while(move |v| *v < end)
            .take(MAX_GRID_LINES)
    }

    fn draw_data(&mut self) {
        for ds in visible(self.datasets) {
            self.draw_dataset(ds);
        }
    }

    fn draw_dataset(&mut self, ds: &Dataset) {
        let view = &self.view;
        let resolved = ds.style.resolve(self.config);
        let mark_size = if resolved.scale_marks {
            (
                resolved.mark_size / view.scale_x,
                resolved.mark_size / view.scale_y,
            )
        } else {
            (resolved.mark_size, resolved.mark_size)
        };
        let attributes = ds.style.attributes(&resolved, mark_size);

        let mut segments = Vec::new();
        let mut marks = Vec::new();
        let mut texts: Vec<(Point, &str)> = Vec::new();
        let mut prev: Option<Point> = None;
        let mut start: Option<Point> = None;

        let close = |start: Option<Point>, last: Option<Point>, segments: &mut Vec<Line>| {
            if let (Some(s), Some(l)) = (start, last)
                && s != l
                && let Some(line) = clip_segment(l, s, view)
            {
                segments.push(line);
            }
        };

        for (i, op) in ds.ops.iter().enumerate() {
            match op {
                DrawOp::Move(p) => {
                    if resolved.draw_lines && resolved.draw_polygon {
                        close(start, prev, &mut segments);
                    }
                    start = Some(*p);
                    prev = Some(*p);
                }
                DrawOp::Draw(p) => {
                    if resolved.draw_lines
                        && i > 0
                        && let Some(q) = prev
                        && let Some(line) = clip_segment(q, *p, view)
                    {
                        segments.push(line);
                    }
                    if start.is_none() {
                        start = Some(*p);
                    }
                    prev = Some(*p);
                }
                DrawOp::Text { at, text } => {
                    if is_visible(*at, view) {
                        texts.push((view.to_screen(*at), text.as_str()));
                    }
                    continue;
                }
            }
            let p = op.point();
            if is_visible(p, view) {
                marks.push(view.to_screen(p));
            }
        }
        if resolved.draw_lines && resolved.draw_polygon {
            close(start, prev, &mut segments);
        }

        let both = resolved.draw_lines && resolved.draw_marks;
        let outline = ds
            .style
            .outline_color
            .filter(|_| resolved.draw_polygon)
            .map(|c| attributes.with_color(c));

        self.painter.set_attributes(&attributes);
        if both {
            self.painter.begin_group("lines_marks");
        }
        if resolved.draw_lines {
            if let Some(outline) = &outline {
                self.painter.set_attributes(outline);
            }
            self.painter.begin_group("lines");
            self.painter.draw_segments(&segments);
            self.painter.end_group("lines");
            if outline.is_some() {
                self.painter.set_attributes(&attributes);
            }
        }
        if resolved.draw_marks {
            self.painter.begin_group("marks");
            self.painter.draw_marks(&marks);
            self.painter.end_group("marks");
        }
        if both {
            self.painter.end_group("lines_marks");
        }

        if !texts.is_empty() {
            self.painter.begin_group("text");
            for (pos, text) in texts {
                self.painter
                    .draw_text(pos, text, Justification::LowerLeft, TextClass::Axis);
            }
            self.painter.end_group("text");
        }
    }
}

fn visible(datasets: &[Dataset]) -> impl Iterator<Item = &Dataset> {
    datasets.iter().filter(|ds| ds.visible && !ds.is_empty())
}

/// Power of ten, a multiple of three, shown beside an axis unit label.
fn engineering_exponent(a: f64, b: f64) -> i32 {
    decade_of(a.abs().max(b.abs())).div_euclid(3) * 3
}

fn grid_role(v: f64, span: f64, log: bool) -> LineRole {
    if !log && v.abs() < ZERO_THRESHOLD * span {
        LineRole::ZeroLine
    } else {
        LineRole::Grid
    }
}
