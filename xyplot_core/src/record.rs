// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A painter that records its calls.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Line, Point};

use crate::metrics::PainterMetrics;
use crate::painter::{Attributes, Justification, LineRole, Painter, TextClass};

/// One recorded [`Painter`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// [`Painter::set_attributes`].
    SetAttributes(Attributes),
    /// [`Painter::set_attributes_for_role`].
    SetRole(LineRole),
    /// [`Painter::draw_line`].
    Line(Line),
    /// [`Painter::draw_segments`].
    Segments(Vec<Line>),
    /// [`Painter::draw_marks`].
    Marks(Vec<Point>),
    /// [`Painter::draw_text`].
    Text {
        /// Anchor.
        pos: Point,
        /// The string drawn.
        text: String,
        /// Anchor placement.
        justification: Justification,
        /// Size class.
        class: TextClass,
    },
    /// [`Painter::begin_group`].
    BeginGroup(String),
    /// [`Painter::end_group`].
    EndGroup(String),
}

/// Collects every call into a list, for inspecting a render pass.
#[derive(Clone, Debug)]
pub struct RecordingPainter {
    metrics: PainterMetrics,
    /// Calls in the order they were made.
    pub calls: Vec<DrawCall>,
}

impl RecordingPainter {
    /// Creates a recorder that reports `metrics`.
    #[must_use]
    pub fn new(metrics: PainterMetrics) -> Self {
        Self {
            metrics,
            calls: Vec::new(),
        }
    }

    /// Texts drawn so far, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Painter for RecordingPainter {
    fn metrics(&self) -> PainterMetrics {
        self.metrics
    }

    fn set_attributes(&mut self, attributes: &Attributes) {
        self.calls.push(DrawCall::SetAttributes(*attributes));
    }

    fn set_attributes_for_role(&mut self, role: LineRole) {
        self.calls.push(DrawCall::SetRole(role));
    }

    fn draw_line(&mut self, line: Line) {
        self.calls.push(DrawCall::Line(line));
    }

    fn draw_segments(&mut self, segments: &[Line]) {
        self.calls.push(DrawCall::Segments(segments.to_vec()));
    }

    fn draw_marks(&mut self, marks: &[Point]) {
        self.calls.push(DrawCall::Marks(marks.to_vec()));
    }

    fn draw_text(
        &mut self,
        pos: Point,
        text: &str,
        justification: Justification,
        class: TextClass,
    ) {
        self.calls.push(DrawCall::Text {
            pos,
            text: String::from(text),
            justification,
            class,
        });
    }

    fn begin_group(&mut self, name: &str) {
        self.calls.push(DrawCall::BeginGroup(String::from(name)));
    }

    fn end_group(&mut self, name: &str) {
        self.calls.push(DrawCall::EndGroup(String::from(name)));
    }
}
