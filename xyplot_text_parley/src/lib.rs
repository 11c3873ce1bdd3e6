// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley-backed text measurement for xyplot.
//!
//! [`ParleyTextMeasurer`] implements [`xyplot_text::TextMeasurer`] with real
//! shaping, so a raster painter can derive its character cell and justify
//! labels from the same layout it later draws. [`ParleyTextMeasurer::layout_line`]
//! exposes that layout for glyph drawing.

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use core::cell::RefCell;

use parley::style::{FontFamily as ParleyFontFamily, FontStack, GenericFamily, StyleProperty};
use parley::{Alignment, AlignmentOptions, FontContext, FontWeight, Layout, LayoutContext};
use xyplot_text::{FontFamily, TextMeasurer, TextMetrics, TextStyle};

/// A [`TextMeasurer`] backed by Parley.
///
/// Only the first line of the input is laid out.
pub struct ParleyTextMeasurer {
    font_cx: RefCell<FontContext>,
    layout_cx: RefCell<LayoutContext<()>>,
    display_scale: f32,
    quantize: bool,
}

impl core::fmt::Debug for ParleyTextMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyTextMeasurer")
            .field("display_scale", &self.display_scale)
            .field("quantize", &self.quantize)
            .finish_non_exhaustive()
    }
}

impl ParleyTextMeasurer {
    /// Creates a measurer using Parley's system font configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            font_cx: RefCell::new(FontContext::new()),
            layout_cx: RefCell::new(LayoutContext::new()),
            display_scale: 1.0,
            quantize: true,
        }
    }

    /// Sets the display scale passed to Parley.
    ///
    /// Measurements are divided by the scale, so they stay in logical units.
    #[must_use]
    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale.max(0.0);
        self
    }

    /// Sets whether Parley quantizes layout coordinates to pixel boundaries.
    #[must_use]
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }

    /// Shapes the first line of `text`, aligned to the start.
    ///
    /// Returns `None` for empty text. Glyph positions are relative to the top
    /// left of the line box.
    pub fn layout_line(&self, text: &str, style: &TextStyle) -> Option<Layout<()>> {
        let text = text.split('\n').next().unwrap_or("");
        if text.is_empty() {
            return None;
        }

        let scale = self.display_scale.max(1.0e-6);
        let mut font_cx = self.font_cx.borrow_mut();
        let mut layout_cx = self.layout_cx.borrow_mut();

        let mut builder = layout_cx.ranged_builder(&mut font_cx, text, scale, self.quantize);
        builder.push_default(StyleProperty::FontSize(font_size_f32(style.font_size)));
        builder.push_default(StyleProperty::FontStack(font_stack(&style.font_family)));
        builder.push_default(StyleProperty::FontWeight(FontWeight::new(f32::from(
            style.font_weight.0,
        ))));

        let mut layout: Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, Alignment::Start, AlignmentOptions::default());
        Some(layout)
    }

    fn scale(&self) -> f64 {
        f64::from(self.display_scale.max(1.0e-6))
    }
}

impl Default for ParleyTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for ParleyTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let Some(layout) = self.layout_line(text, &style) else {
            return TextMetrics::ZERO;
        };
        let Some(line) = layout.lines().next() else {
            return TextMetrics::ZERO;
        };

        let scale = self.scale();
        let m = line.metrics();
        TextMetrics {
            advance_width: f64::from(m.advance) / scale,
            ascent: f64::from(m.ascent) / scale,
            descent: f64::from(m.descent) / scale,
            leading: f64::from(m.leading) / scale,
        }
    }
}

fn font_stack(family: &FontFamily) -> FontStack<'_> {
    let family = match family {
        FontFamily::Serif => ParleyFontFamily::Generic(GenericFamily::Serif),
        FontFamily::SansSerif => ParleyFontFamily::Generic(GenericFamily::SansSerif),
        FontFamily::Monospace => ParleyFontFamily::Generic(GenericFamily::Monospace),
        FontFamily::Named(name) => ParleyFontFamily::Named(Cow::Borrowed(name.as_ref())),
    };
    FontStack::from(family)
}

fn font_size_f32(font_size: f64) -> f32 {
    if !font_size.is_finite() {
        return 0.0;
    }
    let font_size = font_size.max(0.0);
    if font_size >= f64::from(f32::MAX) {
        f32::MAX
    } else {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Value is clamped to f32::MAX above"
        )]
        {
            font_size as f32
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn empty_text_has_no_layout() {
        let m = ParleyTextMeasurer::new();
        assert!(m.layout_line("", &TextStyle::new(12.0)).is_none());
        assert!(m.layout_line("\nsecond", &TextStyle::new(12.0)).is_none());
        assert_eq!(m.measure("", TextStyle::new(12.0)), TextMetrics::ZERO);
    }

    #[test]
    fn font_size_is_clamped() {
        assert_eq!(font_size_f32(f64::NAN), 0.0);
        assert_eq!(font_size_f32(-3.0), 0.0);
        assert_eq!(font_size_f32(f64::MAX), f32::MAX);
        assert_eq!(font_size_f32(11.0), 11.0);
    }
}
