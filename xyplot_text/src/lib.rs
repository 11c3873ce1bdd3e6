// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement for plot painters.
//!
//! Painters justify axis labels, legend names and titles relative to an anchor
//! point, which needs the extents of each string before it is placed. This
//! crate holds the small interface they share:
//! - [`TextMeasurer`] measures a single line,
//! - [`TextStyle`] names the font inputs that affect the measurement, and
//! - [`HeuristicTextMeasurer`] estimates extents without a shaping engine.
//!
//! Vector emitters that leave glyph layout to the document viewer only need
//! the heuristic; the raster surface uses a shaping-aware implementation.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;

/// Measures a single line of text.
pub trait TextMeasurer {
    /// Measure `text` as one line.
    ///
    /// Anything after the first `\n` is ignored by the implementations in this
    /// workspace.
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics;
}

/// Font inputs relevant to measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in device units (pixels or points).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
}

impl TextStyle {
    /// Creates a sans-serif, normal weight `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
        }
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, font_family: FontFamily) -> Self {
        self.font_family = font_family;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Font family selection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family.
    Serif,
    /// A generic sans-serif family.
    SansSerif,
    /// A generic monospace family.
    Monospace,
    /// A named family (e.g. `"Inter"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Returns the family as written in a CSS `font-family` declaration.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }

    /// Returns the name of the matching standard PostScript font.
    ///
    /// Named families are passed through and must be known to the interpreter.
    #[must_use]
    pub fn as_postscript_font(&self) -> &str {
        match self {
            Self::Serif => "Times-Roman",
            Self::SansSerif => "Helvetica",
            Self::Monospace => "Courier",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width of the line.
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Metrics of an empty line.
    pub const ZERO: Self = Self {
        advance_width: 0.0,
        ascent: 0.0,
        descent: 0.0,
        leading: 0.0,
    };

    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// Estimates text extents from the character count.
///
/// Glyphs are assumed to advance by a fixed fraction of the font size, with
/// the baseline at 0.8em.
#[derive(Clone, Copy, Debug)]
pub struct HeuristicTextMeasurer {
    advance_em: f64,
}

impl HeuristicTextMeasurer {
    /// Creates a measurer with an average advance of 0.6em.
    #[must_use]
    pub fn new() -> Self {
        Self { advance_em: 0.6 }
    }

    /// Sets the assumed average glyph advance, as a fraction of the font size.
    #[must_use]
    pub fn with_advance_em(mut self, advance_em: f64) -> Self {
        self.advance_em = advance_em.max(0.0);
        self
    }
}

impl Default for HeuristicTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let line = text.split('\n').next().unwrap_or("");
        if line.is_empty() {
            return TextMetrics::ZERO;
        }
        let advance_width = self.advance_em * style.font_size * line.chars().count() as f64;
        TextMetrics {
            advance_width,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
            leading: 0.0,
        }
    }
}
