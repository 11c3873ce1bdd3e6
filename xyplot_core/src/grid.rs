// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gridline placement.
//!
//! A [`GridCursor`] walks an infinite ascending sequence of "nice" positions
//! along one axis. Linear axes step by a rounded `{1, 2, 5} × 10^k` interval.
//! Logarithmic axes work in log10 space and walk a per-decade offset table,
//! so a dense axis can label `1, 1.5, 2, 3, 5, 7` inside each decade while a
//! sparse one labels whole decades only.

use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// `log10(x)` nudged up by `1e-15`, with `nlog10(0) == 0`.
///
/// The nudge keeps exact powers of ten from landing just below an integer
/// after rounding error, so `floor(nlog10(1000.0)) == 3`.
#[must_use]
pub fn nlog10(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x.log10() + 1e-15 }
}

/// Rounds a positive step up to the nearest `{1, 2, 5, 10} × 10^k`.
///
/// Non-positive and non-finite inputs resolve to `1.0`.
#[must_use]
pub fn round_up(val: f64) -> f64 {
    if !val.is_finite() || val <= 0.0 {
        return 1.0;
    }
    let exponent = decade_of(val);
    let magnitude = 10_f64.powi(exponent.abs());
    let normalized = if exponent < 0 {
        val * magnitude
    } else {
        val / magnitude
    };
    let nice = if normalized > 5.0 {
        10.0
    } else if normalized > 2.0 {
        5.0
    } else if normalized > 1.0 {
        2.0
    } else {
        1.0
    };
    if exponent < 0 {
        nice / magnitude
    } else {
        nice * magnitude
    }
}

/// Power of ten used to normalize an axis value, `floor(nlog10(v))`.
pub(crate) fn decade_of(v: f64) -> i32 {
    let e = nlog10(v).floor();
    if !e.is_finite() {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite f64 decades lie within +/-324"
    )]
    {
        e as i32
    }
}

/// Iterator over gridline positions for one axis.
///
/// The cursor never terminates; callers stop once a value passes the visible
/// range. Two cursors built from the same arguments yield the same sequence.
#[derive(Clone, Debug)]
pub struct GridCursor {
    base: f64,
    step: f64,
    offsets: SmallVec<[f64; 16]>,
    next_offset: usize,
}

impl GridCursor {
    /// Creates a cursor starting near `low` with roughly `step` between lines.
    ///
    /// On a linear axis the first value is `floor(low / step) * step + step`
    /// for the rounded step, which is always strictly above `low`:
    /// `new(0.0, 7.0, false)` starts at 10, not 0. On a log axis `low` and
    /// `step` are in log10 space and `low` must be finite, which means the
    /// data-space bound is strictly positive.
    #[must_use]
    pub fn new(low: f64, step: f64, log: bool) -> Self {
        let mut offsets: SmallVec<[f64; 16]> = SmallVec::new();
        offsets.push(0.0);
        if !log {
            let step = round_up(step);
            return Self {
                base: (low / step).floor() * step,
                step,
                offsets,
                next_offset: 1,
            };
        }

        let ratio = 10_f64.powf(step);
        let base = low.floor();
        let mut next_offset = 1;
        if ratio <= 3.0 {
            decade_offsets(ratio, &mut offsets);
            let x = low - base;
            next_offset = 0;
            while next_offset < offsets.len() && x >= offsets[next_offset] {
                next_offset += 1;
            }
        }
        Self {
            base,
            step: step.ceil(),
            offsets,
            next_offset,
        }
    }

    /// The resolved distance between decades or linear gridlines.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// In-decade offsets in log10 space; `[0.0]` on linear axes.
    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }
}

impl Iterator for GridCursor {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next_offset >= self.offsets.len() {
            self.next_offset = 0;
            self.base += self.step;
        }
        let v = self.base + self.offsets[self.next_offset];
        self.next_offset += 1;
        tracing::trace!(value = v, "grid step");
        Some(v)
    }
}

/// Fills the in-decade multipliers for a decade-to-label ratio of at most 3.
fn decade_offsets(ratio: f64, offsets: &mut SmallVec<[f64; 16]>) {
    let mut add = |v: f64| offsets.push(v.log10());
    if ratio > 2.0 {
        add(3.0);
        return;
    }
    if ratio > 4.0 / 3.0 {
        add(2.0);
        add(5.0);
        return;
    }
    if ratio > 1.25 {
        for v in [1.5, 2.0, 3.0, 5.0, 7.0] {
            add(v);
        }
        return;
    }

    let mut x = 1.0;
    while x < 10.0 && (x + 0.5) / (x + 0.4) >= ratio {
        for d in [0.1, 0.2, 0.3, 0.4, 0.5] {
            add(x + d);
        }
        x += 0.5;
    }
    if x.floor() != x {
        x += 0.5;
        add(x);
    }
    while x < 10.0 && (x + 1.0) / (x + 0.5) >= ratio {
        add(x + 0.5);
        add(x + 1.0);
        x += 1.0;
    }
    while x < 10.0 && (x + 1.0) / x >= ratio {
        add(x + 1.0);
        x += 1.0;
    }
    if x == 7.0 {
        offsets.pop();
        x = 6.0;
    }
    if x < 7.0 {
        offsets.push((x + 2.0).log10());
    }
    if x == 10.0 {
        // 10 is the next decade's zero offset.
        offsets.pop();
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn round_up_picks_one_two_five() {
        assert_eq!(round_up(7.0), 10.0);
        assert_eq!(round_up(1.0), 1.0);
        assert_eq!(round_up(1.5), 2.0);
        assert_eq!(round_up(250.0), 500.0);
        assert!(close(round_up(0.3), 0.5), "{}", round_up(0.3));
        assert!(close(round_up(0.011), 0.02), "{}", round_up(0.011));
        assert_eq!(round_up(0.0), 1.0);
    }

    #[test]
    fn nlog10_lands_on_exact_decades() {
        assert_eq!(nlog10(0.0), 0.0);
        assert_eq!(decade_of(1000.0), 3);
        assert_eq!(decade_of(0.001), -3);
        assert_eq!(decade_of(999.0), 2);
    }

    #[test]
    fn linear_cursor_covers_padded_range() {
        // Data box x in [0, 100] padded by 5% on each side.
        let values: Vec<f64> = GridCursor::new(-5.0, 7.0, false)
            .take_while(|v| *v < 105.0)
            .collect();
        let expected: Vec<f64> = (0..=10).map(|i| f64::from(i) * 10.0).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn unpadded_low_is_not_a_gridline() {
        let values: Vec<f64> = GridCursor::new(0.0, 7.0, false).take(3).collect();
        assert_eq!(values, [10.0, 20.0, 30.0]);
        let values: Vec<f64> = GridCursor::new(3.0, 7.0, false).take(2).collect();
        assert_eq!(values, [10.0, 20.0]);
    }

    #[test]
    fn linear_cursor_steps_exactly() {
        let cursor = GridCursor::new(0.013, 0.0042, false);
        let step = cursor.step();
        assert!(close(step, 0.005), "step {step}");
        let values: Vec<f64> = cursor.take(20).collect();
        for w in values.windows(2) {
            assert!(close(w[1] - w[0], step), "{w:?}");
        }
        assert!(values[0] > 0.013 - step, "first value near low");
    }

    #[test]
    fn cursors_are_reproducible() {
        let a: Vec<f64> = GridCursor::new(0.37, 0.09, true).take(40).collect();
        let b: Vec<f64> = GridCursor::new(0.37, 0.09, true).take(40).collect();
        assert_eq!(a, b);
        let c: Vec<f64> = GridCursor::new(-3.2, 1.7, false).take(40).collect();
        let d: Vec<f64> = GridCursor::new(-3.2, 1.7, false).take(40).collect();
        assert_eq!(c, d);
    }

    #[test]
    fn sparse_log_axis_steps_by_decades() {
        let values: Vec<f64> = GridCursor::new(0.3, 1.2, true).take(3).collect();
        assert_eq!(values, [2.0, 4.0, 6.0]);
    }

    #[test]
    fn log_axis_adds_three_between_decades() {
        let cursor = GridCursor::new(0.0, 2.5_f64.log10(), true);
        assert_eq!(cursor.offsets().len(), 2);
        let values: Vec<f64> = cursor.take(3).collect();
        assert!(close(values[0], 3.0_f64.log10()), "{values:?}");
        assert!(close(values[1], 1.0), "{values:?}");
        assert!(close(values[2], 1.0 + 3.0_f64.log10()), "{values:?}");
    }

    #[test]
    fn dense_log_axis_offsets() {
        let cursor = GridCursor::new(0.0, 1.22_f64.log10(), true);
        let expected: Vec<f64> = [1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 7.0]
            .iter()
            .map(|v: &f64| v.log10())
            .collect();
        assert_eq!(cursor.offsets().len(), expected.len());
        for (a, b) in cursor.offsets().iter().zip(&expected) {
            assert!(close(*a, *b), "{a} vs {b}");
        }
    }

    #[test]
    fn finest_log_table_stays_in_decade() {
        let cursor = GridCursor::new(2.5, 1.001_f64.log10(), true);
        let offsets = cursor.offsets();
        assert!(offsets.len() > 16, "spills past the inline capacity");
        for w in offsets.windows(2) {
            assert!(w[0] < w[1], "{w:?}");
        }
        assert!(offsets.iter().all(|o| *o < 1.0), "within one decade");
        let values: Vec<f64> = cursor.clone().take(offsets.len() + 2).collect();
        assert!(values[0] > 2.5, "first value above low");
        for w in values.windows(2) {
            assert!(w[0] < w[1], "{w:?}");
        }
    }
}
