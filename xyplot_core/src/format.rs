// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis label formatting.
//!
//! Axis formats are written printf-style (`"%.2f"`, `"%g"`, `"%8.3e ms"`), so
//! a [`NumberFormat`] parses one floating-point conversion with optional flags,
//! width and precision, plus literal text around it. Output matches C `printf`
//! for the supported conversions, including the two-digit signed exponent.

use alloc::string::String;
use core::fmt;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Errors returned by [`NumberFormat::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The format has no conversion.
    MissingConversion,
    /// The conversion character is not one of `f F e E g G`.
    UnsupportedConversion(char),
    /// More than one conversion was given.
    ExtraConversion,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConversion => f.write_str("format has no % conversion"),
            Self::UnsupportedConversion(c) => write!(f, "unsupported conversion `%{c}`"),
            Self::ExtraConversion => f.write_str("format has more than one conversion"),
        }
    }
}

impl core::error::Error for FormatError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Fixed,
    Exponent,
    General,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Conversion {
    style: Style,
    upper: bool,
    precision: Option<usize>,
    width: usize,
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alternate: bool,
}

/// A parsed printf-style format for one floating-point value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    prefix: String,
    suffix: String,
    conversion: Conversion,
}

impl NumberFormat {
    /// Parses a format such as `"%.2f"` or `"x = %g units"`.
    ///
    /// `%%` is a literal percent sign. A length modifier (`l`, `L`) before the
    /// conversion is accepted and ignored.
    pub fn parse(format: &str) -> Result<Self, FormatError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion = None;
        let mut chars = format.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if conversion.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }
            if conversion.is_some() {
                return Err(FormatError::ExtraConversion);
            }

            let mut conv = Conversion {
                style: Style::Fixed,
                upper: false,
                precision: None,
                width: 0,
                left: false,
                zero: false,
                plus: false,
                space: false,
                alternate: false,
            };
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => conv.left = true,
                    '0' => conv.zero = true,
                    '+' => conv.plus = true,
                    ' ' => conv.space = true,
                    '#' => conv.alternate = true,
                    _ => break,
                }
                chars.next();
            }
            conv.width = take_number(&mut chars);
            if chars.peek() == Some(&'.') {
                chars.next();
                conv.precision = Some(take_number(&mut chars));
            }
            while matches!(chars.peek(), Some('l' | 'L')) {
                chars.next();
            }
            let Some(kind) = chars.next() else {
                return Err(FormatError::MissingConversion);
            };
            conv.style = match kind.to_ascii_lowercase() {
                'f' => Style::Fixed,
                'e' => Style::Exponent,
                'g' => Style::General,
                _ => return Err(FormatError::UnsupportedConversion(kind)),
            };
            conv.upper = kind.is_ascii_uppercase();
            conversion = Some(conv);
        }

        let conversion = conversion.ok_or(FormatError::MissingConversion)?;
        Ok(Self {
            prefix,
            suffix,
            conversion,
        })
    }

    /// Formats `value`.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        let c = &self.conversion;
        let magnitude = value.abs();
        let body = if !value.is_finite() {
            let s = if value.is_nan() { "nan" } else { "inf" };
            if c.upper {
                s.to_ascii_uppercase()
            } else {
                String::from(s)
            }
        } else {
            match c.style {
                Style::Fixed => fixed(magnitude, c.precision.unwrap_or(6)),
                Style::Exponent => exponent(magnitude, c.precision.unwrap_or(6), c.upper),
                Style::General => {
                    general(magnitude, c.precision.unwrap_or(6), c.upper, c.alternate)
                }
            }
        };
        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else if c.plus {
            "+"
        } else if c.space {
            " "
        } else {
            ""
        };

        let mut out = self.prefix.clone();
        let len = sign.len() + body.len();
        let pad = c.width.saturating_sub(len);
        if c.left {
            out.push_str(sign);
            out.push_str(&body);
            out.extend(core::iter::repeat_n(' ', pad));
        } else if c.zero && value.is_finite() {
            out.push_str(sign);
            out.extend(core::iter::repeat_n('0', pad));
            out.push_str(&body);
        } else {
            out.extend(core::iter::repeat_n(' ', pad));
            out.push_str(sign);
            out.push_str(&body);
        }
        out.push_str(&self.suffix);
        out
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::bare(Style::Fixed, Some(2))
    }
}

impl NumberFormat {
    /// The plain `%g` format: six significant digits, trailing zeros removed.
    #[must_use]
    pub fn general() -> Self {
        Self::bare(Style::General, None)
    }

    fn bare(style: Style, precision: Option<usize>) -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            conversion: Conversion {
                style,
                upper: false,
                precision,
                width: 0,
                left: false,
                zero: false,
                plus: false,
                space: false,
                alternate: false,
            },
        }
    }
}

fn take_number(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> usize {
    let mut n: usize = 0;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = n.saturating_mul(10).saturating_add(d as usize);
        chars.next();
    }
    n
}

fn fixed(v: f64, precision: usize) -> String {
    alloc::format!("{v:.precision$}")
}

/// `%e` output: Rust writes `1.5e2`, printf writes `1.5e+02`.
fn exponent(v: f64, precision: usize, upper: bool) -> String {
    let (mantissa, exp) = split_exponent(v, precision);
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    alloc::format!("{mantissa}{e}{sign}{:02}", exp.unsigned_abs())
}

fn split_exponent(v: f64, precision: usize) -> (String, i32) {
    let s = alloc::format!("{v:.precision$e}");
    match s.split_once('e') {
        Some((m, e)) => (String::from(m), e.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn general(v: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let p = precision.max(1);
    let x = if v == 0.0 {
        0
    } else {
        split_exponent(v, p - 1).1
    };
    let p_i = i32::try_from(p).unwrap_or(i32::MAX);
    if x < p_i && x >= -4 {
        let digits = usize::try_from(p_i - 1 - x).unwrap_or(0);
        let s = fixed(v, digits);
        if alternate { s } else { trim_zeros(&s) }
    } else {
        let s = exponent(v, p - 1, upper);
        if alternate {
            return s;
        }
        match s.find(['e', 'E']) {
            Some(i) => {
                let (m, e) = s.split_at(i);
                let mut out = trim_zeros(m);
                out.push_str(e);
                out
            }
            None => s,
        }
    }
}

fn trim_zeros(s: &str) -> String {
    if !s.contains('.') {
        return String::from(s);
    }
    String::from(s.trim_end_matches('0').trim_end_matches('.'))
}

/// Formats a grid value for an axis label.
///
/// On a log axis `value` is a log10 exponent: whole decades print as `1e+02`,
/// in-decade lines print just their multiplier (`2`, `5`, `1.5`). On a linear
/// axis the value is divided by `10^exponent` and formatted with `format`.
#[must_use]
pub fn write_value(value: f64, exponent_shift: i32, format: &NumberFormat, log: bool) -> String {
    if log {
        let decade = value.floor();
        return if value == decade {
            exponent(10_f64.powf(value), 0, false)
        } else {
            general(10_f64.powf(value - decade), 2, false, false)
        };
    }
    let magnitude = 10_f64.powi(exponent_shift.abs());
    let scaled = if exponent_shift < 0 {
        value * magnitude
    } else {
        value / magnitude
    };
    format.format(scaled)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn fmt(format: &str, v: f64) -> String {
        NumberFormat::parse(format).unwrap().format(v)
    }

    #[test]
    fn fixed_and_exponent() {
        assert_eq!(fmt("%.2f", 3.14159), "3.14");
        assert_eq!(fmt("%f", 1.5), "1.500000");
        assert_eq!(fmt("%.3e", 12345.678), "1.235e+04");
        assert_eq!(fmt("%.1E", 0.00012), "1.2E-04");
        assert_eq!(fmt("%.2f", -0.5), "-0.50");
    }

    #[test]
    fn general_switches_notation() {
        assert_eq!(fmt("%g", 0.0001), "0.0001");
        assert_eq!(fmt("%g", 0.00001), "1e-05");
        assert_eq!(fmt("%g", 123456.0), "123456");
        assert_eq!(fmt("%g", 1234567.0), "1.23457e+06");
        assert_eq!(fmt("%g", 100.0), "100");
        assert_eq!(fmt("%g", 0.0), "0");
        assert_eq!(fmt("%.3g", 2.5), "2.5");
    }

    #[test]
    fn width_flags_and_literals() {
        assert_eq!(fmt("%8.2f", 3.14159), "    3.14");
        assert_eq!(fmt("%-6.1f|", 2.0), "2.0   |");
        assert_eq!(fmt("%+06.1f", -1.5), "-001.5");
        assert_eq!(fmt("%+06.1f", 1.5), "+001.5");
        assert_eq!(fmt("t=%.1fs", 2.26), "t=2.3s");
        assert_eq!(fmt("%.0f%%", 42.0), "42%");
        assert_eq!(fmt("%lf", 0.25), "0.250000");
    }

    #[test]
    fn bad_formats_are_rejected() {
        assert_eq!(
            NumberFormat::parse("%d"),
            Err(FormatError::UnsupportedConversion('d'))
        );
        assert_eq!(
            NumberFormat::parse("value"),
            Err(FormatError::MissingConversion)
        );
        assert_eq!(
            NumberFormat::parse("%f %f"),
            Err(FormatError::ExtraConversion)
        );
        assert_eq!(NumberFormat::parse("%.2"), Err(FormatError::MissingConversion));
    }

    #[test]
    fn axis_values() {
        let f = NumberFormat::parse("%.2f").unwrap();
        assert_eq!(write_value(12500.0, 3, &f, false), "12.50");
        assert_eq!(write_value(0.0042, -3, &f, false), "4.20");
        assert_eq!(write_value(2.0, 0, &f, true), "1e+02");
        assert_eq!(write_value(-1.0, 0, &f, true), "1e-01");
        assert_eq!(write_value(2.0_f64.log10(), 0, &f, true), "2");
        assert_eq!(write_value(1.0 + 1.5_f64.log10(), 0, &f, true), "1.5");
    }

    #[test]
    fn default_matches_two_decimals() {
        assert_eq!(NumberFormat::default(), NumberFormat::parse("%.2f").unwrap());
        assert_eq!(NumberFormat::general(), NumberFormat::parse("%g").unwrap());
        assert_eq!(NumberFormat::general().format(583.0), "583");
        assert_eq!(NumberFormat::general().format(41.25), "41.25");
    }
}
