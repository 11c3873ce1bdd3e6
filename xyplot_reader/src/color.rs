// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Parses a color name or CSS color string.
///
/// Besides CSS syntax this accepts the X11 `grayNN`/`greyNN` ramp, where `NN`
/// is a percentage.
pub(crate) fn color_from_name(name: &str) -> Option<Color> {
    if let Some(level) = x11_gray(name) {
        return Some(Color::from_rgb8(level, level, level));
    }
    parse_color(name)
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

fn x11_gray(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    let digits = lower
        .strip_prefix("gray")
        .or_else(|| lower.strip_prefix("grey"))?;
    let percent: u32 = digits.parse().ok().filter(|p| *p <= 100)?;
    u8::try_from((percent * 255 + 50) / 100).ok()
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn css_names_and_hex() {
        let blue = color_from_name("blue").unwrap();
        assert_eq!(blue.to_rgba8(), css::BLUE.to_rgba8());
        let hex = color_from_name("#ff8000").unwrap().to_rgba8();
        assert_eq!((hex.r, hex.g, hex.b), (255, 128, 0));
    }

    #[test]
    fn x11_gray_ramp() {
        assert_eq!(color_from_name("gray50").unwrap().to_rgba8().r, 128);
        assert_eq!(color_from_name("Grey100").unwrap().to_rgba8().g, 255);
        assert_eq!(color_from_name("gray0").unwrap().to_rgba8().b, 0);
        assert!(x11_gray("gray101").is_none(), "percent above 100");
    }

    #[test]
    fn nonsense_is_rejected() {
        assert!(color_from_name("not-a-color").is_none(), "unknown name");
    }
}
