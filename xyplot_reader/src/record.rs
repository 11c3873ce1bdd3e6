// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line classification.

use kurbo::Point;

/// A document-level `Word:` directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `Title:` or `TitleText:`.
    Title(&'a str),
    /// `XUnitText:`.
    XUnitText(&'a str),
    /// `YUnitText:`.
    YUnitText(&'a str),
    /// `LargePixels:`, which turns marks on by default.
    LargePixels,
    /// Any other `Word:`. Ignored.
    Unsupported(&'a str),
}

/// One classified line of a data file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Record<'a> {
    /// An empty or all-whitespace line.
    Blank,
    /// A `#` comment.
    Comment,
    /// `x y`: extend the current polyline.
    Draw(Point),
    /// `M x y`: start a new polyline.
    Move(Point),
    /// `T x y text…`: a text annotation.
    Text {
        /// Anchor in data coordinates.
        at: Point,
        /// Everything after the coordinates.
        text: &'a str,
    },
    /// `"name`: renames the current dataset.
    SetName(&'a str),
    /// A `Word:` directive.
    Directive(Directive<'a>),
    /// A `$keyword args…` line. The keyword excludes the `$`.
    Keyword {
        /// The keyword as written.
        name: &'a str,
        /// Everything after the keyword, trimmed.
        args: &'a str,
    },
    /// A coordinate line whose numbers did not parse.
    Malformed(&'a str),
}

/// Classifies one line, without its terminator.
///
/// Classification looks at the first character, then the first word:
/// digits draw, `#` comments, `$` starts a keyword, a letter-initial word
/// ending in `:` is a directive, `M` moves, `T` places text and `"` names the
/// dataset. Anything else is read as a draw.
pub fn classify(line: &str) -> Record<'_> {
    let line = line.trim_end();
    let Some(first) = line.chars().next() else {
        return Record::Blank;
    };
    if first.is_ascii_digit() {
        return draw(line);
    }
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return Record::Blank;
    }
    let word = trimmed.split_whitespace().next().unwrap_or("");

    match first {
        '#' => Record::Comment,
        '$' => Record::Keyword {
            name: &word[1..],
            args: rest_after(line, 1),
        },
        c if c.is_ascii_alphabetic() && word.ends_with(':') => {
            Record::Directive(directive(word, rest_after(line, 1)))
        }
        'M' | 'm' => match coordinates(line, 1) {
            Some(p) => Record::Move(p),
            None => Record::Malformed(line),
        },
        'T' | 't' => match coordinates(line, 1) {
            Some(at) => Record::Text {
                at,
                text: rest_after(line, 3),
            },
            None => Record::Malformed(line),
        },
        '"' => Record::SetName(&line[1..]),
        _ => draw(line),
    }
}

fn draw(line: &str) -> Record<'_> {
    match coordinates(line, 0) {
        Some(p) => Record::Draw(p),
        None => Record::Malformed(line),
    }
}

fn directive<'a>(word: &'a str, rest: &'a str) -> Directive<'a> {
    let is = |name: &str| word.eq_ignore_ascii_case(name);
    if is("Title:") || is("TitleText:") {
        Directive::Title(rest)
    } else if is("XUnitText:") {
        Directive::XUnitText(rest)
    } else if is("YUnitText:") {
        Directive::YUnitText(rest)
    } else if is("LargePixels:") {
        Directive::LargePixels
    } else {
        Directive::Unsupported(word)
    }
}

/// Parses two numbers starting at word `skip`.
fn coordinates(line: &str, skip: usize) -> Option<Point> {
    let mut words = line.split_whitespace().skip(skip);
    let x = words.next()?.parse().ok()?;
    let y = words.next()?.parse().ok()?;
    Some(Point::new(x, y))
}

/// The text after the first `n` whitespace-separated words, trimmed.
pub(crate) fn rest_after(line: &str, n: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..n {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_draw() {
        assert_eq!(classify("1 2"), Record::Draw(Point::new(1.0, 2.0)));
        assert_eq!(classify("-1.5e2\t3"), Record::Draw(Point::new(-150.0, 3.0)));
        assert_eq!(classify("  .5 7 "), Record::Draw(Point::new(0.5, 7.0)));
        assert_eq!(classify("1"), Record::Malformed("1"));
    }

    #[test]
    fn blank_and_comment() {
        assert_eq!(classify(""), Record::Blank);
        assert_eq!(classify("  \t"), Record::Blank);
        assert_eq!(classify("# 1 2"), Record::Comment);
    }

    #[test]
    fn move_and_text() {
        assert_eq!(classify("M 3 4"), Record::Move(Point::new(3.0, 4.0)));
        assert_eq!(classify("m 3 4"), Record::Move(Point::new(3.0, 4.0)));
        assert_eq!(
            classify("T 1 2 peak  value "),
            Record::Text {
                at: Point::new(1.0, 2.0),
                text: "peak  value",
            }
        );
        assert_eq!(classify("M x"), Record::Malformed("M x"));
    }

    #[test]
    fn keywords_keep_their_arguments() {
        assert_eq!(
            classify("$color  dark red"),
            Record::Keyword {
                name: "color",
                args: "dark red",
            }
        );
        assert_eq!(
            classify("$noline"),
            Record::Keyword {
                name: "noline",
                args: "",
            }
        );
    }

    #[test]
    fn directives_win_over_text() {
        assert_eq!(
            classify("TitleText: Run 4"),
            Record::Directive(Directive::Title("Run 4"))
        );
        assert_eq!(
            classify("xunittext: s"),
            Record::Directive(Directive::XUnitText("s"))
        );
        assert_eq!(
            classify("LargePixels: 1"),
            Record::Directive(Directive::LargePixels)
        );
        assert_eq!(
            classify("Device: X11"),
            Record::Directive(Directive::Unsupported("Device:"))
        );
    }

    #[test]
    fn quote_names_the_set() {
        assert_eq!(classify("\"Sensor 2"), Record::SetName("Sensor 2"));
    }

    #[test]
    fn rest_skips_words() {
        assert_eq!(rest_after("  a b   c d ", 2), "c d");
        assert_eq!(rest_after("a", 3), "");
    }
}
