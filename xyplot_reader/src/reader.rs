// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::mem;
use std::path::{Path, PathBuf};

use kurbo::Point;
use xyplot_core::{Dataset, DatasetStyle, LineStyle, MarkType, PlotConfig, TriState, set_color};

use crate::ReadError;
use crate::color::color_from_name;
use crate::record::{Directive, Record, classify};

/// Name given to datasets read from standard input.
pub const STDIN_NAME: &str = "(stdin)";

/// Document-level settings found in data files.
///
/// These override the command line, so they are returned separately and
/// applied with [`Directives::apply`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    /// From `Title:`, `TitleText:` or `$title`.
    pub title: Option<String>,
    /// From `XUnitText:`.
    pub x_unit: Option<String>,
    /// From `YUnitText:`.
    pub y_unit: Option<String>,
    /// `LargePixels:` was seen.
    pub large_pixels: bool,
}

impl Directives {
    /// Writes the directives that were set into `config`.
    pub fn apply(&self, config: &mut PlotConfig) {
        if let Some(title) = &self.title {
            config.title.clone_from(title);
        }
        if let Some(unit) = &self.x_unit {
            config.x_axis.label.clone_from(unit);
        }
        if let Some(unit) = &self.y_unit {
            config.y_axis.label.clone_from(unit);
        }
        if self.large_pixels {
            config.draw_marks = true;
        }
    }
}

/// Accumulates datasets over one or more inputs.
///
/// Every input starts a new dataset named after it, and so does a blank line
/// once the current dataset has points. Datasets that end up without ops are
/// dropped by [`DataReader::finish`].
#[derive(Debug)]
pub struct DataReader<'c> {
    config: &'c PlotConfig,
    names: BTreeMap<usize, String>,
    datasets: Vec<Dataset>,
    current: Dataset,
    input: String,
    directives: Directives,
}

impl<'c> DataReader<'c> {
    /// Creates a reader that maps coordinates for the axes in `config`.
    #[must_use]
    pub fn new(config: &'c PlotConfig) -> Self {
        Self {
            config,
            names: BTreeMap::new(),
            datasets: Vec::new(),
            current: fresh_set(0, String::new()),
            input: String::new(),
            directives: Directives::default(),
        }
    }

    /// Names the dataset at `index` (counting from zero) regardless of its
    /// input.
    #[must_use]
    pub fn with_name(mut self, index: usize, name: impl Into<String>) -> Self {
        self.names.insert(index, name.into());
        self
    }

    /// Reads one file.
    pub fn read_path(&mut self, path: &Path) -> Result<(), ReadError> {
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_owned(),
            source,
        })?;
        self.read(BufReader::new(file), &path.display().to_string())
    }

    /// Reads standard input.
    pub fn read_stdin(&mut self) -> Result<(), ReadError> {
        self.read(io::stdin().lock(), STDIN_NAME)
    }

    /// Reads one input named `input`.
    pub fn read<R: BufRead>(&mut self, reader: R, input: &str) -> Result<(), ReadError> {
        input.clone_into(&mut self.input);
        self.start_set();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ReadError::Read {
                input: input.to_owned(),
                line: index + 1,
                source,
            })?;
            self.line(&line, index + 1);
        }
        tracing::debug!(input, datasets = self.datasets.len() + 1, "input read");
        Ok(())
    }

    /// Returns the non-empty datasets and the directives seen.
    #[must_use]
    pub fn finish(mut self) -> (Vec<Dataset>, Directives) {
        if !self.current.is_empty() {
            self.datasets.push(self.current);
        }
        (self.datasets, self.directives)
    }

    fn start_set(&mut self) {
        let index = self.datasets.len() + usize::from(!self.current.is_empty());
        let name = self
            .names
            .get(&index)
            .cloned()
            .unwrap_or_else(|| self.input.clone());
        let done = mem::replace(&mut self.current, fresh_set(index, name));
        if !done.is_empty() {
            self.datasets.push(done);
        }
    }

    fn line(&mut self, line: &str, number: usize) {
        match classify(line) {
            Record::Blank => {
                if !self.current.is_empty() {
                    self.start_set();
                }
            }
            Record::Comment => {}
            Record::Draw(p) => {
                if let Some(p) = self.data_point(p, number) {
                    self.current.draw_to(p);
                }
            }
            Record::Move(p) => {
                if let Some(p) = self.data_point(p, number) {
                    self.current.move_to(p);
                }
            }
            Record::Text { at, text } => {
                if let Some(at) = self.data_point(at, number) {
                    self.current.text(at, text);
                }
            }
            Record::SetName(name) => name.clone_into(&mut self.current.name),
            Record::Directive(directive) => self.directive(directive, number),
            Record::Keyword { name, args } => self.keyword(name, args, number),
            Record::Malformed(text) => {
                tracing::warn!(input = %self.input, line = number, text, "unreadable coordinates");
            }
        }
    }

    fn directive(&mut self, directive: Directive<'_>, number: usize) {
        match directive {
            Directive::Title(text) => self.directives.title = Some(text.to_owned()),
            Directive::XUnitText(text) => self.directives.x_unit = Some(text.to_owned()),
            Directive::YUnitText(text) => self.directives.y_unit = Some(text.to_owned()),
            Directive::LargePixels => self.directives.large_pixels = true,
            Directive::Unsupported(word) => {
                tracing::warn!(input = %self.input, line = number, word, "unsupported directive");
            }
        }
    }

    fn keyword(&mut self, name: &str, args: &str, number: usize) {
        let first = args.split_whitespace().next().unwrap_or("");
        match name.to_ascii_lowercase().as_str() {
            "lw" => {
                if let Some(width) = self.number(first, name, number) {
                    self.current.style.line_width = width;
                }
            }
            "mark_size" => {
                if let Some(size) = self.number(first, name, number) {
                    self.current.style.mark_size = Some(size);
                }
            }
            "text_size" => {
                if let Some(size) = self.number(first, name, number) {
                    self.current.style.text_size = size;
                }
            }
            "color" => {
                if let Some(color) = self.color(first, number) {
                    self.current.style.color = color;
                }
            }
            "outline_color" => {
                if let Some(color) = self.color(first, number) {
                    self.current.style.outline_color = Some(color);
                }
            }
            "marks" => {
                self.current.style.draw_marks = TriState::On;
                if !first.is_empty() {
                    let mark = MarkType::from_name(first).unwrap_or_else(|| {
                        tracing::warn!(
                            input = %self.input,
                            line = number,
                            mark = first,
                            "unknown mark, using circle"
                        );
                        MarkType::Circle
                    });
                    self.current.style.mark_type = Some(mark);
                }
            }
            "nomark" => self.current.style.draw_marks = TriState::Off,
            "line" => self.current.style.draw_lines = TriState::On,
            "noline" => self.current.style.draw_lines = TriState::Off,
            "polygon" => self.current.style.draw_polygon = TriState::On,
            "scale_marks" => {
                self.current.style.scale_marks = if first.is_empty() {
                    TriState::On
                } else {
                    TriState::from(first.parse::<i64>().is_ok_and(|n| n != 0))
                };
            }
            "line_style" => match LineStyle::from_name(first) {
                Some(line_style) => self.current.style.line_style = line_style,
                None => {
                    tracing::warn!(input = %self.input, line = number, style = first, "unknown line style");
                }
            },
            "name" => args.clone_into(&mut self.current.name),
            "title" => self.directives.title = Some(args.to_owned()),
            "path" => {
                tracing::debug!(input = %self.input, line = number, path = args, "path name ignored");
            }
            "image" | "marks_file" | "low_contrast" => {
                tracing::warn!(input = %self.input, line = number, keyword = name, "unsupported keyword");
            }
            _ => {
                tracing::warn!(input = %self.input, line = number, keyword = name, "unknown keyword");
            }
        }
    }

    fn number(&self, word: &str, keyword: &str, number: usize) -> Option<f64> {
        let value = word.parse().ok().filter(|v: &f64| v.is_finite());
        if value.is_none() {
            tracing::warn!(input = %self.input, line = number, keyword, value = word, "bad number");
        }
        value
    }

    fn color(&self, name: &str, number: usize) -> Option<peniko::Color> {
        let color = color_from_name(name);
        if color.is_none() {
            tracing::warn!(input = %self.input, line = number, color = name, "unknown color");
        }
        color
    }

    /// Maps `p` into the space the axes are drawn in.
    fn data_point(&self, p: Point, number: usize) -> Option<Point> {
        let x = self.axis_value(p.x, self.config.x_axis.log, number)?;
        let y = self.axis_value(p.y, self.config.y_axis.log, number)?;
        Some(Point::new(x, y))
    }

    fn axis_value(&self, v: f64, log: bool, number: usize) -> Option<f64> {
        if !log {
            return Some(v);
        }
        if v <= 0.0 {
            tracing::warn!(
                input = %self.input,
                line = number,
                value = v,
                "non-positive value on a logarithmic axis skipped"
            );
            return None;
        }
        Some(v.log10())
    }
}

fn fresh_set(index: usize, name: String) -> Dataset {
    Dataset::new(name).with_style(DatasetStyle {
        color: set_color(index),
        ..DatasetStyle::default()
    })
}

/// Reads every path in order, or standard input when `paths` is empty.
///
/// A path of `-` also reads standard input. Files that cannot be opened are
/// skipped with a warning. `names` assigns names to datasets by index.
pub fn read_sources(
    paths: &[PathBuf],
    config: &PlotConfig,
    names: &[(usize, String)],
) -> Result<(Vec<Dataset>, Directives), ReadError> {
    let mut reader = names
        .iter()
        .fold(DataReader::new(config), |r, (index, name)| {
            r.with_name(*index, name.clone())
        });
    if paths.is_empty() {
        reader.read_stdin()?;
    }
    for path in paths {
        let result = if path.as_os_str() == "-" {
            reader.read_stdin()
        } else {
            reader.read_path(path)
        };
        match result {
            Err(err @ ReadError::Open { .. }) => tracing::warn!(%err, "input skipped"),
            other => other?,
        }
    }
    Ok(reader.finish())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use peniko::color::palette::css;
    use xyplot_core::Axis;

    use super::*;

    fn read(text: &str, config: &PlotConfig) -> (Vec<Dataset>, Directives) {
        let mut reader = DataReader::new(config);
        reader.read(text.as_bytes(), "data.xy").unwrap();
        reader.finish()
    }

    #[test]
    fn blank_lines_split_sets() {
        let (sets, _) = read("0 0\n1 1\n\n\n2 2\n3 3\n\n", &PlotConfig::new());
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].ops.len(), 2);
        assert_eq!(sets[0].name, "data.xy");
        assert_eq!(sets[0].style.color, css::RED);
        assert_eq!(sets[1].style.color, css::GREEN);
        assert_eq!(sets[1].ops[0], xyplot_core::DrawOp::Draw(Point::new(2.0, 2.0)));
    }

    #[test]
    fn each_input_starts_a_set() {
        let config = PlotConfig::new();
        let mut reader = DataReader::new(&config).with_name(1, "second");
        reader.read("0 0\n1 1\n".as_bytes(), "a").unwrap();
        reader.read("\n# only a comment\n".as_bytes(), "b").unwrap();
        reader.read("5 5\n".as_bytes(), "c").unwrap();
        let (sets, _) = reader.finish();
        let names: Vec<_> = sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "second"]);
        assert_eq!(sets[1].style.color, css::GREEN);
    }

    #[test]
    fn keywords_style_the_current_set() {
        let text = "\
$color blue
$outline_color orange
$marks square
$lw 2.5
$mark_size 4
$text_size 9
$noline
$polygon
$scale_marks 0
$line_style dash
$name Sensor 2
0 0
";
        let (sets, _) = read(text, &PlotConfig::new());
        let style = sets[0].style;
        assert_eq!(style.color.to_rgba8(), css::BLUE.to_rgba8());
        assert_eq!(style.outline_color.map(|c| c.to_rgba8()), Some(css::ORANGE.to_rgba8()));
        assert_eq!(style.mark_type, Some(MarkType::Square));
        assert_eq!(style.draw_marks, TriState::On);
        assert_eq!(style.line_width, 2.5);
        assert_eq!(style.mark_size, Some(4.0));
        assert_eq!(style.text_size, 9.0);
        assert_eq!(style.draw_lines, TriState::Off);
        assert_eq!(style.draw_polygon, TriState::On);
        assert_eq!(style.scale_marks, TriState::Off);
        assert_eq!(style.line_style, LineStyle::Dash);
        assert_eq!(sets[0].name, "Sensor 2");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let text = "$MARKS blob\n$lw wide\n$color nope\n$frobnicate 3\n$scale_marks\n1 1\n";
        let (sets, _) = read(text, &PlotConfig::new());
        let style = sets[0].style;
        assert_eq!(style.mark_type, Some(MarkType::Circle));
        assert_eq!(style.line_width, 1.0);
        assert_eq!(style.color, css::RED);
        assert_eq!(style.scale_marks, TriState::On);
    }

    #[test]
    fn moves_text_and_names() {
        let (sets, _) = read("\"Peak\nM 1 2\n3 4\nT 3 4 max here\n", &PlotConfig::new());
        assert_eq!(sets[0].name, "Peak");
        assert_eq!(
            sets[0].ops,
            [
                xyplot_core::DrawOp::Move(Point::new(1.0, 2.0)),
                xyplot_core::DrawOp::Draw(Point::new(3.0, 4.0)),
                xyplot_core::DrawOp::Text {
                    at: Point::new(3.0, 4.0),
                    text: "max here".into(),
                },
            ]
        );
    }

    #[test]
    fn directives_override_config() {
        let text = "TitleText: Run 4\nXUnitText: s\nYUnitText: mV\nLargePixels: 1\nDevice: X\n0 0\n";
        let (_, directives) = read(text, &PlotConfig::new());
        let mut config = PlotConfig::new().with_title("cli");
        directives.apply(&mut config);
        assert_eq!(config.title, "Run 4");
        assert_eq!(config.axis(Axis::X).label, "s");
        assert_eq!(config.axis(Axis::Y).label, "mV");
        assert!(config.draw_marks, "LargePixels turns marks on");
    }

    #[test]
    fn log_axes_map_and_skip() {
        let config = PlotConfig::new()
            .with_y_axis(xyplot_core::AxisConfig::new("Y").with_log(true));
        let (sets, _) = read("1 100\n2 0\n3 -1\n4 1000\n", &config);
        let points: Vec<_> = sets[0].ops.iter().map(|op| op.point()).collect();
        assert_eq!(points.len(), 2);
        assert!((points[0].y - 2.0).abs() < 1e-12, "{points:?}");
        assert!((points[1].y - 3.0).abs() < 1e-12, "{points:?}");
        assert_eq!(points[1].x, 4.0);
    }

    #[test]
    fn empty_input_gives_no_sets() {
        let (sets, _) = read("# nothing\n\n$color blue\n", &PlotConfig::new());
        assert!(sets.is_empty(), "{sets:?}");
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = std::env::temp_dir().join(format!("xyplot_reader_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.xy");
        fs::write(&good, "0 0\n1 2\n").unwrap();
        let paths = [dir.join("missing.xy"), good.clone()];

        let (sets, _) = read_sources(&paths, &PlotConfig::new(), &[(0, "renamed".into())]).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "renamed");
        assert_eq!(sets[0].ops.len(), 2);
    }

    #[test]
    fn open_failure_names_the_path() {
        let config = PlotConfig::new();
        let mut reader = DataReader::new(&config);
        let err = reader.read_path(Path::new("/nonexistent/xyplot.xy")).unwrap_err();
        assert!(err.to_string().starts_with("cannot open /nonexistent/xyplot.xy"), "{err}");
    }
}
