// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line options.

use std::path::PathBuf;

use clap::Parser;
use kurbo::Size;
use xyplot_core::{AxisConfig, Dataset, MarkType, PlotConfig};

/// Plot xgraph-style data files.
#[derive(Parser, Clone, Debug)]
#[command(name = "xyplot", version)]
#[command(about = "Plot x-y data files in a window, or export them to PostScript or SVG")]
pub(crate) struct Cli {
    /// Data files; standard input when none are given or for `-`
    pub(crate) files: Vec<PathBuf>,

    /// Draw marks at every point
    #[arg(short = 'P', long)]
    pub(crate) marks: bool,

    /// Do not connect points
    #[arg(long)]
    pub(crate) no_lines: bool,

    /// Plot title
    #[arg(short, long)]
    pub(crate) title: Option<String>,

    /// printf-style format for x labels
    #[arg(long, default_value = "%.2f")]
    pub(crate) xfmt: String,

    /// printf-style format for y labels
    #[arg(long, default_value = "%.2f")]
    pub(crate) yfmt: String,

    /// Logarithmic x axis
    #[arg(long)]
    pub(crate) lnx: bool,

    /// Logarithmic y axis
    #[arg(long)]
    pub(crate) lny: bool,

    /// X unit text
    #[arg(short = 'x', long = "x-unit", default_value = "X")]
    pub(crate) x_unit: String,

    /// Y unit text
    #[arg(short = 'y', long = "y-unit", default_value = "Y")]
    pub(crate) y_unit: String,

    /// X range as LOW,HIGH
    #[arg(long, value_name = "LOW,HIGH", value_parser = parse_range, allow_hyphen_values = true)]
    pub(crate) lx: Option<(f64, f64)>,

    /// Y range as LOW,HIGH
    #[arg(long, value_name = "LOW,HIGH", value_parser = parse_range, allow_hyphen_values = true)]
    pub(crate) ly: Option<(f64, f64)>,

    /// Name the dataset at IDX (from zero); may be repeated
    #[arg(long = "name", value_name = "IDX=NAME", value_parser = parse_name)]
    pub(crate) names: Vec<(usize, String)>,

    /// Hide the dataset at IDX (from zero); may be repeated
    #[arg(long = "hide", value_name = "IDX")]
    pub(crate) hidden: Vec<usize>,

    /// Window or page size as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", value_parser = parse_geometry)]
    pub(crate) geometry: Option<Size>,

    /// Draw ticks at the plot edges instead of a full grid
    #[arg(long)]
    pub(crate) ticks: bool,

    /// Draw a box around the plot
    #[arg(long)]
    pub(crate) bbox: bool,

    /// Default mark: circle, fcircle, square, fsquare, pixel or 1 to 5
    #[arg(long, value_parser = parse_mark_type)]
    pub(crate) mark_type: Option<MarkType>,

    /// Default mark size in pixels
    #[arg(long)]
    pub(crate) mark_size: Option<f64>,

    /// Interpret mark sizes in data units
    #[arg(long)]
    pub(crate) scale_marks: bool,

    /// Write PostScript to a file, or to a command given as `|command`
    #[arg(long, value_name = "DEST")]
    pub(crate) ps: Option<String>,

    /// Write SVG to a file
    #[arg(long, value_name = "FILE")]
    pub(crate) svg: Option<PathBuf>,

    /// Send PostScript to `lpr`, optionally to a named printer
    #[arg(long, value_name = "PRINTER", num_args = 0..=1, default_missing_value = "")]
    pub(crate) print: Option<String>,
}

impl Cli {
    /// The plot configuration these options describe.
    pub(crate) fn config(&self) -> PlotConfig {
        let mut x_axis = AxisConfig::new(self.x_unit.as_str())
            .with_format(self.xfmt.as_str())
            .with_log(self.lnx);
        if let Some((low, high)) = self.lx {
            x_axis = x_axis.with_range(low, high);
        }
        let mut y_axis = AxisConfig::new(self.y_unit.as_str())
            .with_format(self.yfmt.as_str())
            .with_log(self.lny);
        if let Some((low, high)) = self.ly {
            y_axis = y_axis.with_range(low, high);
        }

        let defaults = PlotConfig::new();
        let mut config = defaults
            .clone()
            .with_x_axis(x_axis)
            .with_y_axis(y_axis)
            .with_lines(!self.no_lines)
            .with_marks(self.marks)
            .with_scale_marks(self.scale_marks)
            .with_mark(
                self.mark_type.unwrap_or(defaults.mark_type),
                self.mark_size.unwrap_or(defaults.mark_size),
            )
            .with_ticks(self.ticks)
            .with_bounding_box(self.bbox);
        if let Some(title) = &self.title {
            config = config.with_title(title.as_str());
        }
        if let Some(size) = self.geometry {
            config = config.with_size(size);
        }
        config
    }

    /// Hides the datasets named by `--hide`.
    pub(crate) fn hide_datasets(&self, datasets: &mut [Dataset]) {
        for &index in &self.hidden {
            match datasets.get_mut(index) {
                Some(ds) => ds.visible = false,
                None => tracing::warn!(index, count = datasets.len(), "no dataset to hide"),
            }
        }
    }

    /// Whether a document export was requested instead of a window.
    pub(crate) fn is_headless(&self) -> bool {
        self.ps.is_some() || self.svg.is_some() || self.print.is_some()
    }

    /// Shell command for `--print`.
    pub(crate) fn print_command(&self) -> Option<String> {
        self.print.as_deref().map(|printer| {
            if printer.is_empty() {
                String::from("lpr")
            } else {
                format!("lpr -P {printer}")
            }
        })
    }
}

fn parse_range(s: &str) -> Result<(f64, f64), String> {
    let (low, high) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LOW,HIGH, got `{s}`"))?;
    let number = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|err| format!("`{v}`: {err}"))
    };
    Ok((number(low)?, number(high)?))
}

fn parse_name(s: &str) -> Result<(usize, String), String> {
    let (index, name) = s
        .split_once('=')
        .ok_or_else(|| format!("expected IDX=NAME, got `{s}`"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|err| format!("`{index}`: {err}"))?;
    Ok((index, name.to_owned()))
}

fn parse_geometry(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let side = |v: &str| match v.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(f64::from(n)),
        Ok(_) => Err(String::from("size must be positive")),
        Err(err) => Err(format!("`{v}`: {err}")),
    };
    Ok(Size::new(side(w)?, side(h)?))
}

fn parse_mark_type(s: &str) -> Result<MarkType, String> {
    s.parse::<u32>()
        .ok()
        .and_then(MarkType::from_index)
        .or_else(|| MarkType::from_name(s))
        .ok_or_else(|| format!("unknown mark type `{s}`"))
}

#[cfg(test)]
mod tests {
    use xyplot_core::Axis;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("xyplot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_plot_config() {
        let parsed = cli(&[]);
        assert_eq!(parsed.config(), PlotConfig::new());
        assert!(!parsed.is_headless(), "no export requested");
    }

    #[test]
    fn axis_options() {
        let config = cli(&[
            "--lny", "--ly", "1,1000", "--lx", "-5,5", "-x", "time", "--yfmt", "%.1e",
        ])
        .config();
        let y = config.axis(Axis::Y);
        assert!(y.log, "log y");
        assert_eq!(y.range, Some((1.0, 1000.0)));
        assert_eq!(y.format, "%.1e");
        assert_eq!(config.axis(Axis::X).range, Some((-5.0, 5.0)));
        assert_eq!(config.axis(Axis::X).label, "time");
    }

    #[test]
    fn style_options() {
        let config = cli(&[
            "-P",
            "--no-lines",
            "--mark-type",
            "fsquare",
            "--mark-size",
            "3",
            "--geometry",
            "800x400",
            "-t",
            "Run",
        ])
        .config();
        assert!(config.draw_marks && !config.draw_lines, "marks only");
        assert_eq!(config.mark_type, MarkType::FilledSquare);
        assert_eq!(config.mark_size, 3.0);
        assert_eq!(config.size, Size::new(800.0, 400.0));
        assert_eq!(config.title, "Run");
    }

    #[test]
    fn names_and_files() {
        let parsed = cli(&["--name", "0=first", "--name", "2=a=b", "a.xy", "-"]);
        assert_eq!(parsed.names, [(0, "first".to_owned()), (2, "a=b".to_owned())]);
        assert_eq!(parsed.files, [PathBuf::from("a.xy"), PathBuf::from("-")]);
    }

    #[test]
    fn hide_marks_datasets_invisible() {
        let mut sets = vec![Dataset::new("a"), Dataset::new("b")];
        cli(&["--hide", "1", "--hide", "7"]).hide_datasets(&mut sets);
        assert!(sets[0].visible, "a shown");
        assert!(!sets[1].visible, "b hidden");
    }

    #[test]
    fn print_destination() {
        assert_eq!(cli(&["--print"]).print_command().as_deref(), Some("lpr"));
        assert_eq!(
            cli(&["--print", "lab"]).print_command().as_deref(),
            Some("lpr -P lab")
        );
        assert!(cli(&["--svg", "out.svg"]).is_headless(), "svg export");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(parse_range("1;2").is_err(), "missing comma");
        assert!(parse_geometry("0x10").is_err(), "zero width");
        assert!(parse_mark_type("star").is_err(), "unknown mark");
        assert_eq!(parse_mark_type("3"), Ok(MarkType::Circle));
    }
}
