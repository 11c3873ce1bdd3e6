// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reader for xgraph-style data files.
//!
//! A data file is a list of lines, each one of:
//! - `x y` to extend the current polyline, or `M x y` to start a new one;
//! - `T x y text` for an annotation;
//! - `"name` to name the dataset;
//! - `$keyword args` to style it (`$color`, `$marks`, `$lw`, `$line_style` …);
//! - `Word: value` for document settings (`TitleText:`, `XUnitText:` …);
//! - `# comment` or a blank line, which ends the current dataset.
//!
//! ```
//! use xyplot_core::PlotConfig;
//! use xyplot_reader::DataReader;
//!
//! let config = PlotConfig::new();
//! let mut reader = DataReader::new(&config);
//! reader
//!     .read("TitleText: Demo\n$color blue\n0 0\n1 1\n\n0 1\n1 0\n".as_bytes(), "demo.xy")
//!     .unwrap();
//! let (datasets, directives) = reader.finish();
//! assert_eq!(datasets.len(), 2);
//! assert_eq!(directives.title.as_deref(), Some("Demo"));
//! ```

mod color;
mod error;
mod reader;
mod record;

pub use error::ReadError;
pub use reader::{DataReader, Directives, STDIN_NAME, read_sources};
pub use record::{Directive, Record, classify};
