// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading data files.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The input file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// Reading an open input failed part way through.
    #[error("{input}:{line}: {source}")]
    Read {
        /// Name of the input, as used for dataset names.
        input: String,
        /// One-based number of the line that failed.
        line: usize,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },
}
