// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening or writing an export destination.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output file could not be created.
    #[error("cannot create {}: {source}", path.display())]
    Create {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// The command of a `|command` destination could not be started.
    #[error("cannot start `{command}`: {source}")]
    Spawn {
        /// The shell command line.
        command: String,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// Writing to an open destination failed.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}
