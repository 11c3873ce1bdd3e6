// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Files and piped commands as export targets.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::ExportError;

/// Where an exported document is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// A file, created or truncated.
    File(PathBuf),
    /// A shell command fed the document on its standard input.
    Pipe(String),
}

impl Destination {
    /// Parses a destination: a leading `|` makes the rest a shell command.
    #[must_use]
    pub fn parse(target: &str) -> Self {
        match target.strip_prefix('|') {
            Some(command) => Self::Pipe(command.trim().to_owned()),
            None => Self::File(PathBuf::from(target)),
        }
    }

    /// Writes a complete document.
    ///
    /// The destination is opened only here, after the document exists, so a
    /// plot that fails to render never reaches it. If writing fails the
    /// output is abandoned with [`Output::abort`].
    pub fn write_document(&self, document: &[u8]) -> Result<(), ExportError> {
        let mut out = self.open()?;
        if let Err(err) = out.write_all(document) {
            out.abort();
            return Err(err.into());
        }
        out.finish()
    }

    /// Opens the destination for writing.
    ///
    /// Pipes run through `sh -c`; the child is waited on in
    /// [`Output::finish`] or [`Output::abort`].
    pub fn open(&self) -> Result<Output, ExportError> {
        match self {
            Self::File(path) => {
                let file = File::create(path).map_err(|source| ExportError::Create {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "writing export file");
                Ok(Output::File {
                    path: path.clone(),
                    file: BufWriter::new(file),
                })
            }
            Self::Pipe(command) => {
                let spawn_err = |source| ExportError::Spawn {
                    command: command.clone(),
                    source,
                };
                let mut child = Command::new("sh")
                    .arg("-c")
                    .arg(command)
                    .stdin(Stdio::piped())
                    .spawn()
                    .map_err(spawn_err)?;
                let stdin = child
                    .stdin
                    .take()
                    .ok_or_else(|| spawn_err(io::Error::other("no stdin handle")))?;
                tracing::debug!(command = %command, pid = child.id(), "piping export");
                Ok(Output::Pipe {
                    command: command.clone(),
                    child,
                    stdin: BufWriter::new(stdin),
                })
            }
        }
    }
}

impl From<&str> for Destination {
    fn from(target: &str) -> Self {
        Self::parse(target)
    }
}

/// An open [`Destination`].
#[derive(Debug)]
pub enum Output {
    /// A buffered file.
    File {
        /// Where the file was created.
        path: PathBuf,
        /// The open file.
        file: BufWriter<File>,
    },
    /// A running command and its buffered standard input.
    Pipe {
        /// The shell command line.
        command: String,
        /// The running process.
        child: Child,
        /// Its standard input.
        stdin: BufWriter<ChildStdin>,
    },
}

impl Output {
    /// Flushes the output; for a pipe, closes its input and waits for the
    /// command to exit.
    ///
    /// A non-zero exit status is logged, not returned.
    pub fn finish(self) -> Result<(), ExportError> {
        match self {
            Self::File { mut file, .. } => {
                file.flush()?;
                Ok(())
            }
            Self::Pipe {
                command,
                mut child,
                stdin,
            } => {
                // Dropping the writer on either branch closes the pipe.
                let closed = stdin
                    .into_inner()
                    .map(drop)
                    .map_err(io::IntoInnerError::into_error);
                let status = child.wait()?;
                if !status.success() {
                    tracing::warn!(command = %command, %status, "export command failed");
                }
                closed.map_err(ExportError::from)
            }
        }
    }

    /// Abandons the output without flushing buffered data.
    ///
    /// A file is removed; a command is killed and waited on.
    pub fn abort(self) {
        match self {
            Self::File { path, file } => {
                drop(file.into_parts());
                if let Err(err) = fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), %err, "cannot remove partial export");
                }
            }
            Self::Pipe {
                command,
                mut child,
                stdin,
            } => {
                drop(stdin.into_parts());
                if let Err(err) = child.kill() {
                    tracing::debug!(command = %command, %err, "export command already exited");
                }
                if let Err(err) = child.wait() {
                    tracing::warn!(command = %command, %err, "cannot reap export command");
                }
            }
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File { file, .. } => file.write(buf),
            Self::Pipe { stdin, .. } => stdin.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File { file, .. } => file.flush(),
            Self::Pipe { stdin, .. } => stdin.flush(),
        }
    }
}
