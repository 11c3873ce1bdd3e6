// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `xyplot`: plot xgraph-style data files.
//!
//! Opens a window rendered with Vello. Drag with the left button to zoom,
//! Backspace to zoom back out, digits `1` to `9` to show or hide a dataset,
//! and `q`, `c` or Escape to quit. With `--ps`, `--svg` or `--print` the plot
//! is written as a document instead.

mod app;
mod cli;
mod export;
mod raster;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use winit::event_loop::EventLoop;
use xyplot_reader::read_sources;

use crate::app::App;
use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xyplot=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = cli.config();
    let (mut datasets, directives) = read_sources(&cli.files, &config, &cli.names)?;
    cli.hide_datasets(&mut datasets);
    directives.apply(&mut config);
    config.validate()?;
    tracing::info!(datasets = datasets.len(), title = %config.title, "data read");

    if cli.is_headless() {
        return export::run(&cli, &datasets, &config);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(datasets, config);
    event_loop.run_app(&mut app)?;
    app.finish()
}
