// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless rendering to documents.

use anyhow::Context;
use xyplot_core::{Dataset, PlotConfig, render};
use xyplot_export::{Destination, PostScriptPainter, SvgPainter};

use crate::cli::Cli;

/// Writes every document requested on the command line.
pub(crate) fn run(cli: &Cli, datasets: &[Dataset], config: &PlotConfig) -> anyhow::Result<()> {
    if let Some(dest) = &cli.ps {
        postscript(&Destination::parse(dest), datasets, config)?;
    }
    if let Some(command) = cli.print_command() {
        postscript(&Destination::Pipe(command), datasets, config)?;
    }
    if let Some(path) = &cli.svg {
        svg(&Destination::File(path.clone()), datasets, config)?;
    }
    Ok(())
}

// Documents are built in memory; the destination is opened only for a
// complete one.
fn postscript(dest: &Destination, datasets: &[Dataset], config: &PlotConfig) -> anyhow::Result<()> {
    let mut painter = PostScriptPainter::new(Vec::new(), config.size)?;
    render(&mut painter, datasets, config, None).context("cannot render PostScript")?;
    dest.write_document(&painter.finish()?)?;
    tracing::info!(?dest, "PostScript written");
    Ok(())
}

fn svg(dest: &Destination, datasets: &[Dataset], config: &PlotConfig) -> anyhow::Result<()> {
    let mut painter = SvgPainter::new(Vec::new(), config.size)?;
    render(&mut painter, datasets, config, None).context("cannot render SVG")?;
    dest.write_document(&painter.finish()?)?;
    tracing::info!(?dest, "SVG written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;

    #[test]
    fn writes_both_documents() {
        let dir = std::env::temp_dir().join(format!("xyplot_viewer_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let ps = dir.join("plot.ps");
        let svg_path = dir.join("plot.svg");
        let cli = Cli::try_parse_from([
            "xyplot",
            "--ps",
            ps.to_str().unwrap(),
            "--svg",
            svg_path.to_str().unwrap(),
        ])
        .unwrap();

        let mut ds = Dataset::new("ramp");
        ds.draw_to((0.0, 0.0));
        ds.draw_to((10.0, 10.0));
        run(&cli, &[ds], &cli.config()).unwrap();

        let ps_doc = fs::read_to_string(&ps).unwrap();
        let svg_doc = fs::read_to_string(&svg_path).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert!(ps_doc.contains("(ramp) show"), "{ps_doc}");
        assert!(svg_doc.trim_end().ends_with("</svg>"), "{svg_doc}");
    }

    #[test]
    fn empty_data_is_an_error() {
        let dir = std::env::temp_dir().join(format!("xyplot_viewer_empty_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.svg");
        let err = svg(&Destination::File(path.clone()), &[], &PlotConfig::new()).unwrap_err();
        let created = path.exists();
        fs::remove_dir_all(&dir).unwrap();
        assert!(format!("{err:#}").contains("cannot render SVG"), "{err:#}");
        assert!(!created, "failed render created the file");
    }

    #[test]
    fn failed_render_sends_nothing_to_the_printer() {
        let dir = std::env::temp_dir().join(format!("xyplot_viewer_pipe_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("printed.ps");
        let dest = Destination::parse(&format!("|cat > '{}'", path.display()));

        // The legend column for this name is wider than the page.
        let mut ds = Dataset::new("n".repeat(400));
        ds.draw_to((0.0, 0.0));
        ds.draw_to((1.0, 1.0));
        let err = postscript(&dest, &[ds], &PlotConfig::new()).unwrap_err();
        let sent = fs::read(&path).unwrap_or_default();
        fs::remove_dir_all(&dir).unwrap();

        assert!(format!("{err:#}").contains("cannot render PostScript"), "{err:#}");
        assert!(sent.is_empty(), "{} bytes reached the print command", sent.len());
    }
}
