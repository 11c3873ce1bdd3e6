// Copyright 2025 the XyPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactive window.

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::anyhow;
use kurbo::{Point, Rect, Size};
use peniko::color::palette::css;
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, AaSupport, RenderParams, Renderer, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};
use xyplot_core::{Dataset, PlotConfig, ViewTransform, render};
use xyplot_text_parley::ParleyTextMeasurer;

use crate::raster::RasterPainter;

/// Drags shorter than this, in pixels, on either axis do not zoom.
const MIN_DRAG: f64 = 3.0;

/// Committed zoom boxes, innermost last.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ZoomStack {
    boxes: Vec<Rect>,
}

impl ZoomStack {
    /// The world box to show, or `None` to fit the data.
    pub(crate) fn current(&self) -> Option<Rect> {
        self.boxes.last().copied()
    }

    pub(crate) fn push(&mut self, world: Rect) {
        self.boxes.push(world);
    }

    /// Returns to the previous level. Returns `false` at the outermost level.
    pub(crate) fn pop(&mut self) -> bool {
        self.boxes.pop().is_some()
    }

    pub(crate) fn depth(&self) -> usize {
        self.boxes.len()
    }
}

/// The world box selected by dragging from `start` to `end`, if the drag is
/// large enough to mean a zoom.
pub(crate) fn drag_zoom(view: &ViewTransform, start: Point, end: Point) -> Option<Rect> {
    if (end.x - start.x).abs() < MIN_DRAG || (end.y - start.y).abs() < MIN_DRAG {
        return None;
    }
    Some(view.world_rect_from_pixels(start, end))
}

/// Maps the digit keys `1` to `9` to dataset indices.
fn dataset_key(key: &str) -> Option<usize> {
    let digit = key.parse::<usize>().ok()?;
    (1..=9).contains(&digit).then(|| digit - 1)
}

/// Shows or hides the dataset at `index`. Returns whether anything changed;
/// the last shown dataset cannot be hidden.
pub(crate) fn toggle_visible(datasets: &mut [Dataset], index: usize) -> bool {
    let shown = datasets.iter().filter(|ds| ds.visible).count();
    let Some(ds) = datasets.get_mut(index) else {
        return false;
    };
    if ds.visible && shown <= 1 {
        return false;
    }
    ds.visible = !ds.visible;
    true
}

/// Window state. The plot is drawn into `scene` once per change and rendered
/// into the surface's target texture; redraws only blit that texture.
pub(crate) struct App {
    datasets: Vec<Dataset>,
    config: PlotConfig,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    render_cx: RenderContext,
    surface: Option<RenderSurface<'static>>,
    renderer: Option<Renderer>,
    scene: Scene,
    text: ParleyTextMeasurer,
    zoom: ZoomStack,
    view: Option<ViewTransform>,
    cursor: Point,
    drag_start: Option<Point>,
    dirty: bool,
    failure: Option<anyhow::Error>,
}

impl core::fmt::Debug for App {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("App")
            .field("datasets", &self.datasets.len())
            .field("zoom", &self.zoom)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl App {
    pub(crate) fn new(datasets: Vec<Dataset>, config: PlotConfig) -> Self {
        Self {
            datasets,
            config,
            window: None,
            window_id: None,
            render_cx: RenderContext::new(),
            surface: None,
            renderer: None,
            scene: Scene::new(),
            text: ParleyTextMeasurer::new(),
            zoom: ZoomStack::default(),
            view: None,
            cursor: Point::ZERO,
            drag_start: None,
            dirty: true,
            failure: None,
        }
    }

    /// The error that closed the window, if any.
    pub(crate) fn finish(self) -> anyhow::Result<()> {
        self.failure.map_or(Ok(()), Err)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(self.config.title.as_str())
                    .with_inner_size(LogicalSize::new(
                        self.config.size.width,
                        self.config.size.height,
                    )),
            )?,
        );
        let size = window.inner_size();
        let surface = pollster::block_on(self.render_cx.create_surface(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
            wgpu::PresentMode::AutoVsync,
        ))?;

        let device_handle = &self.render_cx.devices[surface.dev_id];
        let renderer = Renderer::new(
            &device_handle.device,
            RendererOptions {
                antialiasing_support: AaSupport::all(),
                num_init_threads: NonZeroUsize::new(1),
                ..RendererOptions::default()
            },
        )
        .map_err(|err| anyhow!("cannot create renderer: {err}"))?;

        self.window_id = Some(window.id());
        self.window = Some(window);
        self.surface = Some(surface);
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Marks the plot stale and asks for a redraw.
    fn invalidate(&mut self) {
        self.dirty = true;
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    /// Runs a render pass into the scene.
    fn rebuild_scene(&mut self) {
        let Some(surface) = &self.surface else {
            return;
        };
        let area = Size::new(
            f64::from(surface.config.width),
            f64::from(surface.config.height),
        );
        self.scene.reset();
        let mut painter = RasterPainter::new(&mut self.scene, &self.text, area);
        match render(&mut painter, &self.datasets, &self.config, self.zoom.current()) {
            Ok(view) => self.view = Some(view),
            Err(err) => {
                self.view = None;
                tracing::warn!(%err, "plot not drawn");
            }
        }
    }

    fn redraw(&mut self) {
        let dirty = self.dirty;
        if dirty {
            self.rebuild_scene();
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let device_handle = &self.render_cx.devices[surface.dev_id];

        if dirty {
            let params = RenderParams {
                base_color: css::WHITE,
                width: surface.config.width,
                height: surface.config.height,
                antialiasing_method: AaConfig::Msaa16,
            };
            if let Err(err) = renderer.render_to_texture(
                &device_handle.device,
                &device_handle.queue,
                &self.scene,
                &surface.target_view,
                &params,
            ) {
                tracing::warn!(%err, "render failed");
                return;
            }
            self.dirty = false;
        }

        let surface_texture = match surface.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(err) => {
                tracing::debug!(%err, "surface lost, reconfiguring");
                self.render_cx
                    .resize_surface(surface, surface.config.width, surface.config.height);
                self.dirty = true;
                return;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            device_handle
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("blit"),
                });
        surface.blitter.copy(
            &device_handle.device,
            &mut encoder,
            &surface.target_view,
            &surface_view,
        );
        device_handle.queue.submit([encoder.finish()]);
        surface_texture.present();
    }

    fn end_drag(&mut self) {
        let Some(start) = self.drag_start.take() else {
            return;
        };
        let Some(view) = &self.view else {
            return;
        };
        if let Some(world) = drag_zoom(view, start, self.cursor) {
            tracing::debug!(?world, depth = self.zoom.depth() + 1, "zoom in");
            self.zoom.push(world);
            self.invalidate();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err.context("cannot open the plot window"));
            return;
        }
        self.invalidate();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if Some(id) != self.window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                if let Some(surface) = self.surface.as_mut() {
                    self.render_cx.resize_surface(surface, width, height);
                }
                self.invalidate();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match logical_key.as_ref() {
                Key::Named(NamedKey::Escape) | Key::Character("q" | "c") => event_loop.exit(),
                Key::Character(key) => {
                    if let Some(index) = dataset_key(key)
                        && toggle_visible(&mut self.datasets, index)
                    {
                        let visible = self.datasets[index].visible;
                        tracing::debug!(index, visible, "dataset toggled");
                        self.invalidate();
                    }
                }
                Key::Named(NamedKey::Backspace) => {
                    if self.zoom.pop() {
                        tracing::debug!(depth = self.zoom.depth(), "zoom out");
                        self.invalidate();
                    }
                }
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x, position.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.drag_start = Some(self.cursor),
                ElementState::Released => self.end_drag(),
            },
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}
