use std::time::Duration;

use tracing::{debug, info};

use complexsets_core::{ColorGradient, Complex, ComplexMap, EscapeEvaluator, EscapeParams};

use crate::buffer::PixelBuffer;
use crate::rasterizer::{log_full_render, Rasterizer, RenderStats};
use crate::rect::PixelRect;

/// Snapshot of everything that determines the rendered image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    pub translation: Complex,
    pub iteration_budget: u32,
    pub escape_radius: f64,
}

/// Window position and size as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlacement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Owns the view and the pixel buffer, and keeps the buffer in sync with
/// every view change.
///
/// Each operation is a plain function of the previous state and the user
/// input. Most invalidate every pixel and re-render the whole buffer; a pan
/// instead moves the pixels that are still valid and renders only the
/// strips it exposed.
///
/// Pixel coordinates passed in (cursor positions, rectangle corners) are
/// taken as given by the presentation layer; they are expected to be finite
/// and are not clamped to the buffer.
pub struct ViewportController {
    map: ComplexMap,
    evaluator: EscapeEvaluator,
    gradient: ColorGradient,
    rasterizer: Rasterizer,
    buffer: PixelBuffer,
    generation: u64,
    saved_placement: Option<WindowPlacement>,
    last_render: Option<RenderStats>,
}

impl ViewportController {
    /// Create a controller showing the default view and render it.
    pub fn new(
        width: u32,
        height: u32,
        params: EscapeParams,
        gradient: ColorGradient,
        rasterizer: Rasterizer,
    ) -> Self {
        let map = ComplexMap::new(width, height);
        let mut controller = Self {
            buffer: PixelBuffer::new(map.width, map.height),
            map,
            evaluator: EscapeEvaluator::new(params.with_iteration_budget(
                params.iteration_budget.max(1),
            )),
            gradient,
            rasterizer,
            generation: 0,
            saved_placement: None,
            last_render: None,
        };
        controller.render_full();
        controller
    }

    // -- Accessors --

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn map(&self) -> &ComplexMap {
        &self.map
    }

    pub fn view_state(&self) -> ViewState {
        let params = self.evaluator.params();
        ViewState {
            zoom: self.map.zoom,
            translation: self.map.translation,
            iteration_budget: params.iteration_budget,
            escape_radius: params.escape_radius,
        }
    }

    /// Incremented whenever the buffer contents change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Timing of the most recent operation's rendering work.
    pub fn last_render(&self) -> Option<RenderStats> {
        self.last_render
    }

    pub fn is_fullscreen(&self) -> bool {
        self.saved_placement.is_some()
    }

    // -- View operations --

    /// Drag the content by `(dx, dy)` pixels (positive `dy` is downward).
    pub fn pan(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        self.map.pan(dx, dy);

        let (w, h) = (self.buffer.width, self.buffer.height);
        let (adx, ady) = (dx.unsigned_abs(), dy.unsigned_abs());
        if adx >= w || ady >= h {
            debug!(dx, dy, "Pan exceeds viewport, rendering everything");
            self.render_full();
            return;
        }

        self.buffer.shift(dx, dy);
        let columns = PixelRect::new(if dx > 0 { 0 } else { w - adx }, 0, adx, h);
        let rows = PixelRect::new(
            if dx > 0 { adx } else { 0 },
            if dy > 0 { 0 } else { h - ady },
            w - adx,
            ady,
        );
        debug!(dx, dy, ?columns, ?rows, "Panned, rendering exposed strips");
        self.render_rects(&[columns, rows]);
    }

    /// Scale the view by `1 / factor` around the pixel under `cursor`.
    pub fn zoom_at_point(&mut self, factor: f64, cursor: (f64, f64)) {
        self.map.zoom_at(factor, cursor);
        debug!(factor, zoom = self.map.zoom, "Zoom at point");
        self.render_full();
    }

    /// Fit the dragged rectangle with corners `a` and `b` to the viewport,
    /// or with `zoom_out` shrink the current view into it.
    pub fn zoom_to_rect(&mut self, a: (f64, f64), b: (f64, f64), zoom_out: bool) {
        self.map.zoom_to_rect(a, b, zoom_out);
        self.render_full();
    }

    /// Return to the default framing.
    pub fn reset(&mut self) {
        self.map.reset();
        debug!("View reset");
        self.render_full();
    }

    /// Show an explicit view, e.g. one restored from preferences.
    /// Non-positive or non-finite zoom values are ignored.
    pub fn jump_to(&mut self, zoom: f64, translation: Complex) {
        if !(zoom > 0.0 && zoom.is_finite()) || !translation.is_finite() {
            debug!(zoom, %translation, "Ignoring invalid view");
            return;
        }
        self.map.zoom = zoom;
        self.map.translation = translation;
        self.render_full();
    }

    /// Reallocate the buffer for a new size (each side at least one pixel).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.map.resize(width, height);
        self.buffer = PixelBuffer::new(self.map.width, self.map.height);
        debug!(width = self.map.width, height = self.map.height, "Resized");
        self.render_full();
    }

    /// Replace the iteration budget (at least one iteration).
    pub fn set_iteration_budget(&mut self, budget: u32) {
        let budget = budget.max(1);
        let params = self.evaluator.params().with_iteration_budget(budget);
        self.evaluator = EscapeEvaluator::new(params);
        info!(iteration_budget = budget, "Iteration budget changed");
        self.render_full();
    }

    /// Multiply the iteration budget, rounding and clamping to at least one.
    pub fn scale_iteration_budget(&mut self, multiply_by: f64) {
        if !multiply_by.is_finite() {
            return;
        }
        let current = self.evaluator.params().iteration_budget as f64;
        let next = (current * multiply_by).round().clamp(1.0, u32::MAX as f64) as u32;
        self.set_iteration_budget(next);
    }

    /// Enter or leave fullscreen using a one-slot placement memory.
    ///
    /// Entering saves `current` and resizes to `monitor`; leaving restores
    /// the saved placement. Returns the placement the window should adopt.
    pub fn toggle_fullscreen(
        &mut self,
        current: WindowPlacement,
        monitor: (u32, u32),
    ) -> WindowPlacement {
        let next = match self.saved_placement.take() {
            Some(previous) => previous,
            None => {
                self.saved_placement = Some(current);
                WindowPlacement {
                    x: 0,
                    y: 0,
                    width: monitor.0,
                    height: monitor.1,
                }
            }
        };
        debug!(fullscreen = self.is_fullscreen(), ?next, "Fullscreen toggled");
        self.resize(next.width, next.height);
        next
    }

    // -- Rendering --

    fn render_full(&mut self) {
        let bounds = self.buffer.bounds();
        let stats = self.rasterizer.render(
            &mut self.buffer,
            bounds,
            &self.evaluator,
            &self.map,
            &self.gradient,
        );
        log_full_render(&stats);
        self.last_render = Some(stats);
        self.generation += 1;
    }

    fn render_rects(&mut self, rects: &[PixelRect]) {
        let mut total = RenderStats {
            pixels: 0,
            elapsed: Duration::ZERO,
            workers: 0,
        };
        for rect in rects.iter().filter(|r| !r.is_empty()) {
            let stats = self.rasterizer.render(
                &mut self.buffer,
                *rect,
                &self.evaluator,
                &self.map,
                &self.gradient,
            );
            total.pixels += stats.pixels;
            total.elapsed += stats.elapsed;
            total.workers = total.workers.max(stats.workers);
        }
        self.last_render = Some(total);
        self.generation += 1;
    }
}
