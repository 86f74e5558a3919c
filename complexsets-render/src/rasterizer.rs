use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use complexsets_core::{ColorGradient, ComplexMap, EscapeEvaluator};

use crate::buffer::{PixelBuffer, RowSegment};
use crate::rect::PixelRect;

/// Timing of a single [`Rasterizer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub pixels: usize,
    pub elapsed: Duration,
    pub workers: usize,
}

impl RenderStats {
    /// Throughput of the render, for diagnostics only.
    pub fn pixels_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pixels as f64 / secs
        } else {
            0.0
        }
    }
}

/// Fills rectangles of a [`PixelBuffer`] on a fixed pool of worker threads.
///
/// The pool is built once and reused by every render. Each call cuts the
/// target rectangle into one strip per worker, dispatches the strips as
/// scoped tasks and returns only after all of them finish.
pub struct Rasterizer {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl Rasterizer {
    /// Build a pool with `workers` threads, or one per hardware thread when
    /// `workers` is `None`.
    pub fn new(workers: Option<NonZeroUsize>) -> crate::Result<Self> {
        let workers = workers
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("raster-{i}"))
            .build()?;
        debug!(workers, "Render worker pool ready");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Compute every pixel of `target` into `buffer`.
    ///
    /// `target` must lie within the buffer; out-of-range rectangles are a
    /// caller bug, not an input this method repairs.
    pub fn render(
        &self,
        buffer: &mut PixelBuffer,
        target: PixelRect,
        evaluator: &EscapeEvaluator,
        map: &ComplexMap,
        gradient: &ColorGradient,
    ) -> RenderStats {
        debug_assert!(
            buffer.bounds().contains_rect(&target),
            "render target {target:?} outside {}×{} buffer",
            buffer.width,
            buffer.height
        );
        let start = Instant::now();
        let parts = target.partition(self.workers);
        let segments = buffer.split_parts_mut(&parts);

        self.pool.scope(|scope| {
            for part_segments in segments {
                scope.spawn(move |_| fill_segments(part_segments, evaluator, map, gradient));
            }
        });

        let stats = RenderStats {
            pixels: target.pixel_count(),
            elapsed: start.elapsed(),
            workers: parts.len(),
        };
        debug!(
            x = target.x,
            y = target.y,
            width = target.width,
            height = target.height,
            workers = stats.workers,
            "Rendered rectangle"
        );
        stats
    }
}

/// Worker body: evaluate and color every pixel of the given segments.
fn fill_segments(
    segments: Vec<RowSegment<'_>>,
    evaluator: &EscapeEvaluator,
    map: &ComplexMap,
    gradient: &ColorGradient,
) {
    for segment in segments {
        let py = segment.y as f64;
        for (i, pixel) in segment.pixels.iter_mut().enumerate() {
            let px = (segment.x as usize + i) as f64;
            *pixel = gradient.pixel_at(evaluator.evaluate(map.to_complex(px, py)));
        }
    }
}

/// Log the throughput of a render that covered the whole buffer.
pub(crate) fn log_full_render(stats: &RenderStats) {
    info!(
        elapsed_ms = stats.elapsed.as_millis(),
        pixels = stats.pixels,
        pixels_per_sec = stats.pixels_per_second().round(),
        workers = stats.workers,
        "Render complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use complexsets_core::{EscapeParams, Pixel};

    fn single_threaded(
        buffer: &PixelBuffer,
        evaluator: &EscapeEvaluator,
        map: &ComplexMap,
        gradient: &ColorGradient,
    ) -> Vec<Pixel> {
        let mut out = Vec::with_capacity(buffer.pixels.len());
        for py in 0..buffer.height {
            for px in 0..buffer.width {
                let c = map.to_complex(px as f64, py as f64);
                out.push(gradient.pixel_at(evaluator.evaluate(c)));
            }
        }
        out
    }

    #[test]
    fn full_render_matches_sequential_reference() {
        let map = ComplexMap::new(96, 64);
        let evaluator = EscapeEvaluator::default();
        let gradient = ColorGradient::default();
        let mut buffer = PixelBuffer::new(96, 64);
        let bounds = buffer.bounds();

        for workers in [1, 3, 8] {
            let raster = Rasterizer::new(NonZeroUsize::new(workers)).unwrap();
            let stats = raster.render(&mut buffer, bounds, &evaluator, &map, &gradient);
            assert_eq!(stats.pixels, 96 * 64);
            assert_eq!(stats.workers, workers);
            assert_eq!(
                buffer.pixels,
                single_threaded(&buffer, &evaluator, &map, &gradient)
            );
        }
    }

    #[test]
    fn sub_rectangle_render_touches_only_target() {
        let map = ComplexMap::new(40, 30);
        let evaluator = EscapeEvaluator::new(EscapeParams::new(50, 100.0).unwrap());
        let gradient = ColorGradient::default();
        let raster = Rasterizer::new(NonZeroUsize::new(4)).unwrap();

        let mut buffer = PixelBuffer::new(40, 30);
        let target = PixelRect::new(5, 3, 17, 11);
        raster.render(&mut buffer, target, &evaluator, &map, &gradient);

        let reference = single_threaded(&buffer, &evaluator, &map, &gradient);
        for y in 0..30 {
            for x in 0..40 {
                let idx = (y * 40 + x) as usize;
                if target.contains_rect(&PixelRect::new(x, y, 1, 1)) {
                    assert_eq!(buffer.pixels[idx], reference[idx], "({x}, {y})");
                    assert_eq!(buffer.pixels[idx].a, 255);
                } else {
                    assert_eq!(buffer.pixels[idx], Pixel::UNRENDERED, "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn empty_target_is_a_no_op() {
        let raster = Rasterizer::new(None).unwrap();
        assert!(raster.workers() >= 1);
        let mut buffer = PixelBuffer::new(8, 8);
        let stats = raster.render(
            &mut buffer,
            PixelRect::new(3, 3, 0, 5),
            &EscapeEvaluator::default(),
            &ComplexMap::new(8, 8),
            &ColorGradient::default(),
        );
        assert_eq!(stats.pixels, 0);
        assert_eq!(stats.workers, 0);
        assert!(buffer.pixels.iter().all(|&p| p == Pixel::UNRENDERED));
    }

    #[test]
    fn throughput_handles_zero_elapsed() {
        let stats = RenderStats {
            pixels: 100,
            elapsed: Duration::ZERO,
            workers: 1,
        };
        assert_eq!(stats.pixels_per_second(), 0.0);
        let stats = RenderStats {
            elapsed: Duration::from_millis(500),
            ..stats
        };
        assert!((stats.pixels_per_second() - 200.0).abs() < 1e-9);
    }
}
