use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;

/// Affine map between pixel coordinates and the complex plane.
///
/// The visible window has half-height `zoom` (in plane units) and is centred
/// on `-translation`. Both axes are scaled by the buffer height, so a wide
/// buffer shows more of the plane horizontally instead of stretching it.
///
/// Pixel `(0, 0)` is the top-left corner; increasing `py` moves down the
/// screen while the imaginary axis points up.
///
/// Pixel arguments are expected to be finite. Callers pass coordinates from
/// the presentation layer as-is; nothing here clamps them to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexMap {
    /// Half-height of the visible window in plane units.
    pub zoom: f64,
    /// Negated plane coordinate of the viewport centre.
    pub translation: Complex,
    pub width: u32,
    pub height: u32,
}

impl ComplexMap {
    /// Half-height that frames the whole Mandelbrot set.
    pub const DEFAULT_ZOOM: f64 = 2.1;
    /// Centres the view on `-0.75 + 0i`.
    pub const DEFAULT_TRANSLATION: Complex = Complex::new(0.75, 0.0);

    /// A map over a `width × height` buffer showing the default view.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_view(width, height, Self::DEFAULT_ZOOM, Self::DEFAULT_TRANSLATION)
    }

    pub fn with_view(width: u32, height: u32, zoom: f64, translation: Complex) -> Self {
        Self {
            zoom,
            translation,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Map (possibly fractional) pixel coordinates to a plane point.
    #[inline]
    pub fn to_complex(&self, px: f64, py: f64) -> Complex {
        let w = self.width as f64;
        let h = self.height as f64;
        Complex::new(
            (2.0 * px - w) / h * self.zoom - self.translation.re,
            (h / 2.0 - py) / h * 2.0 * self.zoom - self.translation.im,
        )
    }

    /// Inverse of [`to_complex`](Self::to_complex).
    #[inline]
    pub fn to_pixel(&self, c: Complex) -> (f64, f64) {
        let w = self.width as f64;
        let h = self.height as f64;
        let px = ((c.re + self.translation.re) / self.zoom * h + w) / 2.0;
        let py = h / 2.0 - (c.im + self.translation.im) / (2.0 * self.zoom) * h;
        (px, py)
    }

    /// The plane point shown at the middle of the buffer.
    pub fn center(&self) -> Complex {
        -self.translation
    }

    /// Scale the window by `1 / factor` while keeping the plane point under
    /// `cursor` fixed.
    ///
    /// The zoom changes first and the translation is corrected afterwards by
    /// the drift of the cursor's plane point; doing it the other way round
    /// pins the wrong point. Non-positive or non-finite factors are ignored.
    pub fn zoom_at(&mut self, factor: f64, cursor: (f64, f64)) {
        if !(factor > 0.0 && factor.is_finite()) {
            debug!(factor, "Ignoring degenerate zoom factor");
            return;
        }
        let before = self.to_complex(cursor.0, cursor.1);
        self.zoom /= factor;
        let after = self.to_complex(cursor.0, cursor.1);
        self.translation += after - before;
    }

    /// Move the view so that content follows a drag of `(dx, dy)` pixels.
    ///
    /// Afterwards pixel `(x, y)` shows the plane point previously at
    /// `(x - dx, y - dy)`; positive `dy` drags downward.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let shift = self.to_complex(dx as f64, dy as f64) - self.to_complex(0.0, 0.0);
        self.translation += shift;
    }

    /// Fit the rectangle spanned by two opposite corners to the viewport.
    ///
    /// The larger of the width and height ratios wins so the aspect ratio is
    /// kept and the whole rectangle stays visible. With `zoom_out` the
    /// current view is instead shrunk into the rectangle. A zero-size drag is
    /// treated as a one-pixel rectangle.
    pub fn zoom_to_rect(&mut self, a: (f64, f64), b: (f64, f64), zoom_out: bool) {
        let rect_w = (a.0 - b.0).abs().max(1.0);
        let rect_h = (a.1 - b.1).abs().max(1.0);
        let scale = (rect_h / self.height as f64).max(rect_w / self.width as f64);

        let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        self.translation = -self.to_complex(center.0, center.1);
        // `zoom` is a half-height, so a smaller window means a smaller value.
        if zoom_out {
            self.zoom /= scale;
        } else {
            self.zoom *= scale;
        }
        debug!(scale, zoom_out, zoom = self.zoom, "Zoomed to rectangle");
    }

    /// Restore the default framing.
    pub fn reset(&mut self) {
        self.zoom = Self::DEFAULT_ZOOM;
        self.translation = Self::DEFAULT_TRANSLATION;
    }

    /// Change the buffer dimensions, clamping each to at least one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_complex(a: Complex, b: Complex) -> bool {
        approx_eq(a.re, b.re) && approx_eq(a.im, b.im)
    }

    #[test]
    fn default_view_centres_on_minus_three_quarters() {
        let map = ComplexMap::new(100, 100);
        let c = map.to_complex(50.0, 50.0);
        assert!(approx_complex(c, Complex::new(-0.75, 0.0)));
        assert_eq!(map.center(), Complex::new(-0.75, 0.0));
    }

    #[test]
    fn corners_follow_screen_orientation() {
        let map = ComplexMap::with_view(200, 100, 1.0, Complex::ZERO);
        // Height is the common scale: the wide buffer spans re in [-2, 2].
        let tl = map.to_complex(0.0, 0.0);
        assert!(approx_complex(tl, Complex::new(-2.0, 1.0)));
        let br = map.to_complex(200.0, 100.0);
        assert!(approx_complex(br, Complex::new(2.0, -1.0)));
    }

    #[test]
    fn round_trip_every_pixel() {
        let map = ComplexMap::with_view(64, 48, 0.37, Complex::new(0.31, -0.12));
        for y in 0..48 {
            for x in 0..64 {
                let (px, py) = map.to_pixel(map.to_complex(x as f64, y as f64));
                assert!(approx_eq(px, x as f64), "x: {px} vs {x}");
                assert!(approx_eq(py, y as f64), "y: {py} vs {y}");
            }
        }
    }

    #[test]
    fn zoom_at_keeps_cursor_point_fixed() {
        let mut map = ComplexMap::new(320, 240);
        for &(factor, cursor) in &[(1.1, (10.0, 200.0)), (0.5, (300.0, 3.0)), (4.0, (160.0, 120.0))] {
            let before = map.to_complex(cursor.0, cursor.1);
            map.zoom_at(factor, cursor);
            let after = map.to_complex(cursor.0, cursor.1);
            assert!(approx_complex(before, after), "{before} moved to {after}");
        }
        assert!(approx_eq(map.zoom, ComplexMap::DEFAULT_ZOOM / (1.1 * 0.5 * 4.0)));
    }

    #[test]
    fn zoom_at_ignores_degenerate_factors() {
        let mut map = ComplexMap::new(100, 100);
        let original = map;
        map.zoom_at(0.0, (1.0, 1.0));
        map.zoom_at(-2.0, (1.0, 1.0));
        map.zoom_at(f64::NAN, (1.0, 1.0));
        assert_eq!(map, original);
    }

    #[test]
    fn pan_shifts_content_with_the_drag() {
        let mut map = ComplexMap::with_view(100, 80, 1.3, Complex::new(0.2, 0.4));
        let before = map.to_complex(30.0, 20.0);
        map.pan(7, -5);
        let after = map.to_complex(37.0, 15.0);
        assert!(approx_complex(before, after));
    }

    #[test]
    fn zoom_to_rect_fits_rectangle() {
        let mut map = ComplexMap::with_view(200, 100, 1.0, Complex::ZERO);
        let target = map.to_complex(60.0, 40.0);
        // 40×10 rectangle: width ratio 0.2 beats height ratio 0.1.
        map.zoom_to_rect((40.0, 35.0), (80.0, 45.0), false);
        assert!(approx_eq(map.zoom, 0.2));
        assert!(approx_complex(map.center(), target));
        assert!(approx_complex(map.to_complex(100.0, 50.0), target));
    }

    #[test]
    fn zoom_to_rect_out_grows_window() {
        let mut map = ComplexMap::with_view(100, 100, 1.0, Complex::ZERO);
        map.zoom_to_rect((75.0, 75.0), (25.0, 25.0), true);
        assert!(approx_eq(map.zoom, 2.0));
    }

    #[test]
    fn zero_size_rectangle_is_clamped() {
        let mut map = ComplexMap::with_view(100, 50, 1.0, Complex::ZERO);
        let clicked = map.to_complex(10.0, 10.0);
        map.zoom_to_rect((10.0, 10.0), (10.0, 10.0), false);
        assert!(map.zoom.is_finite() && map.zoom > 0.0);
        assert!(approx_eq(map.zoom, 1.0 / 50.0));
        assert!(approx_complex(map.center(), clicked));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut map = ComplexMap::new(100, 100);
        map.zoom_at(3.0, (5.0, 5.0));
        map.pan(12, 4);
        map.reset();
        assert_eq!(map, ComplexMap::new(100, 100));
    }

    #[test]
    fn resize_clamps_to_one_pixel() {
        let mut map = ComplexMap::new(100, 100);
        map.resize(0, 0);
        assert_eq!((map.width, map.height), (1, 1));
    }
}
