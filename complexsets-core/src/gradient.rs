use serde::{Deserialize, Serialize};

use crate::color::{Color, Pixel};
use crate::error::CoreError;

/// A color anchored at a position along the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: Color,
    pub position: f32,
}

impl ColorStop {
    pub const fn new(color: Color, position: f32) -> Self {
        Self { color, position }
    }
}

/// Piecewise-linear map from a normalized escape value to a color.
///
/// Stops are sorted once at construction (stable, so stops sharing a
/// position keep their input order) and never change afterwards, which
/// makes the gradient safe to share read-only across render workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
}

impl ColorGradient {
    /// Color returned for points that never escaped.
    pub const INTERIOR: Color = Color::BLACK;

    pub fn new(mut stops: Vec<ColorStop>) -> crate::Result<Self> {
        if stops.is_empty() {
            return Err(CoreError::EmptyGradient);
        }
        if let Some(bad) = stops
            .iter()
            .find(|s| !s.position.is_finite() || !(0.0..=1.0).contains(&s.position))
        {
            return Err(CoreError::InvalidStopPosition(bad.position));
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Map an escape value in `0.0..=1.0` to a color.
    ///
    /// `0.0` is the "did not escape" sentinel and always yields
    /// [`INTERIOR`](Self::INTERIOR), whatever the stops say. Values outside
    /// the stop range clamp to the first or last stop.
    pub fn color_at(&self, value: f32) -> Color {
        if value == 0.0 || value.is_nan() {
            return Self::INTERIOR;
        }

        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if value <= first.position {
            return first.color;
        }
        if value >= last.position {
            return last.color;
        }

        // first.position < value < last.position, so 1 <= upper < len.
        let upper = self.stops.partition_point(|s| s.position < value);
        let b = self.stops[upper];
        let a = self.stops[upper - 1];
        let mix = (b.position - value) / (b.position - a.position);
        a.color * mix + b.color * (1.0 - mix)
    }

    #[inline]
    pub fn pixel_at(&self, value: f32) -> Pixel {
        Pixel::from(self.color_at(value))
    }
}

impl Default for ColorGradient {
    /// Black at the escape boundary fading to white for the slowest escapes.
    fn default() -> Self {
        Self {
            stops: vec![
                ColorStop::new(Color::BLACK, 0.0),
                ColorStop::new(Color::WHITE, 1.0),
            ],
        }
    }
}

impl TryFrom<Vec<ColorStop>> for ColorGradient {
    type Error = CoreError;

    fn try_from(stops: Vec<ColorStop>) -> crate::Result<Self> {
        Self::new(stops)
    }
}

impl From<ColorGradient> for Vec<ColorStop> {
    fn from(gradient: ColorGradient) -> Self {
        gradient.stops
    }
}
