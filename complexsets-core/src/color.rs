use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Linear RGB color with `f32` channels in `0.0..=1.0`.
///
/// Addition and scaling saturate at `1.0` per channel, so blending two
/// stops can never overflow when converted to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Mul<f32> for Color {
    type Output = Self;

    #[inline]
    fn mul(self, c: f32) -> Self {
        Self::new(
            (self.r * c).min(1.0),
            (self.g * c).min(1.0),
            (self.b * c).min(1.0),
        )
    }
}

impl Add for Color {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            (self.r + rhs.r).min(1.0),
            (self.g + rhs.g).min(1.0),
            (self.b + rhs.b).min(1.0),
        )
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

/// One RGBA8 pixel of the output buffer.
///
/// The all-zero value is the "not yet rendered" state; every rendered pixel
/// is fully opaque.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const UNRENDERED: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
}

impl From<Color> for Pixel {
    #[inline]
    fn from(c: Color) -> Self {
        Self {
            r: (255.0 * c.r) as u8,
            g: (255.0 * c.g) as u8,
            b: (255.0 * c.b) as u8,
            a: 255,
        }
    }
}
