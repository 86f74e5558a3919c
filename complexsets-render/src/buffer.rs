use complexsets_core::Pixel;

use crate::rect::PixelRect;

/// A row-major RGBA pixel buffer, the controller's render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

/// A horizontal run of pixels handed to one render worker.
///
/// `pixels[i]` is the buffer pixel at `(x + i, y)`.
#[derive(Debug)]
pub struct RowSegment<'a> {
    pub x: u32,
    pub y: u32,
    pub pixels: &'a mut [Pixel],
}

impl PixelBuffer {
    /// Allocate a buffer with every pixel in the unrendered (all-zero) state.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::UNRENDERED; width as usize * height as usize],
        }
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::full(self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Pixel {
        self.pixels[x as usize + y as usize * self.width as usize]
    }

    /// The pixels as tightly packed RGBA bytes, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Shift the contents in place by `(dx, dy)` pixels.
    ///
    /// `dx > 0` moves content right, `dy > 0` moves it down. Pixels in the
    /// exposed strips keep stale values and must be re-rendered by the
    /// caller. Rows are visited far edge first in the direction of travel,
    /// so every source row is read before anything overwrites it; within a
    /// row `copy_within` handles the overlap. If the offset is at least a
    /// full buffer in either direction nothing survives and the buffer is
    /// left untouched.
    pub fn shift(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        if dx.unsigned_abs() >= self.width || dy.unsigned_abs() >= self.height {
            return;
        }

        let stride = self.width as usize;
        let count = (self.width - dx.unsigned_abs()) as usize;
        let src_x = (-dx).max(0) as usize;
        let dst_x = dx.max(0) as usize;
        let height = self.height as usize;

        let mut copy_row = |dst_y: usize| {
            let src_y = (dst_y as i64 - dy as i64) as usize;
            let src = src_y * stride + src_x;
            self.pixels.copy_within(src..src + count, dst_y * stride + dst_x);
        };

        if dy > 0 {
            for dst_y in (dy as usize..height).rev() {
                copy_row(dst_y);
            }
        } else {
            for dst_y in 0..height - dy.unsigned_abs() as usize {
                copy_row(dst_y);
            }
        }
    }

    /// Carve the buffer into one list of row segments per part.
    ///
    /// Parts must lie inside the buffer and be pairwise disjoint; the
    /// segments are split off with `split_at_mut`, so each worker ends up
    /// with exclusive access to its own pixels. Overlapping parts panic.
    pub fn split_parts_mut(&mut self, parts: &[PixelRect]) -> Vec<Vec<RowSegment<'_>>> {
        let mut out: Vec<Vec<RowSegment<'_>>> = parts
            .iter()
            .map(|p| Vec::with_capacity(p.height as usize))
            .collect();
        if parts.is_empty() || self.width == 0 {
            return out;
        }

        let mut order: Vec<usize> = (0..parts.len()).collect();
        order.sort_by_key(|&i| parts[i].x);

        let stride = self.width as usize;
        for (y, row) in self.pixels.chunks_exact_mut(stride).enumerate() {
            let y = y as u32;
            let mut rest: &mut [Pixel] = row;
            let mut consumed = 0usize;
            for &i in &order {
                let part = parts[i];
                if y < part.y || y >= part.bottom() || part.width == 0 {
                    continue;
                }
                let start = part.x as usize;
                assert!(start >= consumed, "render parts overlap at ({start}, {y})");
                let (_, tail) = std::mem::take(&mut rest).split_at_mut(start - consumed);
                let (segment, tail) = tail.split_at_mut(part.width as usize);
                rest = tail;
                consumed = part.right() as usize;
                out[i].push(RowSegment {
                    x: part.x,
                    y,
                    pixels: segment,
                });
            }
        }
        out
    }
}
