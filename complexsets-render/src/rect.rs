/// An axis-aligned rectangle of pixels within a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// Pixel x of the top-left corner.
    pub x: u32,
    /// Pixel y of the top-left corner.
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole `width × height` buffer.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Split into at most `parts` disjoint strips that exactly cover `self`.
    ///
    /// The cut runs along the longer side so strips stay closer to square.
    /// Every strip is `extent / parts` wide except the last, which takes the
    /// remainder. `parts` is capped at the extent so no strip is empty, and
    /// an empty rectangle produces no strips.
    pub fn partition(&self, parts: usize) -> Vec<PixelRect> {
        if self.is_empty() {
            return Vec::new();
        }
        let split_columns = self.width >= self.height;
        let extent = if split_columns {
            self.width
        } else {
            self.height
        };
        let n = (parts.max(1) as u32).min(extent);
        let step = extent / n;

        (0..n)
            .map(|i| {
                let offset = step * i;
                let len = if i + 1 == n {
                    extent - step * (n - 1)
                } else {
                    step
                };
                if split_columns {
                    PixelRect::new(self.x + offset, self.y, len, self.height)
                } else {
                    PixelRect::new(self.x, self.y + offset, self.width, len)
                }
            })
            .collect()
    }
}
