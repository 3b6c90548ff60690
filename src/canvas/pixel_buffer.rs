use crate::color::Rgba;

use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Write an RGBA pixel to a 4-byte slice
#[inline]
fn write_pixel(dest: &mut [u8], color: Rgba) {
    dest[0] = color.r;
    dest[1] = color.g;
    dest[2] = color.b;
    dest[3] = color.a;
}

#[inline]
fn read_pixel(src: &[u8]) -> Rgba {
    Rgba::new(src[0], src[1], src[2], src[3])
}

/// RGBA8888 pixel buffer backing the coloring canvas.
/// Straight RGBA byte order, row-major, no padding.
///
/// Exclusively owned by the surface that displays it; a fill operation
/// mutates it in place and nothing else touches it mid-operation.
#[derive(Clone)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a canvas-sized buffer (400x300) cleared to white
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a buffer with custom resolution, cleared to white
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut buf = Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        };
        buf.clear(Rgba::WHITE);
        buf
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid color
    pub fn clear(&mut self, color: Rgba) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            write_pixel(chunk, color);
        }
    }

    /// Set a single pixel (bounds checked; out-of-bounds writes are dropped)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel(&mut self.pixels[idx..idx + 4], color);
        }
    }

    /// Overwrite RGB only, leaving alpha untouched (bounds checked)
    #[inline]
    pub fn set_rgb(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = r;
            self.pixels[idx + 1] = g;
            self.pixels[idx + 2] = b;
        }
    }

    /// Read a pixel (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some(read_pixel(&self.pixels[idx..idx + 4]))
        } else {
            None
        }
    }

    /// Draw a horizontal span, clipped to the buffer
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Rgba) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let mut idx = self.pixel_index(start as u32, y as u32);
        for _ in start..=end {
            write_pixel(&mut self.pixels[idx..idx + 4], color);
            idx += 4;
        }
    }

    /// Fill a rectangle (used by the square brush)
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        for row in 0..h as i32 {
            self.hline(x, x + w as i32 - 1, y + row, color);
        }
    }

    /// Fill a circle using horizontal spans (midpoint algorithm).
    /// Used by the round brush and the eraser.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba) {
        if radius <= 0 {
            if radius == 0 {
                self.set_pixel(cx, cy, color);
            }
            return;
        }

        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while x >= y {
            self.hline(cx - x, cx + x, cy + y, color);
            if y != 0 {
                self.hline(cx - x, cx + x, cy - y, color);
            }
            if x != y {
                self.hline(cx - y, cx + y, cy + x, color);
                if y != 0 {
                    self.hline(cx - y, cx + y, cy - x, color);
                }
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Raw bytes for texture upload or image export
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to raw pixels
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_white() {
        let buf = PixelBuffer::with_size(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buf.get_pixel(x, y), Some(Rgba::WHITE));
            }
        }
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut buf = PixelBuffer::with_size(8, 8);
        let c = Rgba::opaque(12, 34, 56);
        buf.set_pixel(3, 5, c);
        assert_eq!(buf.get_pixel(3, 5), Some(c));
    }

    #[test]
    fn test_out_of_bounds_reads_and_writes() {
        let mut buf = PixelBuffer::with_size(4, 4);
        assert_eq!(buf.get_pixel(-1, 0), None);
        assert_eq!(buf.get_pixel(0, 4), None);
        // Writes outside the buffer are silently dropped
        buf.set_pixel(100, 100, Rgba::opaque(0, 0, 0));
        buf.set_pixel(-5, 2, Rgba::opaque(0, 0, 0));
        assert!(buf.as_bytes().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_hline_clips() {
        let mut buf = PixelBuffer::with_size(4, 4);
        let red = Rgba::opaque(255, 0, 0);
        buf.hline(-10, 10, 1, red);
        for x in 0..4 {
            assert_eq!(buf.get_pixel(x, 1), Some(red));
            assert_eq!(buf.get_pixel(x, 0), Some(Rgba::WHITE));
        }
    }

    #[test]
    fn test_fill_rect_extent() {
        let mut buf = PixelBuffer::with_size(8, 8);
        let blue = Rgba::opaque(0, 0, 255);
        buf.fill_rect(2, 2, 3, 2, blue);
        assert_eq!(buf.get_pixel(2, 2), Some(blue));
        assert_eq!(buf.get_pixel(4, 3), Some(blue));
        assert_eq!(buf.get_pixel(5, 2), Some(Rgba::WHITE));
        assert_eq!(buf.get_pixel(2, 4), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_circle_covers_center() {
        let mut buf = PixelBuffer::with_size(16, 16);
        let c = Rgba::opaque(1, 2, 3);
        buf.fill_circle(8, 8, 3, c);
        assert_eq!(buf.get_pixel(8, 8), Some(c));
        assert_eq!(buf.get_pixel(11, 8), Some(c));
        assert_eq!(buf.get_pixel(12, 8), Some(Rgba::WHITE));
    }
}
