mod flood_fill;
mod pixel_buffer;
mod pixel_grid;

pub use flood_fill::{flood_fill, FillReport, FillRequest, MAX_FILL_PIXELS};
pub use pixel_buffer::PixelBuffer;
pub use pixel_grid::PixelGrid;

use crate::color::Rgba;

/// Default coloring canvas resolution
pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;

/// Brush tools for freehand strokes on the canvas.
/// The eraser is a round brush that paints the background white.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    Round { size: i32 },
    Square { size: i32 },
    Eraser { size: i32 },
}

impl Brush {
    /// Stamp the brush at (x, y). Strokes are sequences of stamps along the
    /// pointer path; out-of-bounds portions clip against the buffer edge.
    pub fn stamp(self, buffer: &mut PixelBuffer, x: i32, y: i32, color: Rgba) {
        match self {
            Brush::Round { size } => buffer.fill_circle(x, y, size, color),
            Brush::Square { size } => {
                buffer.fill_rect(x - size, y - size, (size * 2) as u32, (size * 2) as u32, color);
            },
            Brush::Eraser { size } => buffer.fill_circle(x, y, size, Rgba::WHITE),
        }
    }
}

/// Translate a pointer position in display space to buffer-space pixel
/// coordinates, given the displayed size of the canvas element.
pub fn to_buffer_coords(
    buffer: &PixelBuffer,
    pointer_x: f32,
    pointer_y: f32,
    display_width: f32,
    display_height: f32,
) -> (i32, i32) {
    let scale_x = buffer.width() as f32 / display_width;
    let scale_y = buffer.height() as f32 / display_height;
    ((pointer_x * scale_x).floor() as i32, (pointer_y * scale_y).floor() as i32)
}
