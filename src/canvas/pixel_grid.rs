//! Pixel-art mode: an NxN grid of hex color cells with a 4-way,
//! exact-match bucket fill. Much simpler than the raster fill - cells either
//! match or they don't, and there is no post-processing.

use serde::{Deserialize, Serialize};

const BACKGROUND: &str = "#fff";

/// Square grid of cell colors, stored as hex strings.
/// Supported sizes in the app are 16, 32 and 64, but any side works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelGrid {
    size: usize,
    cells: Vec<String>,
}

impl PixelGrid {
    /// Create a grid with every cell set to the white background
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![BACKGROUND.to_string(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        if row < self.size && col < self.size {
            Some(&self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Paint a single cell; out-of-range coordinates are ignored
    pub fn paint(&mut self, row: usize, col: usize, color: &str) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = color.to_string();
        }
    }

    /// Reset a single cell to the background
    pub fn erase(&mut self, row: usize, col: usize) {
        self.paint(row, col, BACKGROUND);
    }

    /// Reset every cell to the background
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = BACKGROUND.to_string();
        }
    }

    /// Bucket fill from (row, col): 4-way traversal over cells whose color
    /// string exactly equals the start cell's. A no-op when the start cell
    /// already has the fill color.
    pub fn flood_fill(&mut self, row: usize, col: usize, color: &str) {
        let Some(target) = self.get(row, col).map(str::to_string) else {
            return;
        };
        if target == color {
            return;
        }

        let size = self.size as i64;
        let mut stack: Vec<(i64, i64)> = vec![(row as i64, col as i64)];
        while let Some((r, c)) = stack.pop() {
            if r < 0 || r >= size || c < 0 || c >= size {
                continue;
            }
            let idx = (r * size + c) as usize;
            if self.cells[idx] != target {
                continue;
            }
            self.cells[idx] = color.to_string();
            stack.push((r, c + 1));
            stack.push((r + 1, c));
            stack.push((r, c - 1));
            stack.push((r - 1, c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_respects_walls() {
        let mut grid = PixelGrid::new(8);
        // Vertical wall splits the grid
        for row in 0..8 {
            grid.paint(row, 3, "#000");
        }
        grid.flood_fill(0, 0, "#f00");

        assert_eq!(grid.get(4, 0), Some("#f00"));
        assert_eq!(grid.get(4, 3), Some("#000"));
        // Right of the wall untouched
        assert_eq!(grid.get(4, 5), Some("#fff"));
    }

    #[test]
    fn test_fill_is_four_way_only() {
        let mut grid = PixelGrid::new(4);
        // Diagonal wall: 4-way fill cannot leak through a diagonal gap
        grid.paint(0, 1, "#000");
        grid.paint(1, 0, "#000");
        grid.flood_fill(0, 0, "#f00");

        assert_eq!(grid.get(0, 0), Some("#f00"));
        assert_eq!(grid.get(1, 1), Some("#fff"));
    }

    #[test]
    fn test_fill_same_color_is_noop() {
        let mut grid = PixelGrid::new(4);
        grid.flood_fill(2, 2, "#fff");
        assert_eq!(grid.get(0, 0), Some("#fff"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut grid = PixelGrid::new(4);
        grid.flood_fill(0, 0, "#abc");
        grid.clear();
        assert!((0..4).all(|r| (0..4).all(|c| grid.get(r, c) == Some("#fff"))));
    }
}
