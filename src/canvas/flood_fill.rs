//! Tolerance-based flood fill with edge softening and boundary dilation.
//!
//! Three stages over one raster buffer:
//! 1. Region discovery - stack-based fill over 8-connected neighbors, bounded
//!    by a safety pixel cap.
//! 2. Edge softening - three averaging passes over near-white filled pixels,
//!    approximating anti-aliasing so the result looks painted.
//! 3. Boundary dilation - one-pixel expansion into adjacent unfilled pixels,
//!    closing the hairline gaps softening leaves at region borders.

use std::collections::HashSet;

use log::{debug, warn};

use crate::color::Rgba;
use crate::error::CanvasError;

use super::PixelBuffer;

/// Discovery stops once this many pixels have been accepted, even with
/// candidates still on the stack. Keeps a single fill inside one UI frame.
pub const MAX_FILL_PIXELS: usize = 100_000;

/// Number of edge-softening passes
const SOFTEN_PASSES: u32 = 3;

/// A filled pixel whose RGB distance from pure white is below this gets
/// blended with its neighbors during softening.
const NEAR_WHITE_DISTANCE: f32 = 64.0;

/// 8-way neighbor offsets
const NEIGHBORS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// One fill invocation, built from a pointer click.
/// Immutable for the duration of the operation.
#[derive(Debug, Clone)]
pub struct FillRequest {
    pub seed_x: i32,
    pub seed_y: i32,
    /// 3- or 6-digit hex color string
    pub fill_color: String,
    /// Maximum Euclidean RGBA distance from the seed color for a pixel to
    /// count as part of the region
    pub tolerance: f32,
}

impl FillRequest {
    pub fn new(seed_x: i32, seed_y: i32, fill_color: impl Into<String>) -> Self {
        Self {
            seed_x,
            seed_y,
            fill_color: fill_color.into(),
            tolerance: 128.0,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// What a fill did. `capped` means discovery hit [`MAX_FILL_PIXELS`] and the
/// fill is partial - a documented boundary behavior, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    pub pixels_filled: usize,
    pub capped: bool,
}

/// Flood fill the region around the seed with the requested color.
///
/// The buffer is mutated in place. Filled-set membership is deterministic for
/// identical inputs: the tolerance test always compares against the original
/// seed color, never a partially mutated buffer, and each softening pass
/// reads a snapshot of the previous pass's committed result.
pub fn flood_fill(buffer: &mut PixelBuffer, request: &FillRequest) -> Result<FillReport, CanvasError> {
    let fill = Rgba::from_hex(&request.fill_color)?;
    let width = buffer.width() as i32;
    let height = buffer.height() as i32;

    let target = buffer
        .get_pixel(request.seed_x, request.seed_y)
        .ok_or(CanvasError::InvalidCoordinate {
            x: request.seed_x,
            y: request.seed_y,
            width: buffer.width(),
            height: buffer.height(),
        })?;

    // Already the fill color (exact channel match): nothing to do
    if target == fill {
        return Ok(FillReport {
            pixels_filled: 0,
            capped: false,
        });
    }

    // Stage 1: region discovery.
    // `filled` answers membership, `order` remembers accepted pixels for the
    // post-processing passes. Accepted pixels are overwritten immediately;
    // the membership check guarantees candidates are only ever read while
    // they still hold their original color.
    let mut stack: Vec<(i32, i32)> = vec![(request.seed_x, request.seed_y)];
    let mut filled: HashSet<u32> = HashSet::new();
    let mut order: Vec<u32> = Vec::new();

    while filled.len() < MAX_FILL_PIXELS {
        let Some((cx, cy)) = stack.pop() else {
            break;
        };
        if cx < 0 || cx >= width || cy < 0 || cy >= height {
            continue;
        }
        let idx = (cy * width + cx) as u32;
        if filled.contains(&idx) {
            continue;
        }
        let color = buffer.get_pixel(cx, cy).unwrap_or(target);
        if color.distance(target) > request.tolerance {
            continue;
        }

        buffer.set_pixel(cx, cy, fill);
        filled.insert(idx);
        order.push(idx);
        for (dx, dy) in NEIGHBORS {
            stack.push((cx + dx, cy + dy));
        }
    }

    // At loop exit the stack still holds pushes for pixels filled since,
    // so the fill is only partial if some remaining candidate would have
    // been accepted. Candidates outside the filled-set kept their original
    // color, so the tolerance test is still accurate here.
    let capped = filled.len() >= MAX_FILL_PIXELS
        && stack.iter().any(|&(cx, cy)| {
            if cx < 0 || cx >= width || cy < 0 || cy >= height {
                return false;
            }
            !filled.contains(&((cy * width + cx) as u32))
                && buffer
                    .get_pixel(cx, cy)
                    .is_some_and(|c| c.distance(target) <= request.tolerance)
        });
    if capped {
        warn!("flood fill capped at {MAX_FILL_PIXELS} pixels with candidates unexplored");
    }
    debug!("flood fill accepted {} pixels", filled.len());

    // Stage 2: edge softening. Each pass reads a snapshot of the buffer as
    // the previous pass left it, so results do not depend on the iteration
    // order within a pass.
    for _ in 0..SOFTEN_PASSES {
        let snapshot = buffer.clone();
        for &idx in &order {
            let cx = (idx % width as u32) as i32;
            let cy = (idx / width as u32) as i32;
            let Some(pixel) = snapshot.get_pixel(cx, cy) else {
                continue;
            };
            if pixel.distance_rgb(Rgba::WHITE) >= NEAR_WHITE_DISTANCE {
                continue;
            }

            let (mut r, mut g, mut b, mut count) = (0u32, 0u32, 0u32, 0u32);
            for (dx, dy) in NEIGHBORS {
                if let Some(n) = snapshot.get_pixel(cx + dx, cy + dy) {
                    r += n.r as u32;
                    g += n.g as u32;
                    b += n.b as u32;
                    count += 1;
                }
            }
            if count > 0 {
                buffer.set_rgb(
                    cx,
                    cy,
                    ((r as f32 / count as f32).round()) as u8,
                    ((g as f32 / count as f32).round()) as u8,
                    ((b as f32 / count as f32).round()) as u8,
                );
            }
        }
    }

    // Stage 3: boundary dilation. Candidates come from the pre-softening
    // filled-set and never join it, so repeated fills cannot creep outward
    // more than one layer per invocation.
    let mut dilated: HashSet<u32> = HashSet::new();
    for &idx in &order {
        let cx = (idx % width as u32) as i32;
        let cy = (idx / width as u32) as i32;
        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (cx + dx, cy + dy);
            if nx < 0 || nx >= width || ny < 0 || ny >= height {
                continue;
            }
            let nidx = (ny * width + nx) as u32;
            if !filled.contains(&nidx) && dilated.insert(nidx) {
                buffer.set_pixel(nx, ny, fill);
            }
        }
    }

    Ok(FillReport {
        pixels_filled: order.len(),
        capped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Rgba {
        Rgba::opaque(255, 0, 0)
    }

    #[test]
    fn test_uniform_white_buffer_fills_completely() {
        // 10x10 all-white, seed (5,5), #FF0000, tolerance 10: every pixel
        // joins the region. Red is nowhere near white so softening is a
        // no-op, and there is nothing outside the region to dilate into.
        let mut buf = PixelBuffer::with_size(10, 10);
        let report = flood_fill(&mut buf, &FillRequest::new(5, 5, "#FF0000").with_tolerance(10.0))
            .unwrap();

        assert_eq!(report.pixels_filled, 100);
        assert!(!report.capped);
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(buf.get_pixel(x, y), Some(red()), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_idempotent_on_exact_match() {
        let mut buf = PixelBuffer::with_size(10, 10);
        buf.clear(red());
        let before = buf.as_bytes().to_vec();

        let report = flood_fill(&mut buf, &FillRequest::new(5, 5, "#FF0000")).unwrap();

        assert_eq!(report.pixels_filled, 0);
        assert_eq!(buf.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_out_of_bounds_seed_is_rejected() {
        let mut buf = PixelBuffer::with_size(10, 10);
        let err = flood_fill(&mut buf, &FillRequest::new(10, 5, "#FF0000")).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidCoordinate { x: 10, y: 5, .. }));

        let err = flood_fill(&mut buf, &FillRequest::new(3, -1, "#FF0000")).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_invalid_hex_is_rejected() {
        let mut buf = PixelBuffer::with_size(10, 10);
        let err = flood_fill(&mut buf, &FillRequest::new(5, 5, "#nothex")).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidColor(_)));
    }

    /// Buffer split into a white left half and black right half. Fill seeded
    /// in the white half must contain exactly the white pixels; black pixels
    /// adjacent to the boundary may be dilated into, but nothing deeper.
    #[test]
    fn test_containment_and_dilation_bound() {
        let mut buf = PixelBuffer::with_size(20, 10);
        let black = Rgba::opaque(0, 0, 0);
        buf.fill_rect(10, 0, 10, 10, black);

        let report = flood_fill(&mut buf, &FillRequest::new(2, 5, "#FF0000").with_tolerance(10.0))
            .unwrap();

        // Exactly the 10x10 white half
        assert_eq!(report.pixels_filled, 100);
        // Column 10 borders the region: dilation paints it
        for y in 0..10 {
            assert_eq!(buf.get_pixel(10, y), Some(red()));
        }
        // Column 11 onward is two steps out and must be untouched
        for y in 0..10 {
            for x in 11..20 {
                assert_eq!(buf.get_pixel(x, y), Some(black), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_deterministic_across_runs() {
        // A non-trivial scene: white background, black frame, a gray blob
        let mut base = PixelBuffer::with_size(40, 40);
        base.fill_rect(5, 5, 30, 1, Rgba::opaque(0, 0, 0));
        base.fill_rect(5, 34, 30, 1, Rgba::opaque(0, 0, 0));
        base.fill_circle(20, 20, 4, Rgba::opaque(200, 200, 200));

        let request = FillRequest::new(8, 8, "#4ECDC4").with_tolerance(100.0);

        let mut first = base.clone();
        let mut second = base.clone();
        let r1 = flood_fill(&mut first, &request).unwrap();
        let r2 = flood_fill(&mut second, &request).unwrap();

        assert_eq!(r1, r2);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    /// The same uniform region seeded from two different pixels: traversal
    /// order differs completely, the accepted set does not. Softening and
    /// dilation run over that set, so the final buffers must be
    /// byte-identical. The near-white fill color keeps softening active.
    #[test]
    fn test_result_independent_of_traversal_order() {
        let near_white = "#F0F0F0";
        let mut base = PixelBuffer::with_size(24, 24);
        let black = Rgba::opaque(0, 0, 0);
        base.fill_rect(0, 0, 24, 1, black);
        base.fill_rect(0, 23, 24, 1, black);
        base.fill_rect(0, 0, 1, 24, black);
        base.fill_rect(23, 0, 1, 24, black);

        let mut from_corner = base.clone();
        let mut from_interior = base.clone();
        let r1 = flood_fill(
            &mut from_corner,
            &FillRequest::new(1, 1, near_white).with_tolerance(10.0),
        )
        .unwrap();
        let r2 = flood_fill(
            &mut from_interior,
            &FillRequest::new(12, 17, near_white).with_tolerance(10.0),
        )
        .unwrap();

        assert_eq!(r1, r2);
        assert_eq!(from_corner.as_bytes(), from_interior.as_bytes());
    }

    #[test]
    fn test_cap_sized_region_is_not_partial() {
        // 400x250 is exactly 100_000 pixels: discovery finishes the whole
        // region as it reaches the cap. Nothing viable remains, so the
        // report must not claim a partial fill.
        let mut buf = PixelBuffer::with_size(400, 250);
        let report = flood_fill(&mut buf, &FillRequest::new(0, 0, "#FF0000")).unwrap();

        assert_eq!(report.pixels_filled, MAX_FILL_PIXELS);
        assert!(!report.capped);
        assert_eq!(buf.get_pixel(399, 249), Some(red()));
    }

    #[test]
    fn test_cap_leaves_remainder_untouched() {
        // 400x300 = 120_000 white pixels, true region exceeds the cap.
        // Seeding at a corner keeps the unexplored remainder clustered at the
        // far side of the buffer, well clear of the dilation layer.
        let mut buf = PixelBuffer::with_size(400, 300);
        let report = flood_fill(&mut buf, &FillRequest::new(0, 0, "#FF0000")).unwrap();

        assert_eq!(report.pixels_filled, MAX_FILL_PIXELS);
        assert!(report.capped);

        // Count untouched pixels; dilation adds at most one boundary layer
        // beyond the capped region, so some of the 20_000 remainder must
        // still be pure white.
        let white_left = (0..300)
            .flat_map(|y| (0..400).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get_pixel(x, y) == Some(Rgba::WHITE))
            .count();
        assert!(white_left > 0);
        assert!(white_left < 20_000);
    }

    /// A near-white fill inside a black frame: softening must darken filled
    /// pixels that border the frame while leaving the region interior alone,
    /// and dilation must close the ring just outside the region.
    #[test]
    fn test_softening_blends_only_near_white_edges() {
        let near_white = "#F0F0F0"; // distance from white ~26, inside the near-white band
        let mut buf = PixelBuffer::with_size(20, 20);
        let black = Rgba::opaque(0, 0, 0);
        // 1px black frame at the buffer edge
        buf.fill_rect(0, 0, 20, 1, black);
        buf.fill_rect(0, 19, 20, 1, black);
        buf.fill_rect(0, 0, 1, 20, black);
        buf.fill_rect(19, 0, 1, 20, black);

        flood_fill(&mut buf, &FillRequest::new(10, 10, near_white).with_tolerance(10.0)).unwrap();

        let fill = Rgba::from_hex(near_white).unwrap();
        // Deep interior: all 8 neighbors share the fill color through every
        // pass, so the average is the identity.
        assert_eq!(buf.get_pixel(10, 10), Some(fill));
        // A filled pixel adjacent to the frame averaged black neighbors in
        // and must now be darker than the fill color.
        let edge = buf.get_pixel(1, 10).unwrap();
        assert!(edge.r < fill.r, "edge pixel was not softened: {edge:?}");
        // The frame pixel itself was dilated over with the fill color
        assert_eq!(buf.get_pixel(0, 10), Some(fill));
    }

    #[test]
    fn test_tolerance_zero_still_fills_exact_matches() {
        let mut buf = PixelBuffer::with_size(6, 6);
        let report = flood_fill(&mut buf, &FillRequest::new(0, 0, "#FF0000").with_tolerance(0.0))
            .unwrap();
        assert_eq!(report.pixels_filled, 36);
    }
}
