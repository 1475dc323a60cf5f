// ============================================================================
// FLOOD FILL - 4-connected region growth bounded by colour distance
// ============================================================================

use std::collections::VecDeque;

use image::Rgba;

use crate::canvas::{PixelBuffer, PixelRect};
use crate::error::EngineError;

/// Largest possible squared RGBA distance: four channels, each differing by 255.
pub const MAX_DISTANCE: u32 = 4 * 255 * 255;

/// Order in which pending pixels are visited. The filled region does not
/// depend on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Traversal {
    /// LIFO work list.
    #[default]
    DepthFirst,
    /// FIFO work list.
    BreadthFirst,
}

/// Outcome of a fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillReport {
    /// Number of recoloured pixels.
    pub filled: usize,
    /// Bounding box of the recoloured pixels, `None` when nothing was filled.
    pub bounds: Option<PixelRect>,
}

/// Squared distance between two colours over all four channels.
#[inline]
pub fn color_distance_sq(a: Rgba<u8>, b: Rgba<u8>) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    let da = a[3] as i32 - b[3] as i32;
    (dr * dr + dg * dg + db * db + da * da) as u32
}

/// Fill the region around `(seed_x, seed_y)` with `color`, depth-first.
///
/// See [`flood_fill_with`].
pub fn flood_fill(
    buffer: &mut PixelBuffer,
    seed_x: i64,
    seed_y: i64,
    color: Rgba<u8>,
    threshold: f32,
) -> Result<FillReport, EngineError> {
    flood_fill_with(buffer, seed_x, seed_y, color, threshold, Traversal::DepthFirst)
}

/// Recolour the 4-connected region of pixels close to the seed's original colour.
///
/// A pixel belongs to the region when its squared distance to the seed colour
/// is below `threshold² * MAX_DISTANCE`; pixels identical to the seed colour
/// always belong, so a zero threshold fills exactly the seed-coloured area.
/// Matched pixels are overwritten with `color` (no blending).
pub fn flood_fill_with(
    buffer: &mut PixelBuffer,
    seed_x: i64,
    seed_y: i64,
    color: Rgba<u8>,
    threshold: f32,
    traversal: Traversal,
) -> Result<FillReport, EngineError> {
    let seed_idx = buffer.check_bounds(seed_x, seed_y)?;
    let seed_color = buffer.pixel(seed_idx);

    let t = threshold.clamp(0.0, 1.0) as f64;
    let limit = t * t * MAX_DISTANCE as f64;
    let matches = |p: Rgba<u8>| {
        let d = color_distance_sq(p, seed_color);
        d == 0 || (d as f64) < limit
    };

    let w = buffer.width() as usize;
    let h = buffer.height() as usize;

    // Pixels are flagged when queued, so each one is tested exactly once.
    let mut visited = vec![false; w * h];
    let mut pending: VecDeque<usize> = VecDeque::with_capacity(4096);
    visited[seed_idx] = true;
    pending.push_back(seed_idx);

    let mut filled = 0usize;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (usize::MAX, usize::MAX, 0usize, 0usize);

    loop {
        let next = match traversal {
            Traversal::DepthFirst => pending.pop_back(),
            Traversal::BreadthFirst => pending.pop_front(),
        };
        let Some(idx) = next else { break };

        if !matches(buffer.pixel(idx)) {
            continue;
        }
        buffer.set_pixel(idx, color);
        filled += 1;

        let x = idx % w;
        let y = idx / w;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);

        // Left
        if x > 0 && !visited[idx - 1] {
            visited[idx - 1] = true;
            pending.push_back(idx - 1);
        }
        // Right
        if x + 1 < w && !visited[idx + 1] {
            visited[idx + 1] = true;
            pending.push_back(idx + 1);
        }
        // Up
        if y > 0 && !visited[idx - w] {
            visited[idx - w] = true;
            pending.push_back(idx - w);
        }
        // Down
        if y + 1 < h && !visited[idx + w] {
            visited[idx + w] = true;
            pending.push_back(idx + w);
        }
    }

    let bounds = (filled > 0).then(|| PixelRect {
        min_x: min_x as u32,
        min_y: min_y as u32,
        max_x: max_x as u32,
        max_y: max_y as u32,
    });
    log::debug!(
        "fill: seed ({}, {}) threshold {:.2} -> {} pixels",
        seed_x,
        seed_y,
        threshold,
        filled
    );
    Ok(FillReport { filled, bounds })
}
