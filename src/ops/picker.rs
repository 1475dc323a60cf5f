use image::Rgba;

use crate::canvas::PixelBuffer;
use crate::components::shape::Shape;
use crate::error::EngineError;

/// Sample a colour at `(x, y)`.
///
/// With `thickness <= 1` the exact pixel is returned and `(x, y)` must be
/// inside the buffer. Otherwise every pixel of the clipped bounding box that
/// lies inside `shape` is averaged per channel, with truncating integer
/// division; the centre itself may be off-canvas as long as part of the
/// footprint is not.
pub fn pick_color(
    buffer: &PixelBuffer,
    x: i64,
    y: i64,
    shape: Shape,
    thickness: f32,
) -> Result<Rgba<u8>, EngineError> {
    if thickness <= 1.0 {
        let center = buffer.check_bounds(x, y)?;
        return Ok(buffer.pixel(center));
    }

    let mut sum = [0u64; 4];
    let mut n = 0u64;
    if let Some(rect) = buffer.clip_box(x, y, thickness) {
        for (px, py) in rect.iter() {
            if !shape.contains(px as i64, py as i64, x, y, thickness) {
                continue;
            }
            let p = buffer.get_pixel(px, py);
            for (acc, c) in sum.iter_mut().zip(p.0) {
                *acc += c as u64;
            }
            n += 1;
        }
    }

    if n == 0 {
        return Err(EngineError::OutOfBounds {
            x,
            y,
            width: buffer.width(),
            height: buffer.height(),
        });
    }
    Ok(Rgba(sum.map(|s| (s / n) as u8)))
}
