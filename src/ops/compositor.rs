// ============================================================================
// PER-PIXEL COMPOSITING - source-over blend and eraser alpha decay
// ============================================================================

use image::Rgba;

use crate::canvas::PixelBuffer;

/// Source-over blend of `source` onto the pixel at `index`.
///
/// The effective source alpha is the colour's own alpha scaled by `opacity`:
///
/// ```text
/// a  = source.a / 255 * opacity
/// na = (1 - a) * dest.a / 255
/// da = a + na
/// dest.a = round(255 * da)
/// dest.c = round(dest.c * na + source.c * a)    (or 0 when da == 0)
/// ```
pub fn blend(buffer: &mut PixelBuffer, index: usize, source: Rgba<u8>, opacity: f32) {
    let a = source[3] as f32 / 255.0 * opacity.clamp(0.0, 1.0);

    // Fast path: nothing to blend
    if a <= 0.0 {
        return;
    }

    let dest = buffer.channels_mut(index);
    let na = (1.0 - a) * (dest[3] as f32 / 255.0);
    let da = a + na;
    dest[3] = to_channel(255.0 * da);
    if da > 0.0 {
        for c in 0..3 {
            dest[c] = to_channel(dest[c] as f32 * na + source[c] as f32 * a);
        }
    } else {
        dest[..3].fill(0);
    }
}

/// Multiplicative alpha decay used by the eraser: `dest.a = round(dest.a * (1 - opacity))`.
pub fn erase(buffer: &mut PixelBuffer, index: usize, opacity: f32) {
    let dest = buffer.channels_mut(index);
    dest[3] = to_channel(dest[3] as f32 * (1.0 - opacity.clamp(0.0, 1.0)));
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(color: Rgba<u8>) -> PixelBuffer {
        PixelBuffer::new_filled(1, 1, color)
    }

    #[test]
    fn zero_opacity_leaves_pixel_unchanged() {
        for dest in [Rgba([12, 200, 99, 255]), Rgba([40, 80, 120, 77]), Rgba([0, 0, 0, 0])] {
            let mut buf = single(dest);
            blend(&mut buf, 0, Rgba([255, 0, 0, 255]), 0.0);
            assert_eq!(buf.pixel(0), dest);
        }
    }

    #[test]
    fn opaque_source_at_full_opacity_replaces_pixel() {
        let mut buf = single(Rgba([12, 200, 99, 30]));
        blend(&mut buf, 0, Rgba([1, 2, 3, 255]), 1.0);
        assert_eq!(buf.pixel(0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn half_opacity_over_white() {
        let mut buf = single(Rgba([255, 255, 255, 255]));
        blend(&mut buf, 0, Rgba([0, 0, 0, 255]), 0.5);
        // na = 0.5, c = round(255 * 0.5) = 128 (127.5 rounds away from zero)
        assert_eq!(buf.pixel(0), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn translucent_source_over_transparent() {
        let mut buf = single(Rgba([9, 9, 9, 0]));
        blend(&mut buf, 0, Rgba([200, 100, 50, 255]), 0.2);
        // a = 0.2, na = 0, da = 0.2
        assert_eq!(buf.pixel(0), Rgba([40, 20, 10, 51]));
    }

    #[test]
    fn erase_decays_alpha_only() {
        let mut buf = single(Rgba([10, 20, 30, 200]));
        erase(&mut buf, 0, 0.25);
        assert_eq!(buf.pixel(0), Rgba([10, 20, 30, 150]));
        erase(&mut buf, 0, 1.0);
        assert_eq!(buf.pixel(0)[3], 0);
    }
}
