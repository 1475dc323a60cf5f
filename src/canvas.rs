use image::{Rgba, RgbaImage};

use crate::error::EngineError;

/// Colour used for a freshly created canvas without a source image.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

// ============================================================================
// PIXEL BUFFER - flat row-major RGBA storage
// ============================================================================

/// Row-major RGBA8 pixel storage, 4 bytes per pixel in R, G, B, A order.
///
/// Pixels are addressed either by `(x, y)` or by their flat pixel index
/// `y * width + x`; the byte offset of a pixel is `index * 4`.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Opaque white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::new_filled(width, height, BACKGROUND)
    }

    pub fn new_filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    pub fn from_rgba_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Wrap raw RGBA bytes. `data.len()` must be exactly `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .filter(|_| actual == expected)
            .map(Self::from_rgba_image)
            .ok_or(EngineError::DataLength { expected, actual })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of pixels (not bytes).
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// True when `(x, y)` lies inside `[0, width) x [0, height)`.
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    /// Flat pixel index of `(x, y)`, or `None` outside the buffer.
    pub fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width() as usize + x as usize)
        } else {
            None
        }
    }

    pub(crate) fn check_bounds(&self, x: i64, y: i64) -> Result<usize, EngineError> {
        self.index_of(x, y).ok_or(EngineError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        })
    }

    /// Pixel at flat index `index`.
    #[inline]
    pub fn pixel(&self, index: usize) -> Rgba<u8> {
        let o = index * 4;
        let raw = self.image.as_raw();
        Rgba([raw[o], raw[o + 1], raw[o + 2], raw[o + 3]])
    }

    /// Mutable channel slice `[r, g, b, a]` of the pixel at flat index `index`.
    #[inline]
    pub fn channels_mut(&mut self, index: usize) -> &mut [u8] {
        let o = index * 4;
        let raw: &mut [u8] = &mut self.image;
        &mut raw[o..o + 4]
    }

    #[inline]
    pub fn set_pixel(&mut self, index: usize, color: Rgba<u8>) {
        self.channels_mut(index).copy_from_slice(&color.0);
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        self.image.put_pixel(x, y, color);
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for p in self.image.pixels_mut() {
            *p = color;
        }
    }

    /// Square region `[cx - radius, cx + radius] x [cy - radius, cy + radius]`
    /// clipped to the buffer, or `None` when nothing of it is inside.
    pub fn clip_box(&self, cx: i64, cy: i64, radius: f32) -> Option<PixelRect> {
        if self.width() == 0 || self.height() == 0 {
            return None;
        }
        let r = radius as f64;
        let min_x = ((cx as f64 - r).floor() as i64).max(0);
        let min_y = ((cy as f64 - r).floor() as i64).max(0);
        let max_x = ((cx as f64 + r).ceil() as i64).min(self.width() as i64 - 1);
        let max_y = ((cy as f64 + r).ceil() as i64).min(self.height() as i64 - 1);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(PixelRect {
            min_x: min_x as u32,
            min_y: min_y as u32,
            max_x: max_x as u32,
            max_y: max_y as u32,
        })
    }
}

/// Inclusive pixel rectangle inside a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelRect {
    /// Row-major iterator over every `(x, y)` in the rectangle.
    pub fn iter(self) -> impl Iterator<Item = (u32, u32)> {
        (self.min_y..=self.max_y).flat_map(move |y| (self.min_x..=self.max_x).map(move |x| (x, y)))
    }
}

// ============================================================================
// STROKE MASK - one flag per pixel, reset at each stroke start
// ============================================================================

/// Marks pixels already affected during the current stroke.
#[derive(Clone, Debug, Default)]
pub struct StrokeMask {
    touched: Vec<bool>,
}

impl StrokeMask {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            touched: vec![false; pixel_count],
        }
    }

    /// Clear every flag, keeping the allocation.
    pub fn reset(&mut self) {
        self.touched.fill(false);
    }

    pub fn len(&self) -> usize {
        self.touched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.touched[index]
    }

    /// Mark `index`; returns `true` if it was not marked before.
    pub fn mark(&mut self, index: usize) -> bool {
        !std::mem::replace(&mut self.touched[index], true)
    }

    pub fn marked_count(&self) -> usize {
        self.touched.iter().filter(|t| **t).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_box_is_clamped_to_buffer() {
        let buf = PixelBuffer::new(10, 8);
        let rect = buf.clip_box(1, 7, 3.0).unwrap();
        assert_eq!(rect, PixelRect { min_x: 0, min_y: 4, max_x: 4, max_y: 7 });
        assert!(buf.clip_box(-20, -20, 3.0).is_none());
        assert_eq!(rect.iter().count(), 5 * 4);
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
        let buf = PixelBuffer::from_raw(2, 2, vec![7; 16]).unwrap();
        assert_eq!(buf.pixel(3), Rgba([7, 7, 7, 7]));
    }

    #[test]
    fn stroke_mask_marks_once() {
        let mut mask = StrokeMask::new(4);
        assert!(mask.mark(2));
        assert!(!mask.mark(2));
        assert_eq!(mask.marked_count(), 1);
        mask.reset();
        assert!(!mask.is_marked(2));
        assert_eq!(mask.len(), 4);
    }
}
