//! RGBA8888 pixel buffer that backs a host texture.
//!
//! A [`PixelBuffer`] owns its storage exclusively. The host compositor reads it through a
//! [`PixelSource`], a weak view handed to the texture registry on registration. Sources never
//! keep the storage alive: once the buffer is disposed every pull returns `None`.

use std::sync::{Arc, Weak};

use log::trace;
use parking_lot::RwLock;

use crate::error::TextureError;

/// Number of bytes per RGBA8888 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

type SharedPixels = Arc<RwLock<Vec<u8>>>;

/// Fixed-size RGBA8888 raster, zero-initialised on creation.
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: SharedPixels,
}

/// Destination region actually modified by [`PixelBuffer::draw_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnRect {
    /// Left edge in buffer pixels.
    pub x: u32,
    /// Top edge in buffer pixels.
    pub y: u32,
    /// Width of the written region.
    pub width: u32,
    /// Number of rows written.
    pub height: u32,
}

impl PixelBuffer {
    /// Allocates a zero-filled `width` x `height` buffer.
    ///
    /// Fails with [`TextureError::InvalidDimensions`] if a dimension is negative, does not fit
    /// into `i32`, or the byte length overflows.
    pub fn new(width: i64, height: i64) -> Result<Self, TextureError> {
        let invalid = || TextureError::InvalidDimensions { width, height };

        let w = i32::try_from(width)
            .ok()
            .and_then(|w| u32::try_from(w).ok())
            .ok_or_else(invalid)?;
        let h = i32::try_from(height)
            .ok()
            .and_then(|h| u32::try_from(h).ok())
            .ok_or_else(invalid)?;
        let len = byte_len(w, h).ok_or_else(invalid)?;

        Ok(Self {
            width: w,
            height: h,
            pixels: Arc::new(RwLock::new(vec![0; len])),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Buffer dimensions as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the backing storage in bytes. Always `width * height * 4`.
    pub fn byte_len(&self) -> usize {
        self.pixels.read().len()
    }

    /// Copies a rectangle of tightly packed RGBA8888 `pixels` into the buffer at `(x, y)`.
    ///
    /// The source row stride is `width * 4`. The rectangle is clipped to the buffer: columns and
    /// rows that fall outside (including negative origins) are skipped, and copying stops at the
    /// last complete source row segment if `pixels` is too short. Clipping is never an error.
    ///
    /// Returns the destination region that was written, or `None` if nothing was.
    pub fn draw_rect(
        &mut self,
        pixels: &[u8],
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Option<DrawnRect> {
        if width <= 0 || height <= 0 {
            return None;
        }

        let left = x.max(0);
        let top = y.max(0);
        let right = x.saturating_add(width).min(i64::from(self.width));
        let bottom = y.saturating_add(height).min(i64::from(self.height));
        if left >= right || top >= bottom {
            return None;
        }

        // All of these are bounded by the buffer dimensions after clipping.
        let cols = (right - left) as usize;
        let rows = (bottom - top) as usize;
        let src_col = (left - x) as usize;
        let src_row = (top - y) as usize;
        let row_bytes = cols * BYTES_PER_PIXEL;
        let src_stride = usize::try_from(width).ok()?.checked_mul(BYTES_PER_PIXEL)?;
        let dst_stride = self.width as usize * BYTES_PER_PIXEL;
        let dst_col_offset = left as usize * BYTES_PER_PIXEL;

        let mut buffer = self.pixels.write();
        let mut written = 0;
        for row in 0..rows {
            let src_start = (src_row + row)
                .checked_mul(src_stride)
                .and_then(|offset| offset.checked_add(src_col * BYTES_PER_PIXEL));
            let Some(src) = src_start.and_then(|start| pixels.get(start..start.checked_add(row_bytes)?)) else {
                break;
            };

            let dst_start = (top as usize + row) * dst_stride + dst_col_offset;
            buffer[dst_start..dst_start + row_bytes].copy_from_slice(src);
            written += 1;
        }

        if written == 0 {
            return None;
        }

        let drawn = DrawnRect {
            x: left as u32,
            y: top as u32,
            width: cols as u32,
            height: written as u32,
        };
        trace!("Drew {drawn:?} into {}x{} buffer", self.width, self.height);
        Some(drawn)
    }

    /// Returns a copy of the whole buffer.
    pub fn read(&self) -> Vec<u8> {
        self.pixels.read().clone()
    }

    /// Creates a pull-callback view of this buffer for a texture registry.
    pub fn source(&self) -> PixelSource {
        PixelSource {
            width: self.width,
            height: self.height,
            pixels: Arc::downgrade(&self.pixels),
        }
    }

    /// Releases the buffer storage. Outstanding [`PixelSource`]s stop returning data.
    pub fn dispose(self) {
        trace!("Disposing {}x{} pixel buffer", self.width, self.height);
    }
}

fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// A snapshot of a buffer's contents taken by a host pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8888 data, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

/// Read-only, weak view of a [`PixelBuffer`] used by host pull callbacks.
///
/// Cloneable and `Send + Sync` so it can be moved to the compositor's thread. Reads take the
/// buffer's read lock, so a pull never observes a partially applied blit.
#[derive(Debug, Clone)]
pub struct PixelSource {
    width: u32,
    height: u32,
    pixels: Weak<RwLock<Vec<u8>>>,
}

impl PixelSource {
    /// Dimensions of the underlying buffer.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the underlying buffer is still alive.
    pub fn is_live(&self) -> bool {
        self.pixels.strong_count() > 0
    }

    /// Copies the current contents, or returns `None` if the buffer was disposed.
    pub fn copy_pixels(&self) -> Option<PixelFrame> {
        self.with_pixels(|data, width, height| PixelFrame {
            width,
            height,
            data: data.to_vec(),
        })
    }

    /// Runs `f` with a borrowed view of the current contents and the buffer dimensions.
    ///
    /// Returns `None` without calling `f` if the buffer was disposed.
    pub fn with_pixels<T>(&self, f: impl FnOnce(&[u8], u32, u32) -> T) -> Option<T> {
        let pixels = self.pixels.upgrade()?;
        let data = pixels.read();
        Some(f(&data, self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
        rgba.repeat(width * height)
    }

    fn pixel_at(buffer: &PixelBuffer, x: u32, y: u32) -> [u8; 4] {
        let data = buffer.read();
        let offset = ((y * buffer.width() + x) as usize) * BYTES_PER_PIXEL;
        [
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]
    }

    #[test]
    fn new_buffer_is_zeroed() {
        for (w, h) in [(0, 0), (0, 5), (1, 1), (3, 7), (64, 32)] {
            let buffer = PixelBuffer::new(w, h).expect("valid dimensions");
            let data = buffer.read();
            assert_eq!(data.len(), (w * h * 4) as usize);
            assert!(data.iter().all(|&b| b == 0));
            assert_eq!(buffer.size(), (w as u32, h as u32));
            assert_eq!(buffer.byte_len(), data.len());
        }
    }

    #[test]
    fn rejects_invalid_dimensions() {
        for (w, h) in [(-1, 4), (4, -1), (i64::from(i32::MAX) + 1, 1)] {
            assert_eq!(
                PixelBuffer::new(w, h).unwrap_err(),
                TextureError::InvalidDimensions {
                    width: w,
                    height: h
                }
            );
        }
    }

    #[test]
    fn full_draw_round_trips() {
        let mut buffer = PixelBuffer::new(3, 2).expect("valid dimensions");
        let pixels: Vec<u8> = (0..24).collect();
        let drawn = buffer.draw_rect(&pixels, 0, 0, 3, 2);
        assert_eq!(
            drawn,
            Some(DrawnRect {
                x: 0,
                y: 0,
                width: 3,
                height: 2
            })
        );
        assert_eq!(buffer.read(), pixels);
    }

    #[test]
    fn draw_is_idempotent() {
        let mut once = PixelBuffer::new(4, 4).expect("valid dimensions");
        let mut twice = PixelBuffer::new(4, 4).expect("valid dimensions");
        let pixels = solid(2, 2, [10, 20, 30, 40]);

        once.draw_rect(&pixels, 1, 1, 2, 2);
        twice.draw_rect(&pixels, 1, 1, 2, 2);
        twice.draw_rect(&pixels, 1, 1, 2, 2);

        assert_eq!(once.read(), twice.read());
    }

    #[test]
    fn partial_draw_only_touches_target_rect() {
        let mut buffer = PixelBuffer::new(4, 3).expect("valid dimensions");
        buffer.draw_rect(&solid(2, 1, [1, 2, 3, 4]), 1, 1, 2, 1);

        for y in 0..3 {
            for x in 0..4 {
                let expected = if y == 1 && (x == 1 || x == 2) {
                    [1, 2, 3, 4]
                } else {
                    [0, 0, 0, 0]
                };
                assert_eq!(pixel_at(&buffer, x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn clips_at_right_edge() {
        let (w, h) = (5u32, 3u32);
        let mut buffer = PixelBuffer::new(w.into(), h.into()).expect("valid dimensions");
        let pixels = solid(10, h as usize, [9, 9, 9, 9]);

        let drawn = buffer.draw_rect(&pixels, i64::from(w) - 1, 0, 10, h.into());
        assert_eq!(
            drawn,
            Some(DrawnRect {
                x: w - 1,
                y: 0,
                width: 1,
                height: h
            })
        );

        for y in 0..h {
            for x in 0..w {
                let expected = if x == w - 1 { [9; 4] } else { [0; 4] };
                assert_eq!(pixel_at(&buffer, x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn clips_at_bottom_edge() {
        let mut buffer = PixelBuffer::new(2, 2).expect("valid dimensions");
        let pixels = solid(2, 5, [7, 7, 7, 7]);
        let drawn = buffer.draw_rect(&pixels, 0, 1, 2, 5);
        assert_eq!(drawn.map(|r| (r.y, r.height)), Some((1, 1)));
        assert_eq!(pixel_at(&buffer, 0, 0), [0; 4]);
        assert_eq!(pixel_at(&buffer, 1, 1), [7; 4]);
    }

    #[test]
    fn negative_origin_skips_source_columns_and_rows() {
        let mut buffer = PixelBuffer::new(2, 2).expect("valid dimensions");
        // 3x3 source, pixel value encodes its own source coordinates.
        let mut pixels = Vec::new();
        for sy in 0..3u8 {
            for sx in 0..3u8 {
                pixels.extend_from_slice(&[sx, sy, 0, 255]);
            }
        }

        let drawn = buffer.draw_rect(&pixels, -1, -1, 3, 3);
        assert_eq!(
            drawn,
            Some(DrawnRect {
                x: 0,
                y: 0,
                width: 2,
                height: 2
            })
        );
        assert_eq!(pixel_at(&buffer, 0, 0), [1, 1, 0, 255]);
        assert_eq!(pixel_at(&buffer, 1, 0), [2, 1, 0, 255]);
        assert_eq!(pixel_at(&buffer, 0, 1), [1, 2, 0, 255]);
        assert_eq!(pixel_at(&buffer, 1, 1), [2, 2, 0, 255]);
    }

    #[test]
    fn out_of_range_and_empty_rects_are_no_ops() {
        let mut buffer = PixelBuffer::new(2, 2).expect("valid dimensions");
        let pixels = solid(2, 2, [5; 4]);

        assert_eq!(buffer.draw_rect(&pixels, 2, 0, 2, 2), None);
        assert_eq!(buffer.draw_rect(&pixels, 0, 2, 2, 2), None);
        assert_eq!(buffer.draw_rect(&pixels, -2, 0, 2, 2), None);
        assert_eq!(buffer.draw_rect(&pixels, 0, 0, 0, 2), None);
        assert_eq!(buffer.draw_rect(&pixels, 0, 0, 2, -1), None);
        assert_eq!(buffer.draw_rect(&pixels, i64::MAX, i64::MAX, i64::MAX, 1), None);
        assert!(buffer.read().iter().all(|&b| b == 0));
    }

    #[test]
    fn short_source_stops_at_last_complete_row() {
        let mut buffer = PixelBuffer::new(2, 3).expect("valid dimensions");
        // Enough data for one full row and half of the second.
        let pixels = solid(3, 1, [3; 4]);

        let drawn = buffer.draw_rect(&pixels, 0, 0, 2, 3);
        assert_eq!(drawn.map(|r| r.height), Some(1));
        assert_eq!(pixel_at(&buffer, 1, 0), [3; 4]);
        assert_eq!(pixel_at(&buffer, 0, 1), [0; 4]);
    }

    #[test]
    fn source_reflects_latest_draw_and_dies_with_buffer() {
        let mut buffer = PixelBuffer::new(1, 1).expect("valid dimensions");
        let source = buffer.source();
        assert!(source.is_live());
        assert_eq!(source.size(), (1, 1));

        buffer.draw_rect(&[1, 2, 3, 4], 0, 0, 1, 1);
        assert_eq!(
            source.copy_pixels(),
            Some(PixelFrame {
                width: 1,
                height: 1,
                data: vec![1, 2, 3, 4]
            })
        );

        buffer.dispose();
        assert!(!source.is_live());
        assert_eq!(source.copy_pixels(), None);
        assert_eq!(source.with_pixels(|data, _, _| data.len()), None);
    }
}
