//! Procedural "plasma" texture fill.
//!
//! An oldskool effect built from four combined sine waves. The fill is a pure
//! function of `(width, height, row_stride, time)`; it has no side effects
//! beyond writing the output buffer, so the same arguments always produce
//! byte-identical pixels.

/// Bytes per pixel written by [`fill_plasma`].
pub const BYTES_PER_PIXEL: usize = 4;

/// Fill `out` with plasma pixels for a `width` x `height` image whose rows
/// start `row_stride` bytes apart.
///
/// Each pixel gets the same 8-bit value in all four channels. Bytes between
/// `width * 4` and `row_stride` in each row are left untouched.
///
/// # Panics
///
/// Panics if `out` is too small to hold `height` rows of `row_stride` bytes
/// (with the last row only needing `width * 4`).
pub fn fill_plasma(width: u32, height: u32, row_stride: usize, time: f32, out: &mut [u8]) {
    let t = time * 4.0;

    for y in 0..height as usize {
        let row = &mut out[y * row_stride..y * row_stride + width as usize * BYTES_PER_PIXEL];
        for x in 0..width as usize {
            let (fx, fy) = (x as f32, y as f32);
            let sum = (127.0 + 127.0 * (fx / 7.0 + t).sin())
                + (127.0 + 127.0 * (fy / 5.0 - t).sin())
                + (127.0 + 127.0 * ((fx + fy) / 6.0 - t).sin())
                + (127.0 + 127.0 * ((fx * fx + fy * fy).sqrt() / 4.0 - t).sin());
            let v = (sum as i32 / 4) as u8;

            let pixel = &mut row[x * BYTES_PER_PIXEL..(x + 1) * BYTES_PER_PIXEL];
            pixel.fill(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel_at_time_zero() {
        // All four sine terms are sin(0) = 0 at the origin, so every term is
        // exactly 127 and the average is 127.
        let mut out = [0u8; 4];
        fill_plasma(1, 1, 4, 0.0, &mut out);
        assert_eq!(out, [127, 127, 127, 127]);
    }

    #[test]
    fn test_deterministic() {
        let mut a = vec![0u8; 16 * 9 * 4];
        let mut b = vec![0u8; 16 * 9 * 4];
        fill_plasma(16, 9, 16 * 4, 1.375, &mut a);
        fill_plasma(16, 9, 16 * 4, 1.375, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_changes_output() {
        let mut a = vec![0u8; 8 * 8 * 4];
        let mut b = vec![0u8; 8 * 8 * 4];
        fill_plasma(8, 8, 32, 0.0, &mut a);
        fill_plasma(8, 8, 32, 0.5, &mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_row_padding_is_untouched() {
        // stride leaves 8 padding bytes per row
        let stride = 2 * 4 + 8;
        let mut out = vec![0xAB; stride * 2];
        fill_plasma(2, 2, stride, 0.25, &mut out);
        for y in 0..2 {
            assert!(out[y * stride + 8..y * stride + stride]
                .iter()
                .all(|&b| b == 0xAB));
        }
    }

    #[test]
    fn test_all_channels_equal() {
        let mut out = vec![0u8; 5 * 3 * 4];
        fill_plasma(5, 3, 20, 2.0, &mut out);
        for pixel in out.chunks_exact(4) {
            assert!(pixel.iter().all(|&c| c == pixel[0]));
        }
    }
}
