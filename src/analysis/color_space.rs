//! RGB <-> YCbCr conversion in 16.16 fixed point.
//!
//! The forward and inverse transforms are the JFIF ones with rounding and
//! clamping to `[0, 255]`. Feature extraction reads luma from the converted
//! image and averages the RGB values obtained by converting each luma/chroma
//! pixel *back*, so both directions must stay bit-exact.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use rayon::{iter::{IndexedParallelIterator, ParallelIterator}, slice::{ParallelSlice, ParallelSliceMut}};

const HALF: i32 = 1 << 15;

#[inline]
fn clamp_fixed(value: i32) -> u8 {
    (value.clamp(0, 0x00ff_ffff) >> 16) as u8
}

pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as i32, g as i32, b as i32);

    let y = (19595 * r + 38470 * g + 7471 * b + HALF) >> 16;
    let cb = -11056 * r - 21712 * g + 32768 * b + (257 << 15);
    let cr = 32768 * r - 27440 * g - 5328 * b + (257 << 15);

    (y as u8, clamp_fixed(cb), clamp_fixed(cr))
}

pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = y as i32 * 0x10101;
    let cb = cb as i32 - 128;
    let cr = cr as i32 - 128;

    let r = y + 91881 * cr;
    let g = y - 22554 * cb - 46802 * cr;
    let b = y + 116130 * cb;

    (clamp_fixed(r), clamp_fixed(g), clamp_fixed(b))
}

/// Converts every pixel to `(Y, Cb, Cr)`, stored in the three channels of an
/// `RgbImage`.
pub fn to_ycbcr(image: &RgbImage) -> RgbImage {
    map_pixels(image, rgb_to_ycbcr)
}

/// Which chroma values feed the YCbCr -> RGB reconstruction used for the
/// colour features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromaPairing {
    /// Cr in both chroma slots. Fingerprints of the reference detector depend
    /// on this reconstruction.
    #[default]
    MirroredCr,
    /// The proper `(Cb, Cr)` pair.
    Standard,
}

fn ycbcr_to_rgb_mirrored(y: u8, _cb: u8, cr: u8) -> (u8, u8, u8) {
    ycbcr_to_rgb(y, cr, cr)
}

/// Converts a `(Y, Cb, Cr)` image back to RGB.
pub fn to_rgb(ycbcr: &RgbImage, pairing: ChromaPairing) -> RgbImage {
    match pairing {
        ChromaPairing::MirroredCr => map_pixels(ycbcr, ycbcr_to_rgb_mirrored),
        ChromaPairing::Standard => map_pixels(ycbcr, ycbcr_to_rgb),
    }
}

fn map_pixels(image: &RgbImage, f: fn(u8, u8, u8) -> (u8, u8, u8)) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut output = RgbImage::new(width, height);

    output
        .par_chunks_exact_mut(3)
        .zip(image.par_chunks_exact(3))
        .for_each(|(dst, src)| {
            let (a, b, c) = f(src[0], src[1], src[2]);
            dst.copy_from_slice(&[a, b, c]);
        });

    output
}
