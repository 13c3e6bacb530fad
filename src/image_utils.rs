use image::{RgbImage, imageops::{self, FilterType}};
use imageproc::filter::gaussian_blur_f32;

/// Gaussian pre-filter applied before colour conversion. A radius of zero
/// leaves the image untouched.
pub fn blur(image: &RgbImage, radius: u32) -> RgbImage {
    if radius == 0 {
        return image.clone();
    }

    gaussian_blur_f32(image, radius as f32)
}

/// Downscales `image` so that neither side exceeds `max_size`, keeping the
/// aspect ratio. Width is checked first.
pub fn bound_dimensions(image: &RgbImage, max_size: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let max_size = max_size.max(1);

    let (new_width, new_height) = if width > max_size {
        (max_size, scale_side(height, max_size, width))
    } else if height > max_size {
        (scale_side(width, max_size, height), max_size)
    } else {
        return image.clone();
    };

    imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
}

fn scale_side(side: u32, target: u32, reference: u32) -> u32 {
    ((side as f64 * target as f64 / reference as f64).round() as u32).max(1)
}
