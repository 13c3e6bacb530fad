use image::{DynamicImage, Rgba, RgbImage, RgbaImage, imageops};
use imageproc::{drawing::draw_filled_rect_mut, filter::gaussian_blur_f32, rect::Rect};

use crate::ForgedRegion;

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub color: Rgba<u8>,
    /// Side of the highlighted square, in blocks.
    pub scale: u32,
    /// Sigma of the blur that softens the highlight layer; 0 disables it.
    pub softness: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: Rgba([255, 0, 0, 255]),
            scale: 2,
            softness: 10.0,
        }
    }
}

/// Paints forged regions over an image.
pub struct ForgeryOverlay {
    block_size: u32,
    config: OverlayConfig,
}

impl ForgeryOverlay {
    pub fn new(block_size: u32) -> Self {
        Self::with_config(block_size, OverlayConfig::default())
    }

    pub fn with_config(block_size: u32, config: OverlayConfig) -> Self {
        Self { block_size, config }
    }

    /// Fills a square at each region's source block on a transparent layer,
    /// softens the layer and composites it over `image`.
    pub fn render(&self, image: &RgbImage, regions: &[ForgedRegion]) -> RgbImage {
        if regions.is_empty() {
            return image.clone();
        }

        let (width, height) = image.dimensions();
        let side = (self.block_size * self.config.scale).max(1);

        let mut layer = RgbaImage::new(width, height);
        for region in regions {
            let rect = Rect::at(region.xa as i32, region.ya as i32).of_size(side, side);
            draw_filled_rect_mut(&mut layer, rect, self.config.color);
        }

        if self.config.softness > 0.0 {
            layer = gaussian_blur_f32(&layer, self.config.softness);
        }

        let mut composed = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
        imageops::overlay(&mut composed, &layer, 0, 0);

        DynamicImage::ImageRgba8(composed).to_rgb8()
    }
}
