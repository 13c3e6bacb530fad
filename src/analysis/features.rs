use image::RgbImage;
use ndarray::{Array2, ArrayView2};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::analysis::{
    blocks::{Block, BlockGrid},
    color_space::{self, ChromaPairing},
    dct::{DctBasis, quantize},
};

/// Scalars emitted per block.
pub const FEATURES_PER_BLOCK: usize = 9;

/// One fingerprint component of the block anchored at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    pub x: u32,
    pub y: u32,
    pub value: f64,
}

/// Per-pixel planes the fingerprint is computed from, indexed `[row, column]`.
///
/// `red`, `green` and `blue` are reconstructed from the luma/chroma image, not
/// taken from the source pixels; `pairing` picks the chroma fed back in.
#[derive(Debug, Clone)]
pub struct ChannelPlanes {
    pub luma: Array2<f64>,
    pub red: Array2<f64>,
    pub green: Array2<f64>,
    pub blue: Array2<f64>,
}

impl ChannelPlanes {
    pub fn from_ycbcr(ycbcr: &RgbImage, pairing: ChromaPairing) -> Self {
        let reconstructed = color_space::to_rgb(ycbcr, pairing);

        Self {
            luma: plane(ycbcr, 0),
            red: plane(&reconstructed, 0),
            green: plane(&reconstructed, 1),
            blue: plane(&reconstructed, 2),
        }
    }
}

fn plane(image: &RgbImage, channel: usize) -> Array2<f64> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        image.get_pixel(col as u32, row as u32)[channel] as f64
    })
}

/// Computes the 9-scalar fingerprint of every block:
///
/// 1. luma DCT coefficients `(0,0)`, `(0,1)`, `(1,0)`
/// 2. DC coefficient of red, green and blue
/// 3. mean red, green and blue
///
/// Coefficients are scaled with the larger image side and quantised for
/// blocks of side 4 or less.
pub struct BlockFeatureExtractor {
    basis: DctBasis,
}

impl BlockFeatureExtractor {
    pub fn new(block_size: u32, width: u32, height: u32) -> Self {
        Self {
            basis: DctBasis::new(block_size as usize, width.max(height) as usize),
        }
    }

    fn quantized(&self, view: ArrayView2<'_, f64>, u: usize, v: usize) -> f64 {
        quantize(self.basis.coefficient(view, u, v), u, v, self.basis.size())
    }

    pub fn extract_block(&self, planes: &ChannelPlanes, block: Block) -> [FeatureRecord; FEATURES_PER_BLOCK] {
        let luma = block.view(&planes.luma);
        let red = block.view(&planes.red);
        let green = block.view(&planes.green);
        let blue = block.view(&planes.blue);
        let area = (block.size * block.size) as f64;

        let values = [
            self.quantized(luma, 0, 0),
            self.quantized(luma, 0, 1),
            self.quantized(luma, 1, 0),
            self.quantized(red, 0, 0),
            self.quantized(green, 0, 0),
            self.quantized(blue, 0, 0),
            red.sum() / area,
            green.sum() / area,
            blue.sum() / area,
        ];

        values.map(|value| FeatureRecord {
            x: block.x,
            y: block.y,
            value,
        })
    }

    /// Records for the whole grid, in block scan order.
    pub fn extract_all(&self, planes: &ChannelPlanes, grid: &BlockGrid) -> Vec<FeatureRecord> {
        let blocks = grid.blocks().collect::<Vec<_>>();

        blocks
            .par_iter()
            .flat_map_iter(|&block| self.extract_block(planes, block))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;
    use crate::analysis::dct::QUANTIZATION_4X4;

    fn textured(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 31 + y * 7) as u8, (x * y + 40) as u8, (200 - x - y) as u8])
        })
    }

    #[test]
    fn test_nine_records_per_block() {
        let ycbcr = color_space::to_ycbcr(&textured(12, 10));
        let planes = ChannelPlanes::from_ycbcr(&ycbcr, ChromaPairing::default());
        let grid = BlockGrid::new(12, 10, 4).unwrap();
        let extractor = BlockFeatureExtractor::new(4, 12, 10);

        let records = extractor.extract_all(&planes, &grid);

        assert_eq!(records.len(), grid.len() * FEATURES_PER_BLOCK);
        for (chunk, block) in records.chunks(FEATURES_PER_BLOCK).zip(grid.blocks()) {
            assert!(chunk.iter().all(|r| r.x == block.x && r.y == block.y));
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let ycbcr = color_space::to_ycbcr(&textured(16, 16));
        let planes = ChannelPlanes::from_ycbcr(&ycbcr, ChromaPairing::default());
        let grid = BlockGrid::new(16, 16, 3).unwrap();
        let extractor = BlockFeatureExtractor::new(3, 16, 16);

        assert_eq!(extractor.extract_all(&planes, &grid), extractor.extract_all(&planes, &grid));
    }

    #[test]
    fn test_uniform_gray_fingerprint() {
        let image = RgbImage::from_pixel(32, 16, Rgb([128, 128, 128]));
        let planes = ChannelPlanes::from_ycbcr(&color_space::to_ycbcr(&image), ChromaPairing::default());
        let extractor = BlockFeatureExtractor::new(4, 32, 16);

        let records = extractor.extract_block(&planes, Block { x: 5, y: 2, size: 4 });
        let dc = 16.0 * 128.0 / 32.0 / QUANTIZATION_4X4[0][0];

        assert!((records[0].value - dc).abs() < 1e-9);
        assert!(records[1].value.abs() < 1e-9);
        assert!(records[2].value.abs() < 1e-9);
        for record in &records[3..6] {
            assert!((record.value - dc).abs() < 1e-9);
        }
        for record in &records[6..] {
            assert_eq!(record.value, 128.0);
        }
    }

    fn saturated_red_records(pairing: ChromaPairing) -> [FeatureRecord; FEATURES_PER_BLOCK] {
        let image = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
        let planes = ChannelPlanes::from_ycbcr(&color_space::to_ycbcr(&image), pairing);
        let extractor = BlockFeatureExtractor::new(4, 4, 4);

        extractor.extract_block(&planes, Block { x: 0, y: 0, size: 4 })
    }

    #[test]
    fn test_colour_records_follow_mirrored_chroma() {
        // (255, 0, 0) -> YCbCr (76, 85, 255); (76, 255, 255) -> RGB (254, 0, 255)
        let records = saturated_red_records(ChromaPairing::MirroredCr);
        let expected = [254.0, 0.0, 255.0];

        for (channel, &value) in expected.iter().enumerate() {
            // 16 * value * (1/4) / 16
            assert!((records[3 + channel].value - value / 4.0).abs() < 1e-9);
            assert_eq!(records[6 + channel].value, value);
        }
    }

    #[test]
    fn test_colour_records_with_standard_chroma() {
        let records = saturated_red_records(ChromaPairing::Standard);
        let (y, cb, cr) = color_space::rgb_to_ycbcr(255, 0, 0);
        let (r, g, b) = color_space::ycbcr_to_rgb(y, cb, cr);

        assert_eq!((r, g, b), (254, 0, 0));
        assert_eq!(records[6].value, r as f64);
        assert_eq!(records[7].value, g as f64);
        assert_eq!(records[8].value, b as f64);
        assert_ne!(records[8].value, saturated_red_records(ChromaPairing::MirroredCr)[8].value);
    }

    #[test]
    fn test_identical_content_gives_identical_fingerprints() {
        let mut image = RgbImage::from_pixel(24, 8, Rgb([90, 90, 90]));
        for y in 0..4 {
            for x in 0..4 {
                let pixel = Rgb([(x * 60) as u8, (y * 50) as u8, (x * y * 10) as u8]);
                image.put_pixel(2 + x, 3 + y, pixel);
                image.put_pixel(15 + x, 3 + y, pixel);
            }
        }

        let planes = ChannelPlanes::from_ycbcr(&color_space::to_ycbcr(&image), ChromaPairing::default());
        let extractor = BlockFeatureExtractor::new(4, 24, 8);

        let a = extractor.extract_block(&planes, Block { x: 2, y: 3, size: 4 });
        let b = extractor.extract_block(&planes, Block { x: 15, y: 3, size: 4 });

        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra.value.to_bits(), rb.value.to_bits());
        }
    }
}
