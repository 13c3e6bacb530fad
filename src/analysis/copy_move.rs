use std::time::Instant;

use image::RgbImage;
use log::{debug, info};

use crate::{
    CopyMoveConfig, CopyMoveResult,
    analysis::{
        blocks::BlockGrid,
        color_space,
        features::{BlockFeatureExtractor, ChannelPlanes},
        histogram::{DisplacementHistogram, OffsetBucketing},
        matching::LexicographicMatcher,
        suppression::{NeighborSuppressor, precision_score},
    },
    error::{ForensicsError, Result},
    image_utils::blur,
};

/// Block-matching copy-move detector.
///
/// Stages run strictly in order and each one owns its output: blur, YCbCr
/// conversion, overlapping block decomposition, per-block DCT fingerprints,
/// sort-based candidate matching, displacement histogram, neighbour
/// suppression.
pub struct CopyMoveDetector {
    config: CopyMoveConfig,
}

impl CopyMoveDetector {
    pub fn new(config: CopyMoveConfig) -> Result<Self> {
        if config.block_size < 2 {
            return Err(ForensicsError::InvalidBlockSize(config.block_size));
        }

        for (name, value) in [
            ("distance threshold", config.distance_threshold),
            ("separation threshold", config.separation_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ForensicsError::InvalidParameter(format!(
                    "{name} must be a non-negative number (got {value})"
                )));
            }
        }

        if let OffsetBucketing::Quantized { step } = config.bucketing {
            if !step.is_finite() || step <= 0.0 {
                return Err(ForensicsError::InvalidParameter(format!(
                    "offset quantization step must be positive (got {step})"
                )));
            }
        }

        if config.max_image_size == Some(0) {
            return Err(ForensicsError::InvalidParameter(
                "maximum image size must be positive".into(),
            ));
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &CopyMoveConfig {
        &self.config
    }

    pub fn detect(&self, image: &RgbImage) -> Result<CopyMoveResult> {
        let (width, height) = image.dimensions();
        let grid = BlockGrid::new(width, height, self.config.block_size)?;
        let started = Instant::now();

        let smoothed = blur(image, self.config.blur_radius);
        let planes = ChannelPlanes::from_ycbcr(&color_space::to_ycbcr(&smoothed), self.config.chroma_pairing);

        let extractor = BlockFeatureExtractor::new(self.config.block_size, width, height);
        let records = extractor.extract_all(&planes, &grid);
        debug!(
            "extracted {} feature records from {} blocks in {:.2?}",
            records.len(),
            grid.len(),
            started.elapsed()
        );

        let matcher = LexicographicMatcher::new(self.config.distance_threshold);
        let candidates = matcher.find_candidates(records);
        debug!("{} candidate pairs after matching", candidates.len());

        let mut histogram = DisplacementHistogram::new(self.config.offset_threshold, self.config.bucketing);
        let suspicious = histogram.suspicious(&candidates);
        debug!(
            "{} suspicious vectors across {} distinct offsets",
            suspicious.len(),
            histogram.distinct_offsets()
        );

        let suppressor = NeighborSuppressor::new(self.config.separation_threshold);
        let forged_regions = suppressor.suppress(&suspicious);
        let precision = precision_score(forged_regions.len(), suspicious.len());

        info!(
            "{}x{} image: {} forged regions, {} suspicious, precision {:.1} ({:.2?})",
            width,
            height,
            forged_regions.len(),
            suspicious.len(),
            precision,
            started.elapsed()
        );

        Ok(CopyMoveResult {
            width,
            height,
            block_size: self.config.block_size,
            block_count: grid.len(),
            candidate_count: candidates.len(),
            suspicious_count: suspicious.len(),
            forged_regions,
            precision,
        })
    }
}
