use std::{path::Path, sync::OnceLock};

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::{
    analysis::{
        color_space::ChromaPairing, copy_move::CopyMoveDetector, histogram::OffsetBucketing,
        matching::DisplacementVector,
    },
    error::Result,
    report::visualization::ForgeryOverlay,
};

pub mod error;
pub mod image_utils;
pub mod analysis;
pub mod report;

/// Working resolution bound applied before detection.
pub const MAX_IMAGE_SIZE: u32 = 320;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyMoveConfig {
    pub block_size: u32,
    pub distance_threshold: f64,
    pub offset_threshold: usize,
    pub separation_threshold: f64,
    pub blur_radius: u32,
    pub max_image_size: Option<u32>,
    pub bucketing: OffsetBucketing,
    pub chroma_pairing: ChromaPairing,
}

impl Default for CopyMoveConfig {
    fn default() -> Self {
        Self {
            block_size: 4,
            distance_threshold: 0.4,
            offset_threshold: 72,
            separation_threshold: 210.0,
            blur_radius: 1,
            max_image_size: Some(MAX_IMAGE_SIZE),
            bucketing: OffsetBucketing::Exact,
            chroma_pairing: ChromaPairing::MirroredCr,
        }
    }
}

impl CopyMoveConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

pub struct CopyMoveAnalyzer {
    original: DynamicImage,
    config: CopyMoveConfig,
    path: Option<String>,
    working: OnceLock<RgbImage>,
}

impl CopyMoveAnalyzer {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path
            .as_ref()
            .to_string_lossy()
            .to_string();
        let original = image::open(&path)?;

        Ok(Self {
            original,
            config: CopyMoveConfig::default(),
            path: Some(path_str),
            working: OnceLock::new(),
        })
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            original: image,
            config: CopyMoveConfig::default(),
            path: None,
            working: OnceLock::new(),
        }
    }

    pub fn with_config(mut self, config: CopyMoveConfig) -> Self {
        self.config = config;
        self.working = OnceLock::new();
        self
    }

    pub fn config(&self) -> &CopyMoveConfig {
        &self.config
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The image detection runs on: the original, bounded by
    /// `max_image_size` when set. Computed once per configuration.
    pub fn working_image(&self) -> &RgbImage {
        self.working.get_or_init(|| {
            let rgb = self.original.to_rgb8();

            match self.config.max_image_size {
                Some(max_size) => image_utils::bound_dimensions(&rgb, max_size),
                None => rgb,
            }
        })
    }

    pub fn detect(&self) -> Result<CopyMoveResult> {
        let detector = CopyMoveDetector::new(self.config.clone())?;
        detector.detect(self.working_image())
    }

    /// Highlights the forged regions of `result` on the working image.
    pub fn render(&self, result: &CopyMoveResult) -> RgbImage {
        ForgeryOverlay::new(result.block_size).render(self.working_image(), &result.forged_regions)
    }
}

/// A displacement confirmed as a copy-move forgery: the block at
/// `(xa, ya)` reappears at `(xb, yb)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForgedRegion {
    pub xa: u32,
    pub ya: u32,
    pub xb: u32,
    pub yb: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl From<DisplacementVector> for ForgedRegion {
    fn from(vector: DisplacementVector) -> Self {
        Self {
            xa: vector.xa,
            ya: vector.ya,
            xb: vector.xb,
            yb: vector.yb,
            offset_x: vector.offset_x,
            offset_y: vector.offset_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Forged { confidence: f64 },
    Authentic { confidence: f64 },
}

impl Verdict {
    pub fn from_precision(precision: f64) -> Self {
        if precision > 50.0 {
            Verdict::Forged { confidence: precision }
        } else {
            Verdict::Authentic { confidence: 100.0 - precision }
        }
    }

    pub fn is_forged(&self) -> bool {
        matches!(self, Verdict::Forged { .. })
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Forged { confidence } => write!(f, "{confidence:.0}% the image is forged!"),
            Verdict::Authentic { confidence } => write!(f, "{confidence:.0}% the image is NOT forged!"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CopyMoveResult {
    pub width: u32,
    pub height: u32,
    pub block_size: u32,
    pub block_count: usize,
    pub candidate_count: usize,
    pub suspicious_count: usize,
    pub forged_regions: Vec<ForgedRegion>,
    pub precision: f64,
}

impl CopyMoveResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_precision(self.precision)
    }
}
