use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::matching::DisplacementVector;

/// Bucket key for a displacement. Two vectors with equal keys are treated as
/// the same physical shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplacementKey {
    /// Bit patterns of the two offsets.
    Exact(u64, u64),
    /// Offsets rounded to a multiple of the quantisation step.
    Quantized(i64, i64),
}

/// How offsets are turned into [`DisplacementKey`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OffsetBucketing {
    #[default]
    Exact,
    Quantized { step: f64 },
}

impl OffsetBucketing {
    pub fn key(&self, offset_x: f64, offset_y: f64) -> DisplacementKey {
        match *self {
            // + 0.0 folds -0.0 into 0.0
            OffsetBucketing::Exact => {
                DisplacementKey::Exact((offset_x + 0.0).to_bits(), (offset_y + 0.0).to_bits())
            }
            OffsetBucketing::Quantized { step } => DisplacementKey::Quantized(
                (offset_x / step).round() as i64,
                (offset_y / step).round() as i64,
            ),
        }
    }
}

/// Occurrence counts per displacement key.
#[derive(Debug, Clone)]
pub struct DisplacementHistogram {
    offset_threshold: usize,
    bucketing: OffsetBucketing,
    counts: HashMap<DisplacementKey, usize>,
}

impl DisplacementHistogram {
    pub fn new(offset_threshold: usize, bucketing: OffsetBucketing) -> Self {
        Self {
            offset_threshold,
            bucketing,
            counts: HashMap::new(),
        }
    }

    /// Counts `vector` and reports whether its key has now been seen more
    /// than `offset_threshold` times.
    pub fn accumulate(&mut self, vector: &DisplacementVector) -> bool {
        let key = self.bucketing.key(vector.offset_x, vector.offset_y);
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;

        *count > self.offset_threshold
    }

    pub fn count(&self, offset_x: f64, offset_y: f64) -> usize {
        let key = self.bucketing.key(offset_x, offset_y);
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub fn distinct_offsets(&self) -> usize {
        self.counts.len()
    }

    /// Accumulates every vector in order and keeps the ones that were
    /// suspicious at the moment they were counted.
    pub fn suspicious(&mut self, vectors: &[DisplacementVector]) -> Vec<DisplacementVector> {
        vectors
            .iter()
            .filter(|vector| self.accumulate(vector))
            .copied()
            .collect()
    }
}
