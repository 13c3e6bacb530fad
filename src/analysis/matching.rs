//! Lexicographic (sort-based) block matching.
//!
//! All fingerprint scalars are sorted by value and only neighbours in that
//! order are compared, which replaces the quadratic all-pairs comparison with
//! an `O(n log n)` sort. A pair of neighbours is confirmed when their block
//! coordinates lie closer than the distance threshold.
//!
//! This is a pruning heuristic, not a nearest-neighbour search: when more than
//! two records share a value only consecutive ones are ever paired, so true
//! matches separated by an intervening record are missed.

use crate::analysis::features::FeatureRecord;

/// Two block coordinates and the per-axis distance between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementVector {
    pub xa: u32,
    pub ya: u32,
    pub xb: u32,
    pub yb: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DisplacementVector {
    pub fn between(a: &FeatureRecord, b: &FeatureRecord) -> Self {
        Self {
            xa: a.x,
            ya: a.y,
            xb: b.x,
            yb: b.y,
            offset_x: (a.x as f64 - b.x as f64).abs(),
            offset_y: (a.y as f64 - b.y as f64).abs(),
        }
    }

    pub fn source(&self) -> (u32, u32) {
        (self.xa, self.ya)
    }

    pub fn target(&self) -> (u32, u32) {
        (self.xb, self.yb)
    }

    pub fn length(&self) -> f64 {
        self.offset_x.hypot(self.offset_y)
    }

    pub fn is_self_match(&self) -> bool {
        self.source() == self.target()
    }
}

pub struct LexicographicMatcher {
    distance_threshold: f64,
}

impl LexicographicMatcher {
    pub fn new(distance_threshold: f64) -> Self {
        Self { distance_threshold }
    }

    /// Stable ascending sort by value.
    pub fn sort(mut records: Vec<FeatureRecord>) -> Vec<FeatureRecord> {
        records.sort_by(|a, b| a.value.total_cmp(&b.value));
        records
    }

    /// Confirms a pair of value-neighbours when their blocks are closer than
    /// the distance threshold.
    pub fn confirm(&self, a: &FeatureRecord, b: &FeatureRecord) -> Option<DisplacementVector> {
        let vector = DisplacementVector::between(a, b);

        if vector.length() < self.distance_threshold {
            Some(vector)
        } else {
            None
        }
    }

    /// Scans already sorted records pairwise.
    pub fn scan(&self, sorted: &[FeatureRecord]) -> Vec<DisplacementVector> {
        sorted
            .windows(2)
            .filter_map(|pair| self.confirm(&pair[0], &pair[1]))
            .collect()
    }

    pub fn find_candidates(&self, records: Vec<FeatureRecord>) -> Vec<DisplacementVector> {
        self.scan(&Self::sort(records))
    }
}
