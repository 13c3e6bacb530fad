use crate::{ForgedRegion, analysis::matching::DisplacementVector};

/// Collapses runs of suspicious vectors that point at the same patch.
///
/// Overlapping blocks make one pasted region produce many suspicious vectors
/// whose source blocks are neighbours. Each vector is compared with its
/// predecessor and kept only if their source blocks are further apart than
/// `separation_threshold`. Vectors whose two blocks coincide are never kept.
pub struct NeighborSuppressor {
    separation_threshold: f64,
}

impl NeighborSuppressor {
    pub fn new(separation_threshold: f64) -> Self {
        Self { separation_threshold }
    }

    pub fn suppress(&self, suspicious: &[DisplacementVector]) -> Vec<ForgedRegion> {
        suspicious
            .windows(2)
            .filter_map(|pair| {
                let (previous, current) = (&pair[0], &pair[1]);
                let separation = (previous.xa as f64 - current.xa as f64)
                    .hypot(previous.ya as f64 - current.ya as f64);

                if separation > self.separation_threshold && !current.is_self_match() {
                    Some(ForgedRegion::from(*current))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// `100 - 100 * forged / (forged + suspicious)`, or 0 when nothing is forged.
pub fn precision_score(forged: usize, suspicious: usize) -> f64 {
    if forged == 0 {
        return 0.0;
    }

    100.0 - 100.0 * forged as f64 / (forged + suspicious) as f64
}
