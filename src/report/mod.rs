pub mod visualization;

use serde::Serialize;

use crate::{CopyMoveConfig, CopyMoveResult, ForgedRegion, Verdict};

#[derive(Serialize)]
pub struct JsonReport {
    pub source: Option<String>,
    pub width: u32,
    pub height: u32,
    pub config: CopyMoveConfig,
    pub statistics: DetectionStatistics,
    pub precision: f64,
    pub verdict: Verdict,
    pub forged_regions: Vec<ForgedRegion>,
}

#[derive(Serialize)]
pub struct DetectionStatistics {
    pub block_count: usize,
    pub candidate_count: usize,
    pub suspicious_count: usize,
    pub forged_count: usize,
}

impl JsonReport {
    pub fn new(result: &CopyMoveResult, config: &CopyMoveConfig, source: Option<&str>) -> Self {
        Self {
            source: source.map(str::to_string),
            width: result.width,
            height: result.height,
            config: config.clone(),
            statistics: DetectionStatistics {
                block_count: result.block_count,
                candidate_count: result.candidate_count,
                suspicious_count: result.suspicious_count,
                forged_count: result.forged_regions.len(),
            },
            precision: result.precision,
            verdict: result.verdict(),
            forged_regions: result.forged_regions.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let result = CopyMoveResult {
            width: 64,
            height: 48,
            block_size: 4,
            block_count: 2745,
            candidate_count: 300,
            suspicious_count: 90,
            forged_regions: vec![ForgedRegion {
                xa: 1,
                ya: 2,
                xb: 21,
                yb: 2,
                offset_x: 20.0,
                offset_y: 0.0,
            }],
            precision: 98.9,
        };

        let json = JsonReport::new(&result, &CopyMoveConfig::default(), Some("in.png"))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["source"], "in.png");
        assert_eq!(value["statistics"]["forged_count"], 1);
        assert_eq!(value["verdict"]["verdict"], "forged");
        assert_eq!(value["forged_regions"][0]["xb"], 21);
        assert_eq!(value["config"]["bucketing"]["mode"], "exact");
    }
}
