//! Score tables and the weighted runability blend.

use crate::types::{AnalysisResult, ExtractedLabels, RatedLabel, UNKNOWN_DURATION};
use std::collections::HashMap;

pub const ENERGY_WEIGHT: f64 = 0.75;
pub const DANCEABILITY_WEIGHT: f64 = 0.25;

const ENERGY_SCORES: &[(&str, f64)] = &[
    ("low energy", 0.2),
    ("average energy", 0.4),
    ("energy", 0.6),
    ("high energy", 0.8),
    ("very high energy", 1.0),
];

const DANCEABILITY_SCORES: &[(&str, f64)] = &[
    ("not very danceable", 0.25),
    ("somewhat danceable", 0.5),
    ("danceable", 0.75),
    ("very danceable", 1.0),
];

/// Label lookup tables and blend weights.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct ScoreTables {
    energy: HashMap<String, f64>,
    danceability: HashMap<String, f64>,
    energy_weight: f64,
    danceability_weight: f64,
}

impl Default for ScoreTables {
    fn default() -> Self {
        Self::new(
            ENERGY_SCORES.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            DANCEABILITY_SCORES.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ENERGY_WEIGHT,
            DANCEABILITY_WEIGHT,
        )
    }
}

impl ScoreTables {
    pub fn new(
        energy: HashMap<String, f64>,
        danceability: HashMap<String, f64>,
        energy_weight: f64,
        danceability_weight: f64,
    ) -> Self {
        Self {
            energy,
            danceability,
            energy_weight,
            danceability_weight,
        }
    }

    pub fn energy_score(&self, label: &str) -> Option<f64> {
        self.energy.get(label).copied()
    }

    pub fn danceability_score(&self, label: &str) -> Option<f64> {
        self.danceability.get(label).copied()
    }

    /// Weighted blend of the two component scores. Absent components
    /// contribute zero.
    pub fn runability(&self, energy: Option<f64>, danceability: Option<f64>) -> f64 {
        energy.unwrap_or(0.0) * self.energy_weight
            + danceability.unwrap_or(0.0) * self.danceability_weight
    }

    /// Turn extracted labels into the final result.
    pub fn score(&self, labels: ExtractedLabels) -> AnalysisResult {
        let energy = labels.energy_label.map(|label| RatedLabel {
            score: self.energy_score(&label),
            label,
        });
        let danceability = labels.danceability_label.map(|label| RatedLabel {
            score: self.danceability_score(&label),
            label,
        });

        let runability_score = self.runability(
            energy.as_ref().and_then(|r| r.score),
            danceability.as_ref().and_then(|r| r.score),
        );

        AnalysisResult {
            duration: labels
                .duration
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
            runability_score,
            energy,
            danceability,
        }
    }
}
