//! Weighted-distance similarity between a student and professors.
//!
//! The student's importance weights serve both as the target vector and as
//! the per-feature distance weights, so a feature the student gave weight 0
//! never counts against a professor:
//!
//! ```text
//! distance     = sqrt(Σ w_i * (s_i - p_i)^2)
//! max_distance = sqrt(Σ w_i * max^2)
//! ratio        = distance / max_distance
//! similarity   = 1 / (1 + exp(k * (ratio - m)))
//! stars        = similarity * 5
//! ```
//!
//! With the default `k = 10`, `m = 0.5` the curve never reaches 0 or 1: a
//! perfect match scores 1/(1+e^-5) ≈ 0.9933 and the worst case ≈ 0.0067.
//! An all-zero weight vector short-circuits to exactly 0.0.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::feature::{PreferenceVector, ProfileVector};
use crate::profile::ProfessorProfile;

/// One ranked professor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub professor_id: i64,
    pub professor_name: String,
    /// In [0, 1]; higher is a closer match
    pub similarity: f64,
    /// Similarity rescaled to [0, 5]
    pub stars: f64,
}

/// Scores and ranks professor profiles against one preference vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityEngine {
    config: ScoringConfig,
}

impl SimilarityEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Weighted Euclidean distance, weights taken from the student vector.
    pub fn weighted_distance(&self, student: &PreferenceVector, professor: &ProfileVector) -> f64 {
        student
            .iter()
            .map(|(feature, weight)| {
                let weight = f64::from(weight);
                let diff = weight - professor[feature];
                weight * diff * diff
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Worst-case distance for these weights.
    pub fn max_distance(&self, weights: &PreferenceVector) -> f64 {
        let max_sq = self.config.max_value * self.config.max_value;
        weights
            .values()
            .iter()
            .map(|&w| f64::from(w) * max_sq)
            .sum::<f64>()
            .sqrt()
    }

    /// Similarity in [0, 1].
    pub fn similarity(&self, student: &PreferenceVector, professor: &ProfileVector) -> f64 {
        let max_distance = self.max_distance(student);
        if max_distance == 0.0 {
            return 0.0;
        }

        let ratio = self.weighted_distance(student, professor) / max_distance;
        self.logistic(ratio)
    }

    /// Logistic squashing of a distance ratio.
    pub fn logistic(&self, ratio: f64) -> f64 {
        1.0 / (1.0 + (self.config.steepness * (ratio - self.config.midpoint)).exp())
    }

    pub fn stars(&self, similarity: f64) -> f64 {
        similarity * self.config.star_scale
    }

    /// Score every profile and sort descending by similarity.
    ///
    /// Ties keep their input order.
    pub fn rank(
        &self,
        student: &PreferenceVector,
        profiles: &[ProfessorProfile],
    ) -> Vec<SimilarityResult> {
        let mut results: Vec<SimilarityResult> = profiles
            .iter()
            .map(|profile| {
                let similarity = self.similarity(student, &profile.means);
                SimilarityResult {
                    professor_id: profile.professor_id,
                    professor_name: profile.professor_name.clone(),
                    similarity,
                    stars: self.stars(similarity),
                }
            })
            .collect();

        sort_ranked(&mut results);
        results
    }
}

/// Stable descending sort by similarity.
pub fn sort_ranked(results: &mut [SimilarityResult]) {
    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
}
