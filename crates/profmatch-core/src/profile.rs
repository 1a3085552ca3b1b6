//! Professor profiles aggregated from raw evaluation records.
//!
//! Each evaluation is one student rating one class on every feature (0..=7).
//! A professor's profile is the per-feature mean over all evaluations of
//! their classes, optionally restricted to one subject. Profiles are derived
//! on every read and never stored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feature::{Feature, FeatureVector, ProfileVector, FEATURE_COUNT};

/// One student-evaluates-class row, joined with its class and professor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub professor_id: i64,
    pub professor_name: String,
    pub subject_id: i64,
    pub class_id: i64,
    pub scores: FeatureVector<u8>,
}

/// Which evaluations contribute to a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationScope {
    /// Only classes of this subject; `None` means every subject.
    pub subject_id: Option<i64>,
}

impl EvaluationScope {
    pub fn all() -> Self {
        Self { subject_id: None }
    }

    pub fn subject(subject_id: i64) -> Self {
        Self {
            subject_id: Some(subject_id),
        }
    }

    pub fn includes(&self, record: &EvaluationRecord) -> bool {
        self.subject_id
            .map_or(true, |subject| record.subject_id == subject)
    }
}

/// A professor's mean rating per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorProfile {
    pub professor_id: i64,
    pub professor_name: String,
    pub means: ProfileVector,
    pub evaluation_count: usize,
}

struct Accumulator {
    professor_id: i64,
    professor_name: String,
    sums: [f64; FEATURE_COUNT],
    count: usize,
}

impl Accumulator {
    fn into_profile(self) -> ProfessorProfile {
        let count = self.count as f64;
        ProfessorProfile {
            professor_id: self.professor_id,
            professor_name: self.professor_name,
            means: FeatureVector::from_fn(|f| self.sums[f.index()] / count),
            evaluation_count: self.count,
        }
    }
}

/// Aggregate records into one profile per professor, in first-seen order.
///
/// Records outside `scope` are skipped. Professors with no contributing
/// record do not appear.
pub fn aggregate_profiles(
    records: &[EvaluationRecord],
    scope: &EvaluationScope,
) -> Vec<ProfessorProfile> {
    let mut order: HashMap<i64, usize> = HashMap::new();
    let mut accumulators: Vec<Accumulator> = Vec::new();

    for record in records.iter().filter(|r| scope.includes(r)) {
        let slot = *order.entry(record.professor_id).or_insert_with(|| {
            accumulators.push(Accumulator {
                professor_id: record.professor_id,
                professor_name: record.professor_name.clone(),
                sums: [0.0; FEATURE_COUNT],
                count: 0,
            });
            accumulators.len() - 1
        });

        let acc = &mut accumulators[slot];
        for feature in Feature::ALL {
            acc.sums[feature.index()] += f64::from(record.scores[feature]);
        }
        acc.count += 1;
    }

    accumulators
        .into_iter()
        .map(Accumulator::into_profile)
        .collect()
}

/// Profile of a single professor, or `None` without contributing records.
pub fn aggregate_professor(
    records: &[EvaluationRecord],
    professor_id: i64,
    scope: &EvaluationScope,
) -> Option<ProfessorProfile> {
    let own: Vec<EvaluationRecord> = records
        .iter()
        .filter(|r| r.professor_id == professor_id)
        .cloned()
        .collect();

    aggregate_profiles(&own, scope).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(professor_id: i64, subject_id: i64, pairs: &[(Feature, u8)]) -> EvaluationRecord {
        EvaluationRecord {
            professor_id,
            professor_name: format!("Professor {professor_id}"),
            subject_id,
            class_id: professor_id * 100 + subject_id,
            scores: FeatureVector::from_pairs(pairs.iter().copied()),
        }
    }

    #[test]
    fn test_means_per_feature() {
        let records = vec![
            record(1, 10, &[(Feature::SlideUsage, 7), (Feature::Pace, 2)]),
            record(1, 10, &[(Feature::SlideUsage, 4), (Feature::Pace, 5)]),
        ];
        let profiles = aggregate_profiles(&records, &EvaluationScope::all());

        assert_eq!(profiles.len(), 1);
        let p = &profiles[0];
        assert_eq!(p.evaluation_count, 2);
        assert!((p.means[Feature::SlideUsage] - 5.5).abs() < 1e-12);
        assert!((p.means[Feature::Pace] - 3.5).abs() < 1e-12);
        assert_eq!(p.means[Feature::Engagement], 0.0);
    }

    #[test]
    fn test_first_seen_order() {
        let records = vec![
            record(3, 10, &[]),
            record(1, 10, &[]),
            record(3, 11, &[]),
            record(2, 10, &[]),
        ];
        let ids: Vec<i64> = aggregate_profiles(&records, &EvaluationScope::all())
            .iter()
            .map(|p| p.professor_id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_subject_scope_filters_records() {
        let records = vec![
            record(1, 10, &[(Feature::ExamFocus, 6)]),
            record(1, 11, &[(Feature::ExamFocus, 0)]),
            record(2, 11, &[(Feature::ExamFocus, 3)]),
        ];

        let scoped = aggregate_profiles(&records, &EvaluationScope::subject(10));
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].professor_id, 1);
        assert_eq!(scoped[0].means[Feature::ExamFocus], 6.0);

        let all = aggregate_profiles(&records, &EvaluationScope::all());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].means[Feature::ExamFocus], 3.0);
    }

    #[test]
    fn test_no_records_no_profiles() {
        assert!(aggregate_profiles(&[], &EvaluationScope::all()).is_empty());
    }

    #[test]
    fn test_single_professor() {
        let records = vec![
            record(1, 10, &[(Feature::Engagement, 7)]),
            record(2, 10, &[(Feature::Engagement, 1)]),
        ];
        let p = aggregate_professor(&records, 2, &EvaluationScope::all()).unwrap();
        assert_eq!(p.means[Feature::Engagement], 1.0);
        assert!(aggregate_professor(&records, 9, &EvaluationScope::all()).is_none());
        assert!(aggregate_professor(&records, 1, &EvaluationScope::subject(99)).is_none());
    }
}
