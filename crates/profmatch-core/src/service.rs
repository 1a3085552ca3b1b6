//! The matching service: submit preferences, rank professors, read averages.
//!
//! Every call recomputes from the store; nothing is cached between requests.

use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::error::{MatchError, Result};
use crate::feature::Feature;
use crate::preference::{translate, AssessmentStyle, Questionnaire, TeachingStyle};
use crate::profile::{aggregate_professor, aggregate_profiles, EvaluationScope, ProfessorProfile};
use crate::similarity::{SimilarityEngine, SimilarityResult};
use crate::store::{MatchStore, PreferenceUpdate, StoredPreferences, Subject};

/// Matching operations over any [`MatchStore`].
pub struct MatchService<S> {
    store: S,
    engine: SimilarityEngine,
}

impl<S: MatchStore> MatchService<S> {
    pub fn new(store: S, scoring: ScoringConfig) -> Self {
        Self {
            store,
            engine: SimilarityEngine::new(scoring),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Translate a questionnaire and overwrite the student's stored vector.
    pub fn submit_preferences(
        &self,
        student_id: i64,
        questionnaire: &Questionnaire,
    ) -> Result<StoredPreferences> {
        self.ensure_catalog()?;
        questionnaire.validate()?;

        if TeachingStyle::from_label(&questionnaire.teaching.label) == TeachingStyle::Unrecognized {
            warn!(student_id, label = %questionnaire.teaching.label, "Unrecognized teaching style; contributes no weight");
        }
        if AssessmentStyle::from_label(&questionnaire.assessment.label)
            == AssessmentStyle::Unrecognized
        {
            warn!(student_id, label = %questionnaire.assessment.label, "Unrecognized assessment style; contributes no weight");
        }

        let weights = translate(questionnaire);
        let saved = self.store.replace_preferences(
            student_id,
            PreferenceUpdate {
                course: &questionnaire.course,
                term: &questionnaire.term,
                weights: &weights,
            },
        )?;

        info!(
            student_id,
            profile_id = saved.profile_id,
            "Saved preference profile"
        );
        Ok(saved)
    }

    /// Professors ranked by similarity to the student's saved preferences.
    pub fn recommendations(
        &self,
        student_id: i64,
        scope: &EvaluationScope,
    ) -> Result<Vec<SimilarityResult>> {
        let preferences = self.store.preferences(student_id)?.ok_or_else(|| {
            MatchError::NotFound(format!(
                "preference profile for student {student_id}; submit your preferences first"
            ))
        })?;

        let records = self.store.evaluations(scope)?;
        let profiles = aggregate_profiles(&records, scope);
        let ranked = self.engine.rank(&preferences.weights, &profiles);

        debug!(
            student_id,
            subject_id = ?scope.subject_id,
            evaluations = records.len(),
            professors = ranked.len(),
            "Ranked professors"
        );
        Ok(ranked)
    }

    /// Mean rating per feature for one professor.
    pub fn professor_averages(
        &self,
        professor_id: i64,
        scope: &EvaluationScope,
    ) -> Result<ProfessorProfile> {
        let records = self.store.professor_evaluations(professor_id, scope)?;
        aggregate_professor(&records, professor_id, scope).ok_or_else(|| {
            MatchError::NotFound(format!(
                "professor {professor_id} has no evaluations in scope"
            ))
        })
    }

    pub fn subjects(&self) -> Result<Vec<Subject>> {
        self.store.subjects()
    }

    fn ensure_catalog(&self) -> Result<()> {
        let catalog = self.store.feature_catalog()?;
        if catalog.is_empty() {
            return Err(MatchError::Unconfigured(
                "feature catalog is empty".to_string(),
            ));
        }

        let missing: Vec<&str> = Feature::ALL
            .iter()
            .filter(|f| !catalog.iter().any(|entry| entry.feature == **f))
            .map(|f| f.name())
            .collect();
        if !missing.is_empty() {
            return Err(MatchError::Unconfigured(format!(
                "feature catalog is missing: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::feature::{FeatureVector, PreferenceVector};
    use crate::preference::Choice;
    use crate::profile::EvaluationRecord;
    use crate::store::CatalogEntry;

    #[derive(Default)]
    struct MemoryStore {
        catalog: Vec<CatalogEntry>,
        profiles: Mutex<HashMap<i64, StoredPreferences>>,
        evaluations: Vec<EvaluationRecord>,
    }

    impl MemoryStore {
        fn configured() -> Self {
            Self {
                catalog: Feature::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, f)| CatalogEntry {
                        option_id: i as i64 + 1,
                        feature: *f,
                        label: f.label().to_string(),
                    })
                    .collect(),
                ..Default::default()
            }
        }

        fn with_evaluation(mut self, professor_id: i64, subject_id: i64, scores: PreferenceVector) -> Self {
            self.evaluations.push(EvaluationRecord {
                professor_id,
                professor_name: format!("Prof {professor_id}"),
                subject_id,
                class_id: subject_id,
                scores,
            });
            self
        }
    }

    impl MatchStore for MemoryStore {
        fn feature_catalog(&self) -> Result<Vec<CatalogEntry>> {
            Ok(self.catalog.clone())
        }

        fn replace_preferences(
            &self,
            student_id: i64,
            update: PreferenceUpdate<'_>,
        ) -> Result<StoredPreferences> {
            let saved = StoredPreferences {
                profile_id: student_id,
                student_id,
                course: update.course.to_string(),
                term: update.term.to_string(),
                weights: *update.weights,
                updated_at: Utc::now(),
            };
            self.profiles
                .lock()
                .unwrap()
                .insert(student_id, saved.clone());
            Ok(saved)
        }

        fn preferences(&self, student_id: i64) -> Result<Option<StoredPreferences>> {
            Ok(self.profiles.lock().unwrap().get(&student_id).cloned())
        }

        fn evaluations(&self, scope: &EvaluationScope) -> Result<Vec<EvaluationRecord>> {
            Ok(self
                .evaluations
                .iter()
                .filter(|r| scope.includes(r))
                .cloned()
                .collect())
        }

        fn professor_evaluations(
            &self,
            professor_id: i64,
            scope: &EvaluationScope,
        ) -> Result<Vec<EvaluationRecord>> {
            Ok(self
                .evaluations(scope)?
                .into_iter()
                .filter(|r| r.professor_id == professor_id)
                .collect())
        }

        fn subjects(&self) -> Result<Vec<Subject>> {
            Ok(Vec::new())
        }
    }

    fn slide_lover() -> Questionnaire {
        Questionnaire {
            course: "Engenharia".to_string(),
            term: "3".to_string(),
            teaching: Choice::new("theoretical", 7),
            pace: Choice::new("Moderado", 0),
            engagement: Choice::new("Baixo", 0),
            assessment: Choice::new("Mista", 0),
        }
    }

    fn service(store: MemoryStore) -> MatchService<MemoryStore> {
        MatchService::new(store, ScoringConfig::default())
    }

    #[test]
    fn test_submit_requires_catalog() {
        let svc = service(MemoryStore::default());
        let err = svc.submit_preferences(1, &slide_lover()).unwrap_err();
        assert!(matches!(err, MatchError::Unconfigured(_)));
    }

    #[test]
    fn test_submit_reports_incomplete_catalog() {
        let mut store = MemoryStore::configured();
        store.catalog.retain(|e| e.feature != Feature::Engagement);
        let err = service(store)
            .submit_preferences(1, &slide_lover())
            .unwrap_err();
        assert!(matches!(err, MatchError::Unconfigured(ref m) if m.contains("interacao")));
    }

    #[test]
    fn test_submit_rejects_out_of_range_and_keeps_previous() {
        let svc = service(MemoryStore::configured());
        svc.submit_preferences(1, &slide_lover()).unwrap();

        let mut bad = slide_lover();
        bad.teaching.importance = 12;
        assert!(matches!(
            svc.submit_preferences(1, &bad),
            Err(MatchError::Validation(_))
        ));

        let stored = svc.store().preferences(1).unwrap().unwrap();
        assert_eq!(stored.weights[Feature::SlideUsage], 7);
    }

    #[test]
    fn test_recommendations_without_profile_is_not_found() {
        let svc = service(MemoryStore::configured());
        let err = svc
            .recommendations(5, &EvaluationScope::all())
            .unwrap_err();
        assert!(matches!(err, MatchError::NotFound(_)));
    }

    #[test]
    fn test_recommendations_end_to_end() {
        let store = MemoryStore::configured()
            .with_evaluation(2, 10, FeatureVector::from_pairs([(Feature::BoardUsage, 7)]))
            .with_evaluation(1, 10, FeatureVector::from_pairs([(Feature::SlideUsage, 7)]));
        let svc = service(store);
        svc.submit_preferences(1, &slide_lover()).unwrap();

        let ranked = svc.recommendations(1, &EvaluationScope::all()).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].professor_id, 1);
        assert!((ranked[0].similarity - 0.993_307_149_075_715_3).abs() < 1e-9);
        assert!((ranked[1].similarity - 0.006_692_850_924_284_856).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations_empty_scope() {
        let store = MemoryStore::configured()
            .with_evaluation(1, 10, FeatureVector::from_pairs([(Feature::SlideUsage, 7)]));
        let svc = service(store);
        svc.submit_preferences(1, &slide_lover()).unwrap();

        let ranked = svc.recommendations(1, &EvaluationScope::subject(99)).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_professor_averages() {
        let store = MemoryStore::configured()
            .with_evaluation(1, 10, FeatureVector::from_pairs([(Feature::Pace, 6)]))
            .with_evaluation(1, 11, FeatureVector::from_pairs([(Feature::Pace, 2)]));
        let svc = service(store);

        let all = svc.professor_averages(1, &EvaluationScope::all()).unwrap();
        assert_eq!(all.means[Feature::Pace], 4.0);
        assert_eq!(all.evaluation_count, 2);

        let scoped = svc
            .professor_averages(1, &EvaluationScope::subject(11))
            .unwrap();
        assert_eq!(scoped.means[Feature::Pace], 2.0);

        assert!(matches!(
            svc.professor_averages(7, &EvaluationScope::all()),
            Err(MatchError::NotFound(_))
        ));
    }
}
