//! Data-access seam.
//!
//! The matching service reads evaluation rows and writes preference vectors
//! through [`MatchStore`]. The store owns every record; what crosses this
//! boundary are plain immutable views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::feature::{Feature, PreferenceVector};
use crate::profile::{EvaluationRecord, EvaluationScope};

/// A subject (course unit) students can scope recommendations to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub course: Option<String>,
}

/// Catalog entry binding a stable option id to a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub option_id: i64,
    pub feature: Feature,
    pub label: String,
}

/// A student's saved preference vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPreferences {
    pub profile_id: i64,
    pub student_id: i64,
    pub course: String,
    pub term: String,
    pub weights: PreferenceVector,
    pub updated_at: DateTime<Utc>,
}

/// New preference data for one student.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceUpdate<'a> {
    pub course: &'a str,
    pub term: &'a str,
    pub weights: &'a PreferenceVector,
}

/// The trait storage backends implement.
pub trait MatchStore: Send + Sync {
    /// The feature/option catalog. Empty when the system is not initialized.
    fn feature_catalog(&self) -> Result<Vec<CatalogEntry>>;

    /// Atomically replace every stored weight of the student's profile.
    ///
    /// Either the full new set is stored or the previous set is left intact.
    fn replace_preferences(
        &self,
        student_id: i64,
        update: PreferenceUpdate<'_>,
    ) -> Result<StoredPreferences>;

    /// The student's saved preferences, if any were ever submitted.
    fn preferences(&self, student_id: i64) -> Result<Option<StoredPreferences>>;

    /// Evaluation rows within scope, grouped by professor.
    fn evaluations(&self, scope: &EvaluationScope) -> Result<Vec<EvaluationRecord>>;

    /// Evaluation rows of a single professor within scope.
    fn professor_evaluations(
        &self,
        professor_id: i64,
        scope: &EvaluationScope,
    ) -> Result<Vec<EvaluationRecord>>;

    /// All subjects, ordered by name.
    fn subjects(&self) -> Result<Vec<Subject>>;
}
