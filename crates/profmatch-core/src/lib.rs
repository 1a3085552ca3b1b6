//! profmatch-core - Matching students to professors by teaching style
//!
//! This crate provides the core functionality for profmatch:
//!
//! - **Feature**: The ordered feature space shared by every vector
//! - **Preference**: Questionnaire answers translated into weighted preference vectors
//! - **Profile**: Per-professor feature means aggregated from evaluation records
//! - **Similarity**: Weighted-distance logistic scoring, star ratings and ranking
//! - **Store**: The data-access trait the service reads and writes through
//! - **Service**: Submit preferences, rank professors, read professor averages
//! - **Persistence**: SQLite-based storage (feature `sqlite`)
//! - **Config**: Scoring constants and server settings
//!
//! # Scoring
//!
//! ```text
//! questionnaire ──translate──▶ preference vector ─┐
//!                                                  ├─▶ similarity ─▶ ranked list
//! evaluations ──aggregate──▶ professor profiles ──┘
//! ```

pub mod config;
pub mod error;
pub mod feature;
#[cfg(feature = "sqlite")]
pub mod persistence;
pub mod preference;
pub mod profile;
pub mod service;
pub mod similarity;
pub mod store;

pub use config::{ConfigError, MatchConfig, ScoringConfig, ServerConfig};
pub use error::{MatchError, PersistenceError, Result};
pub use feature::{Feature, FeatureVector, PreferenceVector, ProfileVector, FEATURE_COUNT, MAX_SCORE};
#[cfg(feature = "sqlite")]
pub use persistence::Repository;
pub use preference::{translate, AssessmentStyle, Choice, Questionnaire, TeachingStyle};
pub use profile::{
    aggregate_professor, aggregate_profiles, EvaluationRecord, EvaluationScope, ProfessorProfile,
};
pub use service::MatchService;
pub use similarity::{sort_ranked, SimilarityEngine, SimilarityResult};
pub use store::{CatalogEntry, MatchStore, PreferenceUpdate, StoredPreferences, Subject};

/// Returns the version of profmatch-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
