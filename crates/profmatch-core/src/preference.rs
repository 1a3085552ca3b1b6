//! Questionnaire → preference vector translation.
//!
//! A student answers four categorical questions, each paired with an
//! importance from 0 to 7. Teaching style and assessment style pick which
//! feature receives the importance; pace and engagement write their
//! importance straight into a fixed feature. Features no answer touches stay
//! at 0.
//!
//! Labels are matched after folding case and diacritics, so the English
//! labels and the Portuguese ones used by the original questionnaire
//! ("Teórica", "Prática", "Provas", ...) are both recognized. A label that
//! matches nothing falls into the `Unrecognized` variant, which contributes
//! nothing to the vector.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{MatchError, Result};
use crate::feature::{Feature, PreferenceVector, MAX_SCORE};

/// Teaching-style answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeachingStyle {
    /// Lecture-driven; maps to slide usage.
    Theoretical,
    /// Hands-on; maps to board usage.
    Practical,
    /// Any other label (including "mixed"): no feature is set.
    Unrecognized,
}

impl TeachingStyle {
    pub fn from_label(label: &str) -> Self {
        match fold_label(label).as_str() {
            "theoretical" | "theory" | "teorica" | "teorico" => TeachingStyle::Theoretical,
            "practical" | "practice" | "pratica" | "pratico" => TeachingStyle::Practical,
            _ => TeachingStyle::Unrecognized,
        }
    }

    /// Feature that receives the paired importance, if any.
    pub fn feature(self) -> Option<Feature> {
        match self {
            TeachingStyle::Theoretical => Some(Feature::SlideUsage),
            TeachingStyle::Practical => Some(Feature::BoardUsage),
            TeachingStyle::Unrecognized => None,
        }
    }
}

/// Assessment-style answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentStyle {
    Exams,
    Assignments,
    Projects,
    /// Any other label: no feature is set.
    Unrecognized,
}

impl AssessmentStyle {
    pub fn from_label(label: &str) -> Self {
        match fold_label(label).as_str() {
            "exams" | "exam" | "provas" | "prova" => AssessmentStyle::Exams,
            "assignments" | "assignment" | "trabalhos" | "trabalho" => AssessmentStyle::Assignments,
            "projects" | "project" | "projetos" | "projeto" => AssessmentStyle::Projects,
            _ => AssessmentStyle::Unrecognized,
        }
    }

    pub fn feature(self) -> Option<Feature> {
        match self {
            AssessmentStyle::Exams => Some(Feature::ExamFocus),
            AssessmentStyle::Assignments => Some(Feature::AssignmentFocus),
            AssessmentStyle::Projects => Some(Feature::ProjectFocus),
            AssessmentStyle::Unrecognized => None,
        }
    }
}

/// One questionnaire answer: a categorical label plus its importance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub importance: u8,
}

impl Choice {
    pub fn new(label: impl Into<String>, importance: u8) -> Self {
        Self {
            label: label.into(),
            importance,
        }
    }
}

/// A full questionnaire submission.
///
/// `course` and `term` are descriptive metadata; they are stored alongside
/// the vector but never enter it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub term: String,
    pub teaching: Choice,
    pub pace: Choice,
    pub engagement: Choice,
    pub assessment: Choice,
}

impl Questionnaire {
    /// Answers paired with their field names, in form order.
    pub fn choices(&self) -> [(&'static str, &Choice); 4] {
        [
            ("teaching", &self.teaching),
            ("pace", &self.pace),
            ("engagement", &self.engagement),
            ("assessment", &self.assessment),
        ]
    }

    /// Reject importances above [`MAX_SCORE`].
    pub fn validate(&self) -> Result<()> {
        let invalid: Vec<String> = self
            .choices()
            .iter()
            .filter(|(_, choice)| choice.importance > MAX_SCORE)
            .map(|(field, choice)| format!("{}={}", field, choice.importance))
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(MatchError::Validation(format!(
                "importance must be between 0 and {}: {}",
                MAX_SCORE,
                invalid.join(", ")
            )))
        }
    }
}

/// Translate a questionnaire into a complete preference vector.
///
/// Pure and infallible; bounds are checked by [`Questionnaire::validate`].
pub fn translate(questionnaire: &Questionnaire) -> PreferenceVector {
    let mut vector = PreferenceVector::zeros();

    let teaching = &questionnaire.teaching;
    if let Some(feature) = TeachingStyle::from_label(&teaching.label).feature() {
        vector.set(feature, teaching.importance);
    }

    let assessment = &questionnaire.assessment;
    if let Some(feature) = AssessmentStyle::from_label(&assessment.label).feature() {
        vector.set(feature, assessment.importance);
    }

    // Pace and engagement labels are not interpreted.
    vector.set(Feature::Pace, questionnaire.pace.importance);
    vector.set(Feature::Engagement, questionnaire.engagement.importance);

    vector
}

/// Lowercase ASCII with diacritics and surrounding whitespace removed.
fn fold_label(label: &str) -> String {
    label
        .trim()
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .to_lowercase()
}
