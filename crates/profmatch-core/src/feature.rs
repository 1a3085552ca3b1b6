//! The feature space shared by student preferences and professor profiles.
//!
//! Every vector in the crate is a [`FeatureVector`], a fixed-size array laid
//! out in [`Feature::ALL`] order. Nothing else hard-codes the ordering, so a
//! preference vector and a profile vector always line up index-for-index.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of comparable dimensions.
pub const FEATURE_COUNT: usize = 7;

/// Upper bound of every rating and importance weight.
pub const MAX_SCORE: u8 = 7;

/// One comparable dimension of teaching style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "slide")]
    SlideUsage,
    #[serde(rename = "quadro")]
    BoardUsage,
    #[serde(rename = "velocidade_aula")]
    Pace,
    #[serde(rename = "provas")]
    ExamFocus,
    #[serde(rename = "trabalhos")]
    AssignmentFocus,
    #[serde(rename = "projetos")]
    ProjectFocus,
    #[serde(rename = "interacao")]
    Engagement,
}

impl Feature {
    /// Canonical order. Vectors are indexed by position in this list.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::SlideUsage,
        Feature::BoardUsage,
        Feature::Pace,
        Feature::ExamFocus,
        Feature::AssignmentFocus,
        Feature::ProjectFocus,
        Feature::Engagement,
    ];

    /// Position of this feature in [`Feature::ALL`].
    pub fn index(self) -> usize {
        match self {
            Feature::SlideUsage => 0,
            Feature::BoardUsage => 1,
            Feature::Pace => 2,
            Feature::ExamFocus => 3,
            Feature::AssignmentFocus => 4,
            Feature::ProjectFocus => 5,
            Feature::Engagement => 6,
        }
    }

    /// Catalog key, also the evaluation column name.
    pub fn name(self) -> &'static str {
        match self {
            Feature::SlideUsage => "slide",
            Feature::BoardUsage => "quadro",
            Feature::Pace => "velocidade_aula",
            Feature::ExamFocus => "provas",
            Feature::AssignmentFocus => "trabalhos",
            Feature::ProjectFocus => "projetos",
            Feature::Engagement => "interacao",
        }
    }

    /// Human-readable option label.
    pub fn label(self) -> &'static str {
        match self {
            Feature::SlideUsage => "Uses slides",
            Feature::BoardUsage => "Uses the board",
            Feature::Pace => "Class pace",
            Feature::ExamFocus => "Exam-based assessment",
            Feature::AssignmentFocus => "Assignment-based assessment",
            Feature::ProjectFocus => "Project-based assessment",
            Feature::Engagement => "Student engagement",
        }
    }

    /// Look up a feature by its catalog key.
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value per feature, stored in canonical order.
///
/// Serializes as a `{feature_name: value}` map; absent keys deserialize to
/// the default value, unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector<T> {
    values: [T; FEATURE_COUNT],
}

/// A student's importance weights (0..=7), doubling as distance weights.
pub type PreferenceVector = FeatureVector<u8>;

/// A professor's mean observed rating per feature.
pub type ProfileVector = FeatureVector<f64>;

impl<T: Copy + Default> FeatureVector<T> {
    /// All-default vector.
    pub fn zeros() -> Self {
        Self {
            values: [T::default(); FEATURE_COUNT],
        }
    }

    /// Build a vector by evaluating `f` for each feature in canonical order.
    pub fn from_fn(mut f: impl FnMut(Feature) -> T) -> Self {
        let mut vector = Self::zeros();
        for feature in Feature::ALL {
            vector.values[feature.index()] = f(feature);
        }
        vector
    }

    /// Build a vector from sparse pairs; missing features stay at default.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Feature, T)>) -> Self {
        let mut vector = Self::zeros();
        for (feature, value) in pairs {
            vector.set(feature, value);
        }
        vector
    }

    pub fn get(&self, feature: Feature) -> T {
        self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: T) {
        self.values[feature.index()] = value;
    }

    /// Values in canonical order.
    pub fn values(&self) -> &[T; FEATURE_COUNT] {
        &self.values
    }

    /// `(feature, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, T)> + '_ {
        Feature::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Apply `f` to every component.
    pub fn map<U: Copy + Default>(&self, mut f: impl FnMut(T) -> U) -> FeatureVector<U> {
        FeatureVector::from_fn(|feature| f(self.get(feature)))
    }
}

impl FeatureVector<u8> {
    /// Widen to real values for distance computation.
    pub fn to_f64(&self) -> FeatureVector<f64> {
        self.map(f64::from)
    }

    /// Features whose weight exceeds [`MAX_SCORE`].
    pub fn out_of_range(&self) -> Vec<Feature> {
        self.iter()
            .filter(|&(_, v)| v > MAX_SCORE)
            .map(|(f, _)| f)
            .collect()
    }
}

impl<T: Copy + Default> Default for FeatureVector<T> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T> Index<Feature> for FeatureVector<T> {
    type Output = T;

    fn index(&self, feature: Feature) -> &T {
        &self.values[feature.index()]
    }
}

impl<T: Copy + Default + Serialize> Serialize for FeatureVector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(f, v)| (f.name(), v)))
    }
}

impl<'de, T: Copy + Default + Deserialize<'de>> Deserialize<'de> for FeatureVector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, T>::deserialize(deserializer)?;
        let mut vector = Self::zeros();
        for (name, value) in raw {
            let feature = Feature::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown feature: {name}")))?;
            vector.set(feature, value);
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_canonical_order() {
        for (position, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), position);
        }
    }

    #[test]
    fn test_name_roundtrip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(Feature::from_name("homework"), None);
    }

    #[test]
    fn test_from_pairs_zero_fills() {
        let v = PreferenceVector::from_pairs([(Feature::Pace, 4)]);
        assert_eq!(v.values().len(), FEATURE_COUNT);
        assert_eq!(v[Feature::Pace], 4);
        assert_eq!(v.values().iter().map(|&x| x as u32).sum::<u32>(), 4);
    }

    #[test]
    fn test_out_of_range() {
        let v = PreferenceVector::from_pairs([(Feature::SlideUsage, 7), (Feature::Engagement, 9)]);
        assert_eq!(v.out_of_range(), vec![Feature::Engagement]);
    }

    #[test]
    fn test_serializes_as_named_map() {
        let v = PreferenceVector::from_pairs([(Feature::BoardUsage, 3)]);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["quadro"], 3);
        assert_eq!(json["slide"], 0);
        assert_eq!(json.as_object().unwrap().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_deserialize_missing_defaults_and_unknown_rejected() {
        let v: ProfileVector = serde_json::from_str(r#"{"provas": 2.5}"#).unwrap();
        assert_eq!(v[Feature::ExamFocus], 2.5);
        assert_eq!(v[Feature::SlideUsage], 0.0);

        let bad = serde_json::from_str::<ProfileVector>(r#"{"homework": 1.0}"#);
        assert!(bad.is_err());
    }
}
