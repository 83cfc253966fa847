use std::fmt;

use serde::Serialize;

use super::error::ClassifierError;
use super::model::ClassScores;

/// Confidence at or above which the classifier's verdict is asserted.
pub const CREDIBILITY_THRESHOLD: f64 = 0.70;

/// The class value denoting a genuine article. Every other value is fake.
pub const REAL_CLASS: i64 = 1;

const PROBABILITY_TOLERANCE: f64 = 1e-4;

/// The raw binary model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryLabel {
    Real,
    Fake,
}

impl BinaryLabel {
    pub fn from_class(class: i64) -> Self {
        if class == REAL_CLASS {
            BinaryLabel::Real
        } else {
            BinaryLabel::Fake
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryLabel::Real => "Real",
            BinaryLabel::Fake => "Fake",
        }
    }
}

impl fmt::Display for BinaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three-level trust signal shown to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CredibilityLabel {
    #[serde(rename = "Thật")]
    Genuine,
    #[serde(rename = "Chưa Rõ")]
    Unclear,
    #[serde(rename = "Giả")]
    Fabricated,
}

impl CredibilityLabel {
    /// Applies the fixed threshold policy: below [`CREDIBILITY_THRESHOLD`] the
    /// label is `Unclear` whatever the predicted class.
    pub fn from_confidence(is_fake: bool, confidence_score: f64) -> Self {
        if confidence_score >= CREDIBILITY_THRESHOLD {
            if is_fake {
                CredibilityLabel::Fabricated
            } else {
                CredibilityLabel::Genuine
            }
        } else {
            CredibilityLabel::Unclear
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CredibilityLabel::Genuine => "Thật",
            CredibilityLabel::Unclear => "Chưa Rõ",
            CredibilityLabel::Fabricated => "Giả",
        }
    }
}

impl fmt::Display for CredibilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability of each binary label; serializes as `{"Real": .., "Fake": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    #[serde(rename = "Real")]
    pub real: f64,
    #[serde(rename = "Fake")]
    pub fake: f64,
}

impl ClassProbabilities {
    pub fn get(&self, label: BinaryLabel) -> f64 {
        match label {
            BinaryLabel::Real => self.real,
            BinaryLabel::Fake => self.fake,
        }
    }
}

/// Publish/draft decision of the posting workflow, keyed off the binary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Published,
    Draft,
}

/// The result of evaluating one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionVerdict {
    pub is_fake: bool,
    /// Probability of the predicted class
    pub confidence_score: f64,
    /// Threshold-adjusted trust signal, the value stored with a post
    pub credibility_label: CredibilityLabel,
    /// Raw model output, the value publish/draft decisions use
    pub label: BinaryLabel,
    pub probabilities: ClassProbabilities,
    pub preprocessed_text: String,
}

impl PredictionVerdict {
    /// Builds a verdict from model scores, checking the binary contract:
    /// two classes, the predicted class among them, probabilities in [0, 1]
    /// summing to 1.
    pub fn from_scores(
        classes: &[i64],
        scores: &ClassScores,
        preprocessed_text: String,
    ) -> Result<Self, ClassifierError> {
        if classes.len() != 2 || scores.probabilities.len() != 2 {
            return Err(ClassifierError::PredictionError(format!(
                "Expected 2 classes and 2 probabilities, got {} and {}",
                classes.len(),
                scores.probabilities.len()
            )));
        }
        if let Some(p) = scores.probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ClassifierError::PredictionError(format!("Probability {} is outside [0, 1]", p)));
        }
        let total: f64 = scores.probabilities.iter().sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ClassifierError::PredictionError(format!("Probabilities sum to {}", total)));
        }

        let predicted_idx = classes.iter().position(|&c| c == scores.predicted).ok_or_else(|| {
            ClassifierError::PredictionError(format!(
                "Predicted class {} is not one of {:?}",
                scores.predicted, classes
            ))
        })?;

        let mut probabilities = ClassProbabilities { real: 0.0, fake: 0.0 };
        for (&class, &p) in classes.iter().zip(&scores.probabilities) {
            match BinaryLabel::from_class(class) {
                BinaryLabel::Real => probabilities.real = p,
                BinaryLabel::Fake => probabilities.fake = p,
            }
        }

        let label = BinaryLabel::from_class(scores.predicted);
        let is_fake = label == BinaryLabel::Fake;
        let confidence_score = scores.probabilities[predicted_idx];

        Ok(Self {
            is_fake,
            confidence_score,
            credibility_label: CredibilityLabel::from_confidence(is_fake, confidence_score),
            label,
            probabilities,
            preprocessed_text,
        })
    }

    pub fn publication_status(&self) -> PublicationStatus {
        match self.label {
            BinaryLabel::Real => PublicationStatus::Published,
            BinaryLabel::Fake => PublicationStatus::Draft,
        }
    }
}
