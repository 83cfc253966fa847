use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::sigmoid;
use super::verdict::REAL_CLASS;

/// Output of a binary classifier for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScores {
    /// The predicted class value
    pub predicted: i64,
    /// One probability per class, in the order of [`ProbabilisticModel::classes`]
    pub probabilities: Vec<f64>,
}

/// A frozen binary classifier over TF-IDF features.
///
/// Implementations are loaded once and shared read-only across threads.
pub trait ProbabilisticModel: Send + Sync + fmt::Debug {
    /// The class values, in the column order of the probability vector.
    fn classes(&self) -> &[i64];

    /// The expected feature vector length, when the artifact declares one.
    fn n_features(&self) -> Option<usize>;

    fn predict(&self, features: &Array1<f64>) -> Result<ClassScores, ClassifierError>;
}

/// Checks the class set of a binary credibility model: exactly two distinct
/// classes, one of them the Real class.
pub(crate) fn validate_classes(classes: &[i64]) -> Result<(), ClassifierError> {
    if classes.len() != 2 || classes[0] == classes[1] {
        return Err(ClassifierError::ArtifactLoad(format!(
            "Classifier must have exactly two distinct classes, found {:?}",
            classes
        )));
    }
    if !classes.contains(&REAL_CLASS) {
        return Err(ClassifierError::ArtifactLoad(format!(
            "Classifier classes {:?} do not include the Real class {}",
            classes, REAL_CLASS
        )));
    }
    Ok(())
}

/// Coefficients of a fitted scikit-learn `LogisticRegression`, as exported to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionParams {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

/// Binary logistic regression: `p(classes[1]) = sigmoid(coef . x + intercept)`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<i64>,
    coef: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn from_params(params: LogisticRegressionParams) -> Result<Self, ClassifierError> {
        validate_classes(&params.classes)?;

        if params.coef.len() != 1 || params.intercept.len() != 1 {
            return Err(ClassifierError::ArtifactLoad(format!(
                "Binary logistic regression needs one coefficient row and one intercept, found {} and {}",
                params.coef.len(),
                params.intercept.len()
            )));
        }
        let mut coef = params.coef;
        let coef = coef.remove(0);
        let intercept = params.intercept[0];
        if coef.is_empty() || !intercept.is_finite() || coef.iter().any(|w| !w.is_finite()) {
            return Err(ClassifierError::ArtifactLoad(
                "Logistic regression weights must be non-empty and finite".to_string(),
            ));
        }

        Ok(Self {
            classes: params.classes,
            coef: Array1::from(coef),
            intercept,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let params: LogisticRegressionParams = serde_json::from_str(json)
            .map_err(|e| ClassifierError::ArtifactLoad(format!("Failed to parse classifier: {}", e)))?;
        Self::from_params(params)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ClassifierError::ArtifactLoad(format!("Failed to read classifier {:?}: {}", path, e))
        })?;
        let model = Self::from_json(&json)?;
        info!(
            "Logistic regression loaded from {:?} ({} features, classes {:?})",
            path,
            model.coef.len(),
            model.classes
        );
        Ok(model)
    }

    /// The raw decision value `coef . x + intercept`.
    pub fn decision_function(&self, features: ArrayView1<f64>) -> f64 {
        self.coef.dot(&features) + self.intercept
    }
}

impl ProbabilisticModel for LogisticRegression {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coef.len())
    }

    fn predict(&self, features: &Array1<f64>) -> Result<ClassScores, ClassifierError> {
        if features.len() != self.coef.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} features, got {}",
                self.coef.len(),
                features.len()
            )));
        }

        let z = self.decision_function(features.view());
        let p1 = sigmoid(z);
        let predicted = if z > 0.0 { self.classes[1] } else { self.classes[0] };

        Ok(ClassScores {
            predicted,
            probabilities: vec![1.0 - p1, p1],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model() -> LogisticRegression {
        LogisticRegression::from_params(LogisticRegressionParams {
            classes: vec![0, 1],
            coef: vec![vec![2.0, -3.0]],
            intercept: vec![0.5],
        })
        .unwrap()
    }

    #[test]
    fn test_predict_follows_decision_sign() {
        let model = model();

        let scores = model.predict(&array![1.0, 0.0]).unwrap();
        assert_eq!(scores.predicted, 1);
        assert!((scores.probabilities[1] - sigmoid(2.5)).abs() < 1e-12);

        let scores = model.predict(&array![0.0, 1.0]).unwrap();
        assert_eq!(scores.predicted, 0);
        assert!(scores.probabilities[0] > 0.9);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = model();
        for features in [array![0.0, 0.0], array![0.3, 0.7], array![1.0, 1.0]] {
            let scores = model.predict(&features).unwrap();
            let sum: f64 = scores.probabilities.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_decision_predicts_first_class() {
        let model = LogisticRegression::from_json(r#"{"classes": [0, 1], "coef": [[1.0]], "intercept": [0.0]}"#)
            .unwrap();
        let scores = model.predict(&array![0.0]).unwrap();
        assert_eq!(scores.predicted, 0);
        assert_eq!(scores.probabilities, vec![0.5, 0.5]);
    }

    #[test]
    fn test_feature_length_mismatch() {
        let err = model().predict(&array![1.0]).unwrap_err();
        assert!(matches!(err, ClassifierError::PredictionError(_)));
    }

    #[test]
    fn test_rejects_invalid_class_sets() {
        assert!(validate_classes(&[0, 1]).is_ok());
        assert!(validate_classes(&[1, 0]).is_ok());
        assert!(validate_classes(&[0, 2]).is_err());
        assert!(validate_classes(&[1, 1]).is_err());
        assert!(validate_classes(&[0, 1, 2]).is_err());

        let err = LogisticRegression::from_json(r#"{"classes": [0, 1, 2], "coef": [[1.0]], "intercept": [0.0]}"#)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::ArtifactLoad(_)));
    }

    #[test]
    fn test_rejects_multiclass_weights() {
        let json = r#"{"classes": [0, 1], "coef": [[1.0], [2.0]], "intercept": [0.0, 0.0]}"#;
        assert!(LogisticRegression::from_json(json).is_err());
    }
}
