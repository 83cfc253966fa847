use std::sync::Arc;

use log::debug;

use super::error::ClassifierError;
use super::model::{validate_classes, ProbabilisticModel};
use super::vectorizer::TfidfVectorizer;
use super::verdict::{PredictionVerdict, CREDIBILITY_THRESHOLD};
use crate::normalizer::TextNormalizer;

/// The frozen vectorizer and model, loaded once and never mutated.
#[derive(Debug)]
pub struct ClassifierArtifacts {
    vectorizer: TfidfVectorizer,
    model: Box<dyn ProbabilisticModel>,
}

impl ClassifierArtifacts {
    /// Pairs a vectorizer with a model, checking that they agree on the
    /// feature count and that the model is a binary Real/Fake classifier.
    pub fn new(vectorizer: TfidfVectorizer, model: Box<dyn ProbabilisticModel>) -> Result<Self, ClassifierError> {
        validate_classes(model.classes())?;
        if let Some(n_features) = model.n_features() {
            if n_features != vectorizer.n_features() {
                return Err(ClassifierError::ArtifactLoad(format!(
                    "Classifier expects {} features but the vectorizer produces {}",
                    n_features,
                    vectorizer.n_features()
                )));
            }
        }
        Ok(Self { vectorizer, model })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &dyn ProbabilisticModel {
        self.model.as_ref()
    }
}

/// A thread-safe fake-news classifier: normalization, TF-IDF features and a
/// binary model, with a fixed confidence threshold on top.
///
/// The classifier is read-only after construction and can be shared across
/// threads with `Arc`:
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use std::sync::Arc;
/// use std::thread;
/// use tingia::CredibilityClassifier;
///
/// let classifier = Arc::new(CredibilityClassifier::builder().with_artifacts_dir("artifacts")?.build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.evaluate("Tin nóng", "Nội dung bài viết").unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CredibilityClassifier {
    vectorizer_path: Option<String>,
    model_path: Option<String>,
    normalizer: Arc<TextNormalizer>,
    artifacts: Arc<ClassifierArtifacts>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<CredibilityClassifier>();
    }
};

impl CredibilityClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    pub fn new(normalizer: Arc<TextNormalizer>, artifacts: ClassifierArtifacts) -> Self {
        Self::from_parts(normalizer, Arc::new(artifacts), None, None)
    }

    pub(crate) fn from_parts(
        normalizer: Arc<TextNormalizer>,
        artifacts: Arc<ClassifierArtifacts>,
        vectorizer_path: Option<String>,
        model_path: Option<String>,
    ) -> Self {
        Self {
            vectorizer_path,
            model_path,
            normalizer,
            artifacts,
        }
    }

    /// Returns information about the loaded artifacts
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            vectorizer_path: self.vectorizer_path.clone(),
            model_path: self.model_path.clone(),
            classes: self.artifacts.model.classes().to_vec(),
            num_features: self.artifacts.vectorizer.n_features(),
            threshold: CREDIBILITY_THRESHOLD,
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn artifacts(&self) -> &ClassifierArtifacts {
        &self.artifacts
    }

    /// Evaluates an article from its title and body.
    ///
    /// The two parts are joined with a single space, normalized with stopwords
    /// removed, vectorized and scored.
    ///
    /// # Errors
    /// * `EmptyInput` if the joined text is blank, before or after normalization
    /// * `PredictionError` if the model output is not a valid binary distribution
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let classifier = tingia::CredibilityClassifier::builder().with_artifacts_dir("artifacts")?.build()?;
    /// let verdict = classifier.evaluate("Tin nóng", "Đây là tin tuyệt vời!")?;
    /// println!("{} ({:.2})", verdict.credibility_label, verdict.confidence_score);
    /// # Ok(())
    /// # }
    /// ```
    pub fn evaluate(&self, title: &str, content: &str) -> Result<PredictionVerdict, ClassifierError> {
        self.evaluate_text(&format!("{} {}", title, content))
    }

    /// Evaluates already combined article text.
    pub fn evaluate_text(&self, text: &str) -> Result<PredictionVerdict, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::EmptyInput);
        }

        let preprocessed = self.normalizer.normalize(text, true);
        if preprocessed.trim().is_empty() {
            debug!("Input of {} bytes normalized to nothing", text.len());
            return Err(ClassifierError::EmptyInput);
        }

        let features = self.artifacts.vectorizer.transform(&preprocessed);
        let scores = self.artifacts.model.predict(&features)?;
        let verdict = PredictionVerdict::from_scores(self.artifacts.model.classes(), &scores, preprocessed)?;
        debug!(
            "Evaluated {} bytes: {} ({}, confidence {:.4})",
            text.len(),
            verdict.label,
            verdict.credibility_label,
            verdict.confidence_score
        );
        Ok(verdict)
    }
}
